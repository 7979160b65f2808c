//! TreeStore - the comment forest currently on screen
//!
//! The forest is replaced wholesale on every accepted load. Each reload is
//! stamped with its request id; only the response to the most recently
//! issued reload is accepted, so a slow response can never overwrite a
//! newer one.

use crate::error::ClientError;
use crate::models::{forest_len, Forest, ListQuery};

/// What the tree panel is currently showing
#[derive(Clone, Debug, Default, PartialEq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Outcome of offering a load result to the store
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    Accepted,
    /// A newer reload was issued after this one
    Stale,
}

#[derive(Debug, Default)]
pub struct TreeStore {
    forest: Forest,
    query: ListQuery,
    state: LoadState,
    latest_reload: Option<u64>,
}

impl TreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn query_mut(&mut self) -> &mut ListQuery {
        &mut self.query
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// Number of comments in the current forest
    pub fn len(&self) -> usize {
        forest_len(&self.forest)
    }

    pub fn is_empty(&self) -> bool {
        self.forest.is_empty()
    }

    /// Record that reload `id` was issued; it supersedes any earlier one
    pub fn begin_reload(&mut self, id: u64) {
        self.latest_reload = Some(id);
        self.state = LoadState::Loading;
    }

    /// Offer a load result stamped with `id`
    pub fn apply(&mut self, id: u64, result: Result<Forest, ClientError>) -> Applied {
        if self.latest_reload != Some(id) {
            tracing::warn!(id, latest = ?self.latest_reload, "Discarding stale forest response");
            return Applied::Stale;
        }
        match result {
            Ok(forest) => {
                tracing::info!(id, roots = forest.len(), total = forest_len(&forest), "Forest replaced");
                self.forest = forest;
                self.state = LoadState::Loaded;
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "Forest load failed");
                self.state = LoadState::Failed(e.to_string());
            }
        }
        Applied::Accepted
    }
}
