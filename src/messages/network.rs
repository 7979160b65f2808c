//! Network messages - communication between App and Network layers

use crate::error::ClientError;
use crate::models::{Comment, Forest, ListQuery, NewComment};

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkCommand {
    /// Fetch the comment forest
    LoadForest { id: u64, query: ListQuery },
    /// Create a comment or reply
    CreateComment { id: u64, comment: NewComment },
    /// Delete a comment on behalf of a self-asserted user
    DeleteComment { id: u64, comment_id: i64, user_id: i64 },
    /// Flat keyword search
    Search { id: u64, query: String, limit: usize },
    /// Shutdown the network actor
    Shutdown,
}

impl NetworkCommand {
    pub fn id(&self) -> Option<u64> {
        match self {
            NetworkCommand::LoadForest { id, .. }
            | NetworkCommand::CreateComment { id, .. }
            | NetworkCommand::DeleteComment { id, .. }
            | NetworkCommand::Search { id, .. } => Some(*id),
            NetworkCommand::Shutdown => None,
        }
    }
}

/// Which operation a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Create,
    Delete,
    Search,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Load => "load",
            Operation::Create => "create",
            Operation::Delete => "delete",
            Operation::Search => "search",
        }
    }
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkResponse {
    ForestLoaded {
        id: u64,
        forest: Forest,
        time_ms: u64,
    },
    Created {
        id: u64,
        comment: Option<Comment>,
    },
    Deleted {
        id: u64,
        comment_id: i64,
    },
    SearchResults {
        id: u64,
        comments: Vec<Comment>,
    },
    Failed {
        id: u64,
        operation: Operation,
        error: ClientError,
    },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::ForestLoaded { id, .. } => *id,
            NetworkResponse::Created { id, .. } => *id,
            NetworkResponse::Deleted { id, .. } => *id,
            NetworkResponse::SearchResults { id, .. } => *id,
            NetworkResponse::Failed { id, .. } => *id,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, NetworkResponse::Failed { .. })
    }
}
