//! # threadview
//!
//! A terminal client for threaded comment backends.
//!
//! ## Features
//! - Nested comment tree with reply/delete actions per node
//! - Create form with inline validation and a transient confirmation
//! - Full-text search panel
//! - Sorting, paging and subtree focus
//! - HTML export of the rendered tree
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod constants;
pub mod config;
pub mod error;
pub mod models;
pub mod tree;
pub mod renderer;
pub mod ui;
pub mod messages;
pub mod app;
pub mod network;

// Re-export commonly used types
pub use config::Config;
pub use error::ClientError;
pub use models::{Comment, Forest, NewComment, ListQuery, SortOrder};
pub use tree::{TreeStore, LoadState};
pub use renderer::{Renderer, DisplayTree, DisplayNode, NodeAction, escape_html};
pub use messages::{UiEvent, NetworkCommand, NetworkResponse, RenderState};
pub use app::{AppState, AppActor};
pub use network::{NetworkActor, CommentsClient};
