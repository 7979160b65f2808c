//! Network layer - HTTP calls against the comments backend
//!
//! The Network actor receives commands and sends back responses.

pub mod actor;
pub mod client;

pub use actor::NetworkActor;
pub use client::CommentsClient;
