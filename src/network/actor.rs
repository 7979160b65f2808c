//! Network actor - runs backend calls in the Tokio async runtime

use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse, Operation};
use crate::network::client::CommentsClient;

/// Network actor that executes comment commands, one task per request
pub struct NetworkActor {
    client: CommentsClient,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(client: CommentsClient, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            client,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                // Handle incoming commands
                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Shutdown) | None => {
                            self.active_requests.abort_all();
                            break;
                        }
                        Some(cmd) => {
                            let client = self.client.clone();
                            let response_tx = self.response_tx.clone();
                            self.active_requests.spawn(async move {
                                if let Some(response) = execute(&client, cmd).await {
                                    let _ = response_tx.send(response);
                                }
                            });
                        }
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {}
            }
        }
    }
}

/// Execute a single command against the backend; `Shutdown` yields nothing
pub async fn execute(client: &CommentsClient, cmd: NetworkCommand) -> Option<NetworkResponse> {
    let start = Instant::now();
    let id = cmd.id().unwrap_or_default();
    let response = match cmd {
        NetworkCommand::LoadForest { id, query } => {
            tracing::info!(id, query = ?query, "Loading forest");
            match client.list(&query).await {
                Ok(forest) => NetworkResponse::ForestLoaded {
                    id,
                    forest,
                    time_ms: start.elapsed().as_millis() as u64,
                },
                Err(error) => NetworkResponse::Failed { id, operation: Operation::Load, error },
            }
        }
        NetworkCommand::CreateComment { id, comment } => {
            tracing::info!(id, user_id = comment.user_id, parent_id = ?comment.parent_id, "Creating comment");
            match client.create(&comment).await {
                Ok(comment) => NetworkResponse::Created { id, comment },
                Err(error) => NetworkResponse::Failed { id, operation: Operation::Create, error },
            }
        }
        NetworkCommand::DeleteComment { id, comment_id, user_id } => {
            tracing::info!(id, comment_id, user_id, "Deleting comment");
            match client.delete(comment_id, user_id).await {
                Ok(()) => NetworkResponse::Deleted { id, comment_id },
                Err(error) => NetworkResponse::Failed { id, operation: Operation::Delete, error },
            }
        }
        NetworkCommand::Search { id, query, limit } => {
            tracing::info!(id, query = %query, limit, "Searching comments");
            match client.search(&query, limit).await {
                Ok(comments) => NetworkResponse::SearchResults { id, comments },
                Err(error) => NetworkResponse::Failed { id, operation: Operation::Search, error },
            }
        }
        NetworkCommand::Shutdown => return None,
    };
    tracing::info!(
        id,
        success = response.is_success(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Request completed"
    );
    Some(response)
}
