//! Command handlers - business logic for processing UI events and responses

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use crate::app::AppState;
use crate::app::state::{Notice, NoticeKind, SearchStatus};
use crate::messages::ui_events::{InputMode, Panel, Popup};
use crate::messages::{NetworkCommand, NetworkResponse, Operation};
use crate::tree::Applied;

/// File written by the HTML export
pub const EXPORT_FILE: &str = "threadview-export.html";

impl AppState {
    // ========================
    // Navigation
    // ========================

    pub fn next_panel(&mut self) {
        self.active_panel = self.active_panel.next();
        self.input_mode = InputMode::Normal;
    }

    pub fn prev_panel(&mut self) {
        self.active_panel = self.active_panel.prev();
        self.input_mode = InputMode::Normal;
    }

    pub fn next_node(&mut self) {
        if !self.rows.is_empty() {
            self.selected_node = (self.selected_node + 1) % self.rows.len();
        }
    }

    pub fn prev_node(&mut self) {
        if !self.rows.is_empty() {
            self.selected_node = self.selected_node
                .checked_sub(1)
                .unwrap_or(self.rows.len() - 1);
        }
    }

    pub fn next_field(&mut self) {
        self.form.field = self.form.field.next();
        self.cursor_position = self.current_input().len();
    }

    pub fn prev_field(&mut self) {
        self.form.field = self.form.field.prev();
        self.cursor_position = self.current_input().len();
    }

    pub fn clear_parent(&mut self) {
        self.form.parent_id.clear();
    }

    pub fn scroll_up(&mut self) {
        self.search.scroll = self.search.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.search.scroll = self.search.scroll.saturating_add(1);
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self) {
        if self.active_panel == Panel::Tree {
            return;
        }
        self.input_mode = InputMode::Editing;
        self.cursor_position = self.current_input().len();
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn move_cursor_left(&mut self) {
        let input = self.current_input();
        if self.cursor_position > 0 {
            let new_pos = input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.cursor_position = new_pos;
        }
    }

    pub fn move_cursor_right(&mut self) {
        let input = self.current_input();
        if self.cursor_position < input.len() {
            let new_pos = input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(input.len());
            self.cursor_position = new_pos;
        }
    }

    pub fn enter_char(&mut self, c: char) {
        let cursor_pos = self.cursor_position;
        if let Some(input) = self.current_input_mut() {
            if cursor_pos <= input.len() {
                input.insert(cursor_pos, c);
                self.cursor_position = cursor_pos + c.len_utf8();
            }
        }
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        let cursor_pos = self.cursor_position;
        if let Some(input) = self.current_input_mut() {
            let prev_pos = input[..cursor_pos]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            input.remove(prev_pos);
            self.cursor_position = prev_pos;
        }
    }

    // ========================
    // Tree loading
    // ========================

    /// Issue a reload of the current view; it supersedes any in flight
    pub fn reload(&mut self) -> Option<NetworkCommand> {
        let id = self.next_id();
        self.store.begin_reload(id);
        tracing::info!(id, query = ?self.store.query(), "Dispatching reload");
        Some(NetworkCommand::LoadForest {
            id,
            query: self.store.query().clone(),
        })
    }

    pub fn toggle_sort(&mut self) -> Option<NetworkCommand> {
        let query = self.store.query_mut();
        query.sort = Some(query.sort.unwrap_or_default().toggle());
        query.page = None;
        self.reload()
    }

    pub fn next_page(&mut self) -> Option<NetworkCommand> {
        let query = self.store.query_mut();
        if query.parent.is_some() {
            return None;
        }
        query.page = Some(query.page.unwrap_or(1) + 1);
        self.reload()
    }

    pub fn prev_page(&mut self) -> Option<NetworkCommand> {
        let query = self.store.query_mut();
        match query.page {
            Some(page) if page > 1 => {
                query.page = if page == 2 { None } else { Some(page - 1) };
                self.reload()
            }
            _ => None,
        }
    }

    /// Show only the selected comment's subtree
    pub fn focus_subtree(&mut self) -> Option<NetworkCommand> {
        let id = self.selected_comment()?;
        let query = self.store.query_mut();
        query.parent = Some(id);
        query.page = None;
        self.reload()
    }

    /// Leave subtree focus and show the whole forest again
    pub fn show_all(&mut self) -> Option<NetworkCommand> {
        let query = self.store.query_mut();
        if query.parent.take().is_none() {
            return None;
        }
        self.reload()
    }

    /// Re-render the stored forest, keeping the cursor on the same comment
    pub fn refresh_display(&mut self) {
        let selected = self.selected_comment();
        self.display = self.renderer.render(self.store.forest());
        self.rows = self.display.rows();
        self.selected_node = selected
            .and_then(|id| self.rows.iter().position(|r| r.id == id))
            .unwrap_or_else(|| self.selected_node.min(self.rows.len().saturating_sub(1)));
    }

    /// Write the rendered tree as a standalone HTML page
    pub fn export_html(&mut self) {
        let path = PathBuf::from(EXPORT_FILE);
        let page = format!(
            "<!doctype html>\n<meta charset=\"utf-8\">\n<title>Comments</title>\n{}\n",
            self.display.to_html()
        );
        self.status_message = Some(match fs::write(&path, page) {
            Ok(()) => format!("Exported {} comments to {}", self.display.len(), path.display()),
            Err(e) => format!("Export failed: {}", e),
        });
    }

    // ========================
    // Help popup
    // ========================

    pub fn toggle_help(&mut self) {
        self.popup = match self.popup {
            Popup::Help => Popup::None,
            _ => Popup::Help,
        };
    }

    pub fn close_help(&mut self) {
        self.popup = Popup::None;
    }

    // ========================
    // Response handling
    // ========================

    /// Fold a network response into the state.
    ///
    /// Returns the follow-up command, which is always a single reload after
    /// a successful mutation.
    pub fn handle_response(&mut self, response: NetworkResponse) -> Option<NetworkCommand> {
        match response {
            NetworkResponse::ForestLoaded { id, forest, time_ms } => {
                if self.store.apply(id, Ok(forest)) == Applied::Accepted {
                    tracing::info!(id, time_ms, "Forest loaded");
                    self.refresh_display();
                }
                None
            }
            NetworkResponse::Created { id, comment } => {
                if self.form.pending != Some(id) {
                    return None;
                }
                self.form.pending = None;
                self.form.content.clear();
                if self.active_panel == Panel::Form {
                    self.cursor_position = self.current_input().len();
                }
                self.form.notice = Some(Notice {
                    kind: NoticeKind::Confirmation,
                    text: match comment {
                        Some(c) => format!("Created #{}", c.id),
                        None => String::from("Created"),
                    },
                    expires_at: Some(Instant::now() + self.confirmation_delay),
                });
                self.reload()
            }
            NetworkResponse::Deleted { id, comment_id } => {
                if !self.delete_prompt.pending.remove(&id) {
                    return None;
                }
                self.status_message = Some(format!("Deleted #{}", comment_id));
                self.reload()
            }
            NetworkResponse::SearchResults { id, comments } => {
                if self.search.pending != Some(id) {
                    tracing::warn!(id, "Discarding stale search response");
                    return None;
                }
                self.search.pending = None;
                self.search.status = if comments.is_empty() {
                    SearchStatus::NoResults
                } else {
                    SearchStatus::Results(self.renderer.render_flat(&comments, self.search_limit))
                };
                None
            }
            NetworkResponse::Failed { id, operation, error } => {
                tracing::warn!(id, operation = operation.as_str(), error = %error, "Request failed");
                match operation {
                    Operation::Load => {
                        self.store.apply(id, Err(error));
                    }
                    Operation::Create => {
                        if self.form.pending == Some(id) {
                            self.form.pending = None;
                            self.form.notice = Some(Notice {
                                kind: NoticeKind::Error,
                                text: error.to_string(),
                                expires_at: None,
                            });
                        }
                    }
                    Operation::Delete => {
                        if self.delete_prompt.pending.remove(&id) {
                            self.status_message = None;
                            self.show_alert(error.to_string());
                        }
                    }
                    Operation::Search => {
                        if self.search.pending == Some(id) {
                            self.search.pending = None;
                            self.search.status = SearchStatus::Failed(error.to_string());
                        }
                    }
                }
                None
            }
        }
    }
}
