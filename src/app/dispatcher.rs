//! Action dispatcher - turns user actions into backend commands
//!
//! Preconditions are checked here, before anything reaches the network
//! layer. Responses to these commands are folded back in by
//! [`AppState::handle_response`](crate::app::AppState::handle_response),
//! which also issues the follow-up reload.

use crate::app::AppState;
use crate::constants::MIN_SEARCH_CHARS;
use crate::error::ClientError;
use crate::messages::ui_events::{FormField, InputMode, Panel, Popup};
use crate::messages::NetworkCommand;
use crate::models::NewComment;
use crate::renderer::NodeAction;
use crate::app::state::{Notice, NoticeKind, SearchStatus};

/// Handler attached to a node affordance; receives the node's comment id
pub type NodeHandler = fn(&mut AppState, i64) -> Option<NetworkCommand>;

/// Fixed table of node affordances and their handlers
pub const NODE_ACTIONS: [(NodeAction, NodeHandler); 2] = [
    (NodeAction::Reply, AppState::reply_to as NodeHandler),
    (NodeAction::Delete, AppState::request_delete as NodeHandler),
];

pub fn handler_for(action: NodeAction) -> NodeHandler {
    NODE_ACTIONS
        .iter()
        .find(|(a, _)| *a == action)
        .map(|(_, h)| *h)
        .unwrap_or(AppState::ignore_node)
}

/// Parse the create form into a request body
pub fn parse_form(user_id: &str, parent_id: &str, content: &str) -> Result<NewComment, ClientError> {
    let user_id = user_id
        .trim()
        .parse::<i64>()
        .map_err(|_| ClientError::validation("User ID must be an integer"))?;

    let parent_id = match parent_id.trim() {
        "" => None,
        raw => Some(
            raw.parse::<i64>()
                .map_err(|_| ClientError::validation("Parent ID must be an integer"))?,
        ),
    };

    let content = content.trim();
    if content.is_empty() {
        return Err(ClientError::validation("Comment cannot be empty"));
    }

    Ok(NewComment {
        user_id,
        content: content.to_string(),
        parent_id,
    })
}

/// Check a search query; returns the trimmed query
pub fn validate_query(query: &str) -> Result<&str, ClientError> {
    let trimmed = query.trim();
    if trimmed.chars().count() < MIN_SEARCH_CHARS {
        return Err(ClientError::validation(format!(
            "Minimum {} characters",
            MIN_SEARCH_CHARS
        )));
    }
    Ok(trimmed)
}

impl AppState {
    // ========================
    // Node affordances
    // ========================

    /// Run a node action against the selected comment
    pub fn dispatch_node_action(&mut self, action: NodeAction) -> Option<NetworkCommand> {
        let id = self.selected_comment()?;
        handler_for(action)(self, id)
    }

    /// Pre-fill the parent field and jump to the content input
    pub fn reply_to(&mut self, comment_id: i64) -> Option<NetworkCommand> {
        self.form.parent_id = comment_id.to_string();
        self.form.field = FormField::Content;
        self.active_panel = Panel::Form;
        self.input_mode = InputMode::Editing;
        self.cursor_position = self.form.content.len();
        None
    }

    /// Ask for the requesting user's id before deleting
    pub fn request_delete(&mut self, comment_id: i64) -> Option<NetworkCommand> {
        self.delete_prompt.comment_id = Some(comment_id);
        self.delete_prompt.user_input = self.form.user_id.trim().to_string();
        self.popup = Popup::DeletePrompt;
        None
    }

    fn ignore_node(&mut self, _comment_id: i64) -> Option<NetworkCommand> {
        None
    }

    // ========================
    // Delete prompt
    // ========================

    pub fn delete_prompt_char(&mut self, c: char) {
        self.delete_prompt.user_input.push(c);
    }

    pub fn delete_prompt_backspace(&mut self) {
        self.delete_prompt.user_input.pop();
    }

    pub fn cancel_delete(&mut self) {
        self.delete_prompt.comment_id = None;
        self.delete_prompt.user_input.clear();
        self.popup = Popup::None;
    }

    /// Send the delete; an empty user id cancels silently
    pub fn confirm_delete(&mut self) -> Option<NetworkCommand> {
        let comment_id = self.delete_prompt.comment_id?;
        let input = self.delete_prompt.user_input.trim().to_string();
        self.cancel_delete();

        if input.is_empty() {
            return None;
        }

        let user_id = match input.parse::<i64>() {
            Ok(user_id) => user_id,
            Err(_) => {
                self.show_alert(ClientError::validation("User ID must be an integer").to_string());
                return None;
            }
        };

        let id = self.next_id();
        self.delete_prompt.pending.insert(id);
        self.status_message = Some(format!("Deleting #{}...", comment_id));
        tracing::info!(id, comment_id, user_id, "Dispatching delete");
        Some(NetworkCommand::DeleteComment {
            id,
            comment_id,
            user_id,
        })
    }

    /// Open the alert popup; a message already showing is kept above the new one
    pub fn show_alert(&mut self, message: String) {
        self.alert = Some(match self.alert.take() {
            Some(previous) if self.popup == Popup::Alert => format!("{}\n{}", previous, message),
            _ => message,
        });
        self.popup = Popup::Alert;
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
        self.popup = Popup::None;
    }

    // ========================
    // Create
    // ========================

    /// Validate the form and send a create request
    pub fn submit_comment(&mut self) -> Option<NetworkCommand> {
        if self.form.pending.is_some() {
            return None;
        }
        self.input_mode = InputMode::Normal;
        self.form.notice = None;

        let comment = match parse_form(&self.form.user_id, &self.form.parent_id, &self.form.content) {
            Ok(comment) => comment,
            Err(e) => {
                self.form.notice = Some(Notice {
                    kind: NoticeKind::Error,
                    text: e.to_string(),
                    expires_at: None,
                });
                return None;
            }
        };

        let id = self.next_id();
        self.form.pending = Some(id);
        tracing::info!(id, user_id = comment.user_id, parent_id = ?comment.parent_id, "Dispatching create");
        Some(NetworkCommand::CreateComment { id, comment })
    }

    // ========================
    // Search
    // ========================

    /// Validate the query and send a search request
    pub fn run_search(&mut self) -> Option<NetworkCommand> {
        self.input_mode = InputMode::Normal;
        self.search.scroll = 0;

        let query = match validate_query(&self.search.query) {
            Ok(query) => query.to_string(),
            Err(_) => {
                self.search.pending = None;
                self.search.status = SearchStatus::TooShort;
                return None;
            }
        };

        let id = self.next_id();
        self.search.pending = Some(id);
        self.search.status = SearchStatus::Searching;
        tracing::info!(id, query = %query, "Dispatching search");
        Some(NetworkCommand::Search {
            id,
            query,
            limit: self.search_limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Comment;

    fn state_with_tree() -> AppState {
        let mut state = AppState::default();
        let forest = vec![Comment {
            id: 1,
            user_id: 7,
            content: "root".into(),
            created_at: None,
            updated_at: None,
            parent_id: None,
            children: vec![Comment {
                id: 2,
                user_id: 8,
                content: "re".into(),
                created_at: None,
                updated_at: None,
                parent_id: Some(1),
                children: vec![],
            }],
        }];
        state.store.begin_reload(100);
        state.store.apply(100, Ok(forest));
        state.refresh_display();
        state
    }

    #[test]
    fn test_parse_form_rejects_blank_content() {
        assert_eq!(
            parse_form("7", "", "   \n "),
            Err(ClientError::validation("Comment cannot be empty"))
        );
        assert!(parse_form("seven", "", "hi").unwrap_err().is_validation());
        assert!(parse_form("7", "x1", "hi").is_err());
    }

    #[test]
    fn test_parse_form_trims_and_omits_parent() {
        let comment = parse_form(" 7 ", "  ", "  hello  ").unwrap();
        assert_eq!(comment, NewComment { user_id: 7, content: "hello".into(), parent_id: None });
        assert_eq!(parse_form("7", "12", "x").unwrap().parent_id, Some(12));
    }

    #[test]
    fn test_validate_query_counts_characters() {
        assert!(validate_query("ab").is_err());
        assert!(validate_query("  ab  ").is_err());
        assert_eq!(validate_query(" abc "), Ok("abc"));
        assert_eq!(validate_query("日本語"), Ok("日本語"));
    }

    #[test]
    fn test_reply_prefills_parent_without_network() {
        let mut state = state_with_tree();
        state.selected_node = 1;
        assert_eq!(state.dispatch_node_action(NodeAction::Reply), None);
        assert_eq!(state.form.parent_id, "2");
        assert_eq!(state.active_panel, Panel::Form);
        assert_eq!(state.form.field, FormField::Content);
        assert_eq!(state.input_mode, InputMode::Editing);
    }

    #[test]
    fn test_delete_goes_through_prompt() {
        let mut state = state_with_tree();
        state.selected_node = 1;
        assert_eq!(state.dispatch_node_action(NodeAction::Delete), None);
        assert_eq!(state.popup, Popup::DeletePrompt);

        state.delete_prompt_char('8');
        let cmd = state.confirm_delete().unwrap();
        assert!(matches!(cmd, NetworkCommand::DeleteComment { comment_id: 2, user_id: 8, .. }));
        assert_eq!(state.popup, Popup::None);
    }

    #[test]
    fn test_empty_delete_prompt_cancels() {
        let mut state = state_with_tree();
        state.request_delete(1);
        assert_eq!(state.confirm_delete(), None);
        assert_eq!(state.popup, Popup::None);
        assert!(state.alert.is_none());
    }

    #[test]
    fn test_non_numeric_delete_user_alerts() {
        let mut state = state_with_tree();
        state.request_delete(1);
        state.delete_prompt_char('x');
        assert_eq!(state.confirm_delete(), None);
        assert_eq!(state.popup, Popup::Alert);
        assert_eq!(state.alert.as_deref(), Some("User ID must be an integer"));
    }

    #[test]
    fn test_invalid_create_sends_nothing() {
        let mut state = AppState::default();
        state.form.user_id = "7".into();
        state.form.content = "   ".into();
        assert_eq!(state.submit_comment(), None);
        let notice = state.form.notice.clone().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.expires_at, None);
        assert!(state.form.pending.is_none());
    }

    #[test]
    fn test_create_without_parent() {
        let mut state = AppState::default();
        state.form.user_id = "7".into();
        state.form.content = "hello".into();
        match state.submit_comment() {
            Some(NetworkCommand::CreateComment { comment, .. }) => {
                assert_eq!(comment.parent_id, None);
                let body = serde_json::to_value(&comment).unwrap();
                assert!(body.get("parent_id").is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
        // A second submit while the first is in flight is ignored
        assert_eq!(state.submit_comment(), None);
    }

    #[test]
    fn test_short_search_never_hits_network() {
        let mut state = AppState::default();
        state.search.query = "ab".into();
        assert_eq!(state.run_search(), None);
        assert_eq!(state.search.status, SearchStatus::TooShort);
    }

    #[test]
    fn test_search_uses_configured_limit() {
        let mut state = AppState::default();
        state.search.query = " rust ".into();
        match state.run_search() {
            Some(NetworkCommand::Search { query, limit, .. }) => {
                assert_eq!(query, "rust");
                assert_eq!(limit, 20);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(state.search.status, SearchStatus::Searching);
    }
}
