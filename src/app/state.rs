//! App state - pure data structure with no network I/O

use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::messages::ui_events::{FormField, InputMode, Panel, Popup};
use crate::messages::RenderState;
use crate::renderer::{DisplayRow, DisplayTree, Renderer};
use crate::tree::TreeStore;

/// Kind of message shown under the create form
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Confirmation,
    Error,
}

/// Inline message near the create form
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    /// `None` keeps the notice until the next attempt
    pub expires_at: Option<Instant>,
}

/// Create form fields, kept as typed text
#[derive(Clone, Debug, Default)]
pub struct CreateForm {
    pub user_id: String,
    pub parent_id: String,
    pub content: String,
    pub field: FormField,
    pub notice: Option<Notice>,
    pub pending: Option<u64>,
}

/// Search panel status
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SearchStatus {
    #[default]
    NotSearched,
    /// Query shorter than the minimum; nothing was sent
    TooShort,
    Searching,
    Results(Vec<DisplayRow>),
    NoResults,
    Failed(String),
}

#[derive(Clone, Debug, Default)]
pub struct SearchPanel {
    pub query: String,
    pub status: SearchStatus,
    pub pending: Option<u64>,
    pub scroll: u16,
}

/// Pending delete awaiting the requesting user's id
#[derive(Clone, Debug, Default)]
pub struct DeletePrompt {
    pub comment_id: Option<i64>,
    pub user_input: String,
    /// Deletes in flight; several may overlap
    pub pending: HashSet<u64>,
}

/// Main application state - the single owner of everything on screen
pub struct AppState {
    pub renderer: Renderer,
    pub store: TreeStore,
    pub display: DisplayTree,
    pub rows: Vec<DisplayRow>,
    pub selected_node: usize,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub popup: Popup,

    pub form: CreateForm,
    pub search: SearchPanel,
    pub delete_prompt: DeletePrompt,
    pub alert: Option<String>,
    pub status_message: Option<String>,

    pub next_request_id: u64,
    pub api_base: String,
    pub search_limit: usize,
    pub confirmation_delay: Duration,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        AppState {
            renderer: Renderer::new(config.timestamp_format.clone()),
            store: TreeStore::new(),
            display: DisplayTree::default(),
            rows: Vec::new(),
            selected_node: 0,
            active_panel: Panel::Tree,
            input_mode: InputMode::Normal,
            cursor_position: 0,
            popup: Popup::None,
            form: CreateForm {
                user_id: config.default_user_id.map(|id| id.to_string()).unwrap_or_default(),
                ..CreateForm::default()
            },
            search: SearchPanel::default(),
            delete_prompt: DeletePrompt::default(),
            alert: None,
            status_message: None,
            next_request_id: 1,
            api_base: config.api_base.clone(),
            search_limit: config.search_limit,
            confirmation_delay: config.confirmation_delay(),
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Id of the comment under the tree cursor
    pub fn selected_comment(&self) -> Option<i64> {
        self.rows.get(self.selected_node).map(|r| r.id)
    }

    /// Get the current input field content
    pub fn current_input(&self) -> &str {
        match self.active_panel {
            Panel::Form => match self.form.field {
                FormField::UserId => &self.form.user_id,
                FormField::ParentId => &self.form.parent_id,
                FormField::Content => &self.form.content,
            },
            Panel::Search => &self.search.query,
            Panel::Tree => "",
        }
    }

    /// Get mutable reference to current input field
    pub fn current_input_mut(&mut self) -> Option<&mut String> {
        match self.active_panel {
            Panel::Form => Some(match self.form.field {
                FormField::UserId => &mut self.form.user_id,
                FormField::ParentId => &mut self.form.parent_id,
                FormField::Content => &mut self.form.content,
            }),
            Panel::Search => Some(&mut self.search.query),
            Panel::Tree => None,
        }
    }

    /// Earliest instant at which a notice should disappear
    pub fn notice_deadline(&self) -> Option<Instant> {
        self.form.notice.as_ref().and_then(|n| n.expires_at)
    }

    /// Drop notices whose deadline has passed
    pub fn expire_notices(&mut self, now: Instant) {
        if matches!(self.notice_deadline(), Some(deadline) if deadline <= now) {
            self.form.notice = None;
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        let query = self.store.query();
        RenderState {
            active_panel: self.active_panel,
            input_mode: self.input_mode,
            cursor_position: self.cursor_position,
            popup: self.popup,
            api_base: self.api_base.clone(),
            tree_rows: self.rows.clone(),
            selected_node: self.selected_node,
            tree_state: self.store.state().clone(),
            total_comments: self.display.len(),
            sort: query.sort.unwrap_or_default(),
            page: query.page.unwrap_or(1),
            focus: query.parent,
            form_user_id: self.form.user_id.clone(),
            form_parent_id: self.form.parent_id.clone(),
            form_content: self.form.content.clone(),
            form_field: self.form.field,
            form_notice: self.form.notice.clone(),
            form_submitting: self.form.pending.is_some(),
            search_query: self.search.query.clone(),
            search_status: self.search.status.clone(),
            search_scroll: self.search.scroll,
            delete_target: self.delete_prompt.comment_id,
            delete_input: self.delete_prompt.user_input.clone(),
            alert: self.alert.clone(),
            status_message: self.status_message.clone(),
        }
    }
}
