//! Render state - data structure sent from App layer to UI for rendering

use crate::app::state::{Notice, SearchStatus};
use crate::constants::DEFAULT_API_BASE;
use crate::messages::ui_events::{FormField, InputMode, Panel, Popup};
use crate::models::SortOrder;
use crate::renderer::DisplayRow;
use crate::tree::LoadState;

/// Complete state needed by the UI to render
#[derive(Debug, Clone)]
pub struct RenderState {
    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub popup: Popup,
    pub api_base: String,

    // Comment tree
    pub tree_rows: Vec<DisplayRow>,
    pub selected_node: usize,
    pub tree_state: LoadState,
    pub total_comments: usize,
    pub sort: SortOrder,
    pub page: u32,
    /// Root of the focused subtree, if any
    pub focus: Option<i64>,

    // Create form
    pub form_user_id: String,
    pub form_parent_id: String,
    pub form_content: String,
    pub form_field: FormField,
    pub form_notice: Option<Notice>,
    pub form_submitting: bool,

    // Search
    pub search_query: String,
    pub search_status: SearchStatus,
    pub search_scroll: u16,

    // Delete prompt
    pub delete_target: Option<i64>,
    pub delete_input: String,

    pub alert: Option<String>,
    pub status_message: Option<String>,
}

impl Default for RenderState {
    fn default() -> Self {
        RenderState {
            active_panel: Panel::Tree,
            input_mode: InputMode::Normal,
            cursor_position: 0,
            popup: Popup::None,
            api_base: String::from(DEFAULT_API_BASE),
            tree_rows: Vec::new(),
            selected_node: 0,
            tree_state: LoadState::Idle,
            total_comments: 0,
            sort: SortOrder::Asc,
            page: 1,
            focus: None,
            form_user_id: String::new(),
            form_parent_id: String::new(),
            form_content: String::new(),
            form_field: FormField::Content,
            form_notice: None,
            form_submitting: false,
            search_query: String::new(),
            search_status: SearchStatus::NotSearched,
            search_scroll: 0,
            delete_target: None,
            delete_input: String::new(),
            alert: None,
            status_message: None,
        }
    }
}
