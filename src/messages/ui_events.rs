//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::renderer::NodeAction;

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Panel navigation
    NextPanel,
    PrevPanel,

    // Tree panel
    NextNode,
    PrevNode,
    Node(NodeAction),
    Reload,
    ToggleSort,
    NextPage,
    PrevPage,
    FocusSubtree,
    ShowAll,
    ExportHtml,

    // Create form
    NextField,
    PrevField,
    SubmitComment,
    ClearParent,

    // Search panel
    RunSearch,
    ScrollUp,
    ScrollDown,

    // Input editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    CursorLeft,
    CursorRight,

    // Delete prompt
    DeletePromptChar(char),
    DeletePromptBackspace,
    ConfirmDelete,
    CancelDelete,

    // Popups
    DismissAlert,
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Active panel in the UI (needed for context-aware event mapping)
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Panel {
    #[default]
    Tree,
    Form,
    Search,
}

impl Panel {
    pub fn next(&self) -> Panel {
        match self {
            Panel::Tree => Panel::Form,
            Panel::Form => Panel::Search,
            Panel::Search => Panel::Tree,
        }
    }

    pub fn prev(&self) -> Panel {
        match self {
            Panel::Tree => Panel::Search,
            Panel::Form => Panel::Tree,
            Panel::Search => Panel::Form,
        }
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Field of the create form
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum FormField {
    UserId,
    ParentId,
    #[default]
    Content,
}

impl FormField {
    pub fn next(&self) -> FormField {
        match self {
            FormField::UserId => FormField::ParentId,
            FormField::ParentId => FormField::Content,
            FormField::Content => FormField::UserId,
        }
    }

    pub fn prev(&self) -> FormField {
        match self {
            FormField::UserId => FormField::Content,
            FormField::ParentId => FormField::UserId,
            FormField::Content => FormField::ParentId,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::UserId => "User ID",
            FormField::ParentId => "Parent ID",
            FormField::Content => "Content",
        }
    }
}

/// Modal popup currently capturing input
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Popup {
    #[default]
    None,
    Help,
    DeletePrompt,
    Alert,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    active_panel: Panel,
    input_mode: InputMode,
    popup: Popup,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiEvent::Quit);
    }

    // Popups capture everything
    match popup {
        Popup::Help => return Some(UiEvent::CloseHelp),
        Popup::Alert => return Some(UiEvent::DismissAlert),
        Popup::DeletePrompt => {
            return match key.code {
                KeyCode::Esc => Some(UiEvent::CancelDelete),
                KeyCode::Enter => Some(UiEvent::ConfirmDelete),
                KeyCode::Backspace => Some(UiEvent::DeletePromptBackspace),
                KeyCode::Char(c) => Some(UiEvent::DeletePromptChar(c)),
                _ => None,
            };
        }
        Popup::None => {}
    }

    match input_mode {
        InputMode::Normal => handle_normal_keys(key, active_panel),
        InputMode::Editing => handle_editing_keys(key, active_panel),
    }
}

fn handle_normal_keys(key: KeyEvent, active_panel: Panel) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => return Some(UiEvent::Quit),
        KeyCode::Char('?') => return Some(UiEvent::ToggleHelp),
        KeyCode::Tab => return Some(UiEvent::NextPanel),
        KeyCode::BackTab => return Some(UiEvent::PrevPanel),
        KeyCode::Char('R') | KeyCode::F(5) => return Some(UiEvent::Reload),
        _ => {}
    }

    match active_panel {
        Panel::Tree => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(UiEvent::PrevNode),
            KeyCode::Down | KeyCode::Char('j') => Some(UiEvent::NextNode),
            KeyCode::Char(c) if c == NodeAction::Reply.key() => Some(UiEvent::Node(NodeAction::Reply)),
            KeyCode::Char(c) if c == NodeAction::Delete.key() => Some(UiEvent::Node(NodeAction::Delete)),
            KeyCode::Char('o') => Some(UiEvent::ToggleSort),
            KeyCode::Char(']') | KeyCode::PageDown => Some(UiEvent::NextPage),
            KeyCode::Char('[') | KeyCode::PageUp => Some(UiEvent::PrevPage),
            KeyCode::Char('f') | KeyCode::Enter => Some(UiEvent::FocusSubtree),
            KeyCode::Char('a') | KeyCode::Esc => Some(UiEvent::ShowAll),
            KeyCode::Char('x') => Some(UiEvent::ExportHtml),
            _ => None,
        },
        Panel::Form => match key.code {
            KeyCode::Up => Some(UiEvent::PrevField),
            KeyCode::Down => Some(UiEvent::NextField),
            KeyCode::Char('e') | KeyCode::Enter => Some(UiEvent::StartEditing),
            KeyCode::Char('s') => Some(UiEvent::SubmitComment),
            KeyCode::Char('c') => Some(UiEvent::ClearParent),
            _ => None,
        },
        Panel::Search => match key.code {
            KeyCode::Up => Some(UiEvent::ScrollUp),
            KeyCode::Down => Some(UiEvent::ScrollDown),
            KeyCode::Char('e') | KeyCode::Char('/') => Some(UiEvent::StartEditing),
            KeyCode::Char('s') | KeyCode::Enter => Some(UiEvent::RunSearch),
            _ => None,
        },
    }
}

fn handle_editing_keys(key: KeyEvent, active_panel: Panel) -> Option<UiEvent> {
    match key.code {
        KeyCode::Esc => Some(UiEvent::StopEditing),
        KeyCode::Left => Some(UiEvent::CursorLeft),
        KeyCode::Right => Some(UiEvent::CursorRight),
        KeyCode::Backspace => Some(UiEvent::Backspace),
        KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
        KeyCode::Tab if active_panel == Panel::Form => Some(UiEvent::NextField),
        KeyCode::Enter => match active_panel {
            Panel::Form => Some(UiEvent::SubmitComment),
            Panel::Search => Some(UiEvent::RunSearch),
            Panel::Tree => Some(UiEvent::StopEditing),
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_tree_action_keys() {
        let ev = key_to_ui_event(press(KeyCode::Char('r')), Panel::Tree, InputMode::Normal, Popup::None);
        assert_eq!(ev, Some(UiEvent::Node(NodeAction::Reply)));
        let ev = key_to_ui_event(press(KeyCode::Char('d')), Panel::Tree, InputMode::Normal, Popup::None);
        assert_eq!(ev, Some(UiEvent::Node(NodeAction::Delete)));
    }

    #[test]
    fn test_delete_prompt_captures_input() {
        let ev = key_to_ui_event(press(KeyCode::Char('q')), Panel::Tree, InputMode::Normal, Popup::DeletePrompt);
        assert_eq!(ev, Some(UiEvent::DeletePromptChar('q')));
        let ev = key_to_ui_event(press(KeyCode::Enter), Panel::Tree, InputMode::Normal, Popup::DeletePrompt);
        assert_eq!(ev, Some(UiEvent::ConfirmDelete));
    }

    #[test]
    fn test_enter_while_editing_submits_per_panel() {
        let ev = key_to_ui_event(press(KeyCode::Enter), Panel::Form, InputMode::Editing, Popup::None);
        assert_eq!(ev, Some(UiEvent::SubmitComment));
        let ev = key_to_ui_event(press(KeyCode::Enter), Panel::Search, InputMode::Editing, Popup::None);
        assert_eq!(ev, Some(UiEvent::RunSearch));
        let ev = key_to_ui_event(press(KeyCode::Char('q')), Panel::Search, InputMode::Editing, Popup::None);
        assert_eq!(ev, Some(UiEvent::CharInput('q')));
    }

    #[test]
    fn test_alert_dismissed_by_any_key() {
        let ev = key_to_ui_event(press(KeyCode::Char('x')), Panel::Form, InputMode::Normal, Popup::Alert);
        assert_eq!(ev, Some(UiEvent::DismissAlert));
    }
}
