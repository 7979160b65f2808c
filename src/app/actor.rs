//! App actor - message loop processing UI events and network responses

use std::time::Instant;
use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::config::Config;
use crate::messages::ui_events::InputMode;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        config: &Config,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state: AppState::new(config),
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) {
        // Initial load
        let initial = self.state.reload();
        self.send(initial);
        let _ = self.render_tx.send(self.state.to_render_state());

        loop {
            let deadline = self.state.notice_deadline();
            let expiry = tokio::time::sleep_until(
                deadline
                    .map(tokio::time::Instant::from_std)
                    .unwrap_or_else(tokio::time::Instant::now),
            );

            tokio::select! {
                Some(event) = ui_rx.recv() => {
                    if self.handle_ui_event(event) {
                        // Quit signal received
                        let _ = self.network_tx.send(NetworkCommand::Shutdown);
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(response) = net_rx.recv() => {
                    let follow_up = self.state.handle_response(response);
                    self.send(follow_up);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                _ = expiry, if deadline.is_some() => {
                    self.state.expire_notices(Instant::now());
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                else => break,
            }
        }
    }

    fn send(&self, cmd: Option<NetworkCommand>) {
        if let Some(cmd) = cmd {
            let _ = self.network_tx.send(cmd);
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        let cmd = match event {
            // Panel navigation
            UiEvent::NextPanel => { self.state.next_panel(); None }
            UiEvent::PrevPanel => { self.state.prev_panel(); None }

            // Tree
            UiEvent::NextNode => { self.state.next_node(); None }
            UiEvent::PrevNode => { self.state.prev_node(); None }
            UiEvent::Node(action) => self.state.dispatch_node_action(action),
            UiEvent::Reload => self.state.reload(),
            UiEvent::ToggleSort => self.state.toggle_sort(),
            UiEvent::NextPage => self.state.next_page(),
            UiEvent::PrevPage => self.state.prev_page(),
            UiEvent::FocusSubtree => self.state.focus_subtree(),
            UiEvent::ShowAll => self.state.show_all(),
            UiEvent::ExportHtml => { self.state.export_html(); None }

            // Form
            UiEvent::NextField => { self.state.next_field(); None }
            UiEvent::PrevField => { self.state.prev_field(); None }
            UiEvent::SubmitComment => self.state.submit_comment(),
            UiEvent::ClearParent => { self.state.clear_parent(); None }

            // Search
            UiEvent::RunSearch => self.state.run_search(),
            UiEvent::ScrollUp => { self.state.scroll_up(); None }
            UiEvent::ScrollDown => { self.state.scroll_down(); None }

            // Input editing
            UiEvent::StartEditing => { self.state.start_editing(); None }
            UiEvent::StopEditing => { self.state.stop_editing(); None }
            UiEvent::CharInput(c) => { self.state.enter_char(c); None }
            UiEvent::Backspace => { self.state.delete_char(); None }
            UiEvent::CursorLeft => { self.state.move_cursor_left(); None }
            UiEvent::CursorRight => { self.state.move_cursor_right(); None }

            // Delete prompt
            UiEvent::DeletePromptChar(c) => { self.state.delete_prompt_char(c); None }
            UiEvent::DeletePromptBackspace => { self.state.delete_prompt_backspace(); None }
            UiEvent::ConfirmDelete => self.state.confirm_delete(),
            UiEvent::CancelDelete => { self.state.cancel_delete(); None }

            // Popups
            UiEvent::DismissAlert => { self.state.dismiss_alert(); None }
            UiEvent::ToggleHelp => { self.state.toggle_help(); None }
            UiEvent::CloseHelp => { self.state.close_help(); None }

            // System
            UiEvent::Quit => return true,
        };

        if self.state.input_mode == InputMode::Editing && cmd.is_some() {
            self.state.stop_editing();
        }
        self.send(cmd);
        false
    }
}
