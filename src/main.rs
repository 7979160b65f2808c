//! threadview - Actor-based terminal client for threaded comments
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async calls to the comments backend

use std::io;
use std::time::Duration;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::*,
};
use tokio::sync::mpsc;

use threadview::app::state::SearchStatus;
use threadview::constants::{APP_NAME, LOG_FILE, MIN_SEARCH_CHARS};
use threadview::messages::ui_events::{key_to_ui_event, FormField, InputMode, Panel, Popup};
use threadview::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use threadview::renderer::escape_html;
use threadview::tree::LoadState;
use threadview::ui::{comment_item, notice_line, render_input, render_tabs};
use threadview::{AppActor, CommentsClient, Config, NetworkActor};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let config_path = Config::default_path();
    let config = Config::load()?;
    if !config_path.exists() {
        if let Err(e) = Config::default().save_to(&config_path) {
            tracing::warn!(error = %e, path = %config_path.display(), "Could not write default config");
        }
    }
    tracing::info!(api_base = %config.api_base, "Starting {}", APP_NAME);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let client = CommentsClient::new(config.api_base.clone(), config.request_timeout());
    let network_actor = NetworkActor::new(client, net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(&config, net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        terminal.draw(|f| draw_ui(f, &current_state))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.active_panel,
                    current_state.input_mode,
                    current_state.popup,
                ) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // Title bar
            Constraint::Min(0),     // Content
            Constraint::Length(1),  // Status bar
        ])
        .split(area);

    draw_title_bar(f, state, main_chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(main_chunks[1]);

    draw_tree(f, state, columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(12), // Create form
            Constraint::Min(5),     // Search
        ])
        .split(columns[1]);

    draw_form(f, state, right[0]);
    draw_search(f, state, right[1]);

    draw_status_bar(f, state, main_chunks[2]);

    match state.popup {
        Popup::Help => draw_help_popup(f, area),
        Popup::DeletePrompt => draw_delete_popup(f, state, area),
        Popup::Alert => draw_alert_popup(f, state, area),
        Popup::None => {}
    }
}

fn draw_title_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let panels = ["Tree", "Form", "Search"];
    let selected = match state.active_panel {
        Panel::Tree => 0,
        Panel::Form => 1,
        Panel::Search => 2,
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(0)])
        .split(area);

    f.render_widget(render_tabs(&panels, selected), chunks[0]);

    let view = match state.focus {
        Some(id) => format!("subtree #{}", id),
        None => format!("page {}", state.page),
    };
    let info = Line::from(vec![
        Span::styled(format!(" {} ", APP_NAME), Style::default().fg(Color::Black).bg(Color::Cyan).bold()),
        Span::raw(format!(" {} · {} · sort {} ", state.api_base, view, state.sort.as_str())),
    ]);
    f.render_widget(Paragraph::new(info), chunks[1]);
}

fn border_style(is_focused: bool, is_editing: bool) -> Style {
    if is_focused && is_editing {
        Style::default().fg(Color::Yellow)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn draw_tree(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Tree;
    let loading = if state.tree_state == LoadState::Loading { " [...]" } else { "" };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(is_focused, false))
        .title(format!(" Comments ({}){} ", state.total_comments, loading));

    let placeholder = match &state.tree_state {
        LoadState::Failed(message) => Some(Line::from(Span::styled(
            escape_html(message),
            Style::default().fg(Color::Red),
        ))),
        LoadState::Idle | LoadState::Loading if state.tree_rows.is_empty() => {
            Some(Line::from(Span::styled("Loading...", Style::default().fg(Color::DarkGray))))
        }
        LoadState::Loaded if state.tree_rows.is_empty() => Some(Line::from(Span::styled(
            "No comments yet. Tab to the form to write one.",
            Style::default().fg(Color::DarkGray),
        ))),
        _ => None,
    };

    if let Some(line) = placeholder {
        let paragraph = Paragraph::new(line).block(block).wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = state
        .tree_rows
        .iter()
        .enumerate()
        .map(|(i, row)| comment_item(row, is_focused && i == state.selected_node))
        .collect();

    let highlight = if is_focused {
        Style::default().bg(Color::DarkGray)
    } else {
        Style::default()
    };

    let list = List::new(items).block(block).highlight_style(highlight);
    let mut list_state = ListState::default();
    list_state.select(Some(state.selected_node));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_form(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Form;
    let is_editing = is_focused && state.input_mode == InputMode::Editing;

    let title = if state.form_submitting { " New comment [...] " } else { " New comment (s:send c:clear parent) " };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(is_focused, is_editing))
        .title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(inner);

    let fields = [
        (FormField::UserId, state.form_user_id.as_str()),
        (FormField::ParentId, state.form_parent_id.as_str()),
        (FormField::Content, state.form_content.as_str()),
    ];
    for (i, (field, value)) in fields.iter().enumerate() {
        let selected = is_focused && state.form_field == *field;
        let widget = render_input(value, field.label(), selected, is_editing);
        f.render_widget(widget, rows[i]);

        if selected && is_editing {
            let max_x = rows[i].x + rows[i].width.saturating_sub(2);
            let cursor_x = (rows[i].x + state.cursor_position as u16 + 1).min(max_x);
            f.set_cursor_position(Position::new(cursor_x, rows[i].y + 1));
        }
    }

    if let Some(notice) = &state.form_notice {
        f.render_widget(Paragraph::new(notice_line(notice)), rows[3]);
    }
}

fn draw_search(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Search;
    let is_editing = is_focused && state.input_mode == InputMode::Editing;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let input = render_input(&state.search_query, " Search (e:edit Enter:search) ", is_focused, is_editing);
    f.render_widget(input, chunks[0]);
    if is_editing {
        let max_x = chunks[0].x + chunks[0].width.saturating_sub(2);
        let cursor_x = (chunks[0].x + state.cursor_position as u16 + 1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, chunks[0].y + 1));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(is_focused, false))
        .title(" Results ");

    let dim = Style::default().fg(Color::DarkGray);
    let lines: Vec<Line> = match &state.search_status {
        SearchStatus::NotSearched => vec![Line::from(Span::styled("Type a query and press Enter", dim))],
        SearchStatus::TooShort => vec![Line::from(Span::styled(
            format!("Minimum {} characters", MIN_SEARCH_CHARS),
            Style::default().fg(Color::Yellow),
        ))],
        SearchStatus::Searching => vec![Line::from(Span::styled("Searching...", dim))],
        SearchStatus::NoResults => vec![Line::from(Span::styled("Nothing found", Style::default().fg(Color::Magenta)))],
        SearchStatus::Failed(message) => vec![Line::from(Span::styled(
            escape_html(message),
            Style::default().fg(Color::Red),
        ))],
        SearchStatus::Results(rows) => rows
            .iter()
            .map(|row| {
                Line::from(vec![
                    Span::styled(row.header.clone(), Style::default().fg(Color::Cyan)),
                    Span::raw(" — "),
                    Span::raw(row.content.replace('\n', " ")),
                ])
            })
            .collect(),
    };

    let results = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((state.search_scroll, 0));
    f.render_widget(results, chunks[1]);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let hint = if state.input_mode == InputMode::Editing {
        " ESC:stop editing | arrows:move | Enter:submit "
    } else {
        match state.active_panel {
            Panel::Tree => " ↑/↓:select | r:reply | d:delete | f:subtree | a:all | o:sort | [/]:page | R:reload | ?:help ",
            Panel::Form => " ↑/↓:field | e:edit | s:send | c:clear parent | Tab:panel | ?:help ",
            Panel::Search => " e:edit | Enter:search | ↑/↓:scroll | Tab:panel | ?:help ",
        }
    };

    let text = match &state.status_message {
        Some(message) => format!(" {} |{}", message, hint),
        None => hint.to_string(),
    };

    let bar = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 THREADVIEW - Keyboard Shortcuts

 NAVIGATION
   Tab / Shift+Tab    Switch panels
   R / F5             Reload comments

 TREE
   ↑ / ↓  (j / k)     Select comment
   r                  Reply to selected comment
   d                  Delete selected comment
   f / Enter          Show only the selected subtree
   a / Esc            Show all comments
   o                  Toggle sort order
   [ / ]              Previous / next page
   x                  Export tree as HTML

 FORM
   ↑ / ↓              Select field
   e / Enter          Edit field
   s                  Send comment
   c                  Clear parent (post as root)

 SEARCH
   e / /              Edit query
   Enter / s          Search

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn draw_delete_popup(f: &mut Frame, state: &RenderState, area: Rect) {
    let popup_area = centered_rect(50, 20, area);

    let title = match state.delete_target {
        Some(id) => format!(" Delete #{} (Enter to confirm, Esc to cancel) ", id),
        None => String::from(" Delete "),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Red))
        .style(Style::default().bg(Color::Black));

    let content = format!("Your user_id: {}", state.delete_input);
    let input = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(input, popup_area);
}

fn draw_alert_popup(f: &mut Frame, state: &RenderState, area: Rect) {
    let popup_area = centered_rect(50, 20, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Error (any key to close) ")
        .border_style(Style::default().fg(Color::Red))
        .style(Style::default().bg(Color::Black));

    let message = state.alert.as_deref().unwrap_or_default();
    let alert = Paragraph::new(message.to_string())
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(alert, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
