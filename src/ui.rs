use ratatui::{prelude::*, widgets::*};

use crate::app::state::{Notice, NoticeKind};
use crate::renderer::{DisplayRow, NodeAction};

/// Indentation per tree level, in columns
pub const INDENT_WIDTH: usize = 2;

/// Renders a single-line text input
pub fn render_input<'a>(content: &'a str, title: &'a str, is_focused: bool, is_editing: bool) -> Paragraph<'a> {
    let style = if is_focused && is_editing {
        Style::default().fg(Color::Yellow)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title);

    Paragraph::new(content).block(block)
}

/// Renders tabs
pub fn render_tabs<'a>(titles: &[&'a str], selected: usize) -> Tabs<'a> {
    let titles: Vec<Line> = titles.iter().map(|t| Line::from(*t)).collect();

    Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Yellow).bold())
        .divider("|")
}

/// Colour cycled by nesting depth
pub fn depth_color(depth: usize) -> Color {
    const PALETTE: [Color; 5] = [Color::Cyan, Color::Green, Color::Magenta, Color::Blue, Color::Yellow];
    PALETTE[depth % PALETTE.len()]
}

/// Two-line list item for a rendered comment: header then content
pub fn comment_item(row: &DisplayRow, show_actions: bool) -> ListItem<'static> {
    let indent = " ".repeat(row.depth * INDENT_WIDTH);
    let branch = if row.depth > 0 { "└ " } else { "" };

    let mut header = vec![
        Span::raw(format!("{}{}", indent, branch)),
        Span::styled(row.header.clone(), Style::default().fg(depth_color(row.depth)).bold()),
    ];
    if show_actions {
        let hints = NodeAction::ALL
            .iter()
            .map(|a| format!("{}:{}", a.key(), a.label()))
            .collect::<Vec<_>>()
            .join(" ");
        header.push(Span::styled(format!("  [{}]", hints), Style::default().fg(Color::DarkGray)));
    }

    let content_indent = " ".repeat(row.depth * INDENT_WIDTH + branch.chars().count());
    let mut lines = vec![Line::from(header)];
    for text in row.content.lines() {
        lines.push(Line::from(format!("{}{}", content_indent, text)));
    }
    ListItem::new(lines)
}

/// Style for an inline form notice
pub fn notice_line(notice: &Notice) -> Line<'static> {
    let style = match notice.kind {
        NoticeKind::Confirmation => Style::default().fg(Color::Green).bold(),
        NoticeKind::Error => Style::default().fg(Color::Red),
    };
    Line::from(Span::styled(notice.text.clone(), style))
}
