use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::models::MessageRole;
use crate::tui::app::App;

/// Render the main UI
pub fn render_ui(frame: &mut Frame, app: &mut App) {
    let suggestions = app.visible_suggestions();
    let suggestions_height = if suggestions.is_empty() {
        0
    } else {
        suggestions.len() as u16 + 2
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints(
            [
                Constraint::Length(2),                  // Header
                Constraint::Min(5),                     // Chat
                Constraint::Length(suggestions_height), // Quick actions
                Constraint::Length(3),                  // Input
                Constraint::Length(1),                  // Status bar
            ]
            .as_ref(),
        )
        .split(frame.area());

    render_header(frame, chunks[0], app);
    render_chat(frame, chunks[1], app);
    if suggestions_height > 0 {
        render_suggestions(frame, chunks[2], app);
    }
    render_input(frame, chunks[3], app);
    render_status_bar(frame, chunks[4], app);
}

/// Render the header
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "FinanceGuru",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | Your AI-Powered Finance Assistant | "),
        Span::styled(&app.service_url, Style::default().fg(Color::Gray)),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    )
    .alignment(Alignment::Center);

    frame.render_widget(header, area);
}

/// Build the chat transcript as styled lines
fn transcript_lines(app: &App) -> Vec<Line<'_>> {
    let mut lines = Vec::new();

    for msg in app.session.transcript() {
        let color = match msg.role() {
            MessageRole::User => Color::Blue,
            MessageRole::Assistant => Color::Green,
        };

        lines.push(Line::from(Span::styled(
            format!("[{}]", App::speaker(msg.role())),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        for line in msg.content().lines() {
            lines.push(Line::from(line));
        }
        lines.push(Line::from(""));
    }

    if app.session.is_in_flight() {
        lines.push(Line::from(Span::styled(
            format!("[{}]", App::speaker(MessageRole::Assistant)),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            "● ● ●",
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::SLOW_BLINK),
        )));
    }

    lines
}

/// Render the chat area, pinned to the bottom unless the user scrolled up.
/// Records how far up the view can go for the next scroll.
fn render_chat(frame: &mut Frame, area: Rect, app: &mut App) {
    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2);

    // Counted without the block so only content rows are included
    let paragraph = Paragraph::new(transcript_lines(app)).wrap(Wrap { trim: false });
    let total = u16::try_from(paragraph.line_count(inner_width)).unwrap_or(u16::MAX);
    let max_scroll = total.saturating_sub(inner_height);
    let offset = app.scroll_offset.min(max_scroll);

    let paragraph = paragraph
        .block(
            Block::default()
                .title(" Chat ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .scroll((max_scroll - offset, 0));
    frame.render_widget(paragraph, area);

    app.max_scroll = max_scroll;
    app.scroll_offset = offset;
}

/// Render the quick action list
fn render_suggestions(frame: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = app
        .visible_suggestions()
        .iter()
        .enumerate()
        .map(|(idx, suggestion)| {
            let selected = app.selected_suggestion == Some(idx);
            let style = if selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(vec![
                Span::styled(format!(" {:<18}", suggestion.label), style),
                Span::styled(suggestion.prompt, Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let block = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Quick Actions (Tab to pick) "),
    );

    frame.render_widget(block, area);
}

/// Render the input area
fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let busy = app.session.is_in_flight();
    let title = if busy {
        " Waiting for FinanceGuru... "
    } else {
        " Ask about investments, budgeting, savings... (Enter to send) "
    };

    let input = Paragraph::new(app.session.pending_input())
        .style(Style::default().fg(if busy { Color::DarkGray } else { Color::White }))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if busy { Color::DarkGray } else { Color::Blue }))
                .title(title),
        );

    frame.render_widget(input, area);

    let typed = app.session.pending_input().chars().count();
    let cursor_offset = u16::try_from(typed).unwrap_or(u16::MAX);
    let cursor_x = area
        .x
        .saturating_add(1)
        .saturating_add(cursor_offset)
        .min(area.x.saturating_add(area.width.saturating_sub(2)));
    frame.set_cursor_position((cursor_x, area.y + 1));
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled(
            format!(" {} messages ", app.session.transcript().len()),
            Style::default().fg(Color::Black).bg(Color::Green),
        ),
        Span::raw(" "),
    ];

    if let Some(status) = &app.status_message {
        spans.push(Span::styled(status, Style::default().fg(Color::Yellow)));
    } else {
        spans.push(Span::styled(
            "Ctrl+C quit • Esc clear • ↑↓/PgUp/PgDn scroll",
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
