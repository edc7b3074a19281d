use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::App;

/// Body, status line and key footer.
pub fn split_screen(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(2),
        ])
        .split(area);
    (chunks[0], chunks[1], chunks[2])
}

pub fn render_status(app: &App, f: &mut Frame<'_>, area: Rect) {
    let (text, style) = if app.pending.is_some() {
        ("Working...".to_string(), Style::default().fg(Color::Cyan))
    } else {
        (app.status_message.clone(), Style::default().fg(Color::Gray))
    };
    f.render_widget(Paragraph::new(Span::styled(text, style)), area);
}

/// Centered `key: action` hints under a top rule.
pub fn render_footer(f: &mut Frame<'_>, area: Rect, keys: &[(&str, &str)]) {
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let mut spans = Vec::with_capacity(keys.len() * 2);
    for (index, (key, action)) in keys.iter().enumerate() {
        spans.push(Span::styled(*key, key_style));
        let separator = if index + 1 == keys.len() { "" } else { "   " };
        spans.push(Span::raw(format!(": {action}{separator}")));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::TOP))
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}
