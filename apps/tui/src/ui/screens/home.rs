use crate::app::App;
use crate::ui::widgets::footer::{render_footer, render_status, split_screen};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use ratatui::Frame;

pub fn render_home(app: &App, f: &mut Frame<'_>) {
    let (body, status, footer) = split_screen(f.area().inner(Margin::new(2, 1)));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3)])
        .split(body);

    let mode = if app.is_admin() { "admin" } else { "public" };
    let title = Paragraph::new(Text::from(vec![
        Line::from(vec![
            Span::styled(
                "Adapt ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "Forms",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            format!("{} ({mode})", app.config.api_url),
            Style::default().fg(Color::DarkGray),
        )),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(title, chunks[0]);

    let items: Vec<ListItem<'_>> = app
        .home_items()
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let style = if index == app.home_index {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let marker = if index == app.home_index { "> " } else { "  " };
            ListItem::new(Span::styled(format!("{marker}{}", item.label()), style))
        })
        .collect();

    let menu = List::new(items).block(Block::default().title("Menu").borders(Borders::ALL));
    f.render_widget(menu, chunks[1]);

    render_status(app, f, status);
    render_footer(
        f,
        footer,
        &[("↑/↓", "Navigate"), ("Enter", "Open"), ("F1", "Help"), ("q", "Quit")],
    );
}
