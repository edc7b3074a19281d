use crate::app::App;
use crate::ui::widgets::footer::{render_footer, render_status, split_screen};
use crate::ui::widgets::tables::{header_style, scroll_offset, selected_style, truncate};
use adapt_forms::{Event, RegistrationType};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

pub fn render_events(app: &App, f: &mut Frame<'_>) {
    let (body, status, footer) = split_screen(f.area());

    if app.events.is_empty() {
        let paragraph = Paragraph::new("No upcoming events.")
            .block(
                Block::default()
                    .title("Events")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .alignment(Alignment::Center);
        f.render_widget(paragraph, body);
    } else {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(7)])
            .split(body);
        render_table(app, f, chunks[0]);
        if let Some(event) = app.selected_event() {
            render_event_detail(event, f, chunks[1]);
        }
    }

    render_status(app, f, status);
    let mut keys = vec![("↑/↓", "Navigate"), ("Enter", "Register"), ("u", "Refresh")];
    if app.is_admin() {
        keys.extend([("r", "Registrations"), ("n", "New"), ("e", "Edit"), ("d", "Delete")]);
    }
    keys.push(("ESC", "Back"));
    render_footer(f, footer, &keys);
}

fn render_table(app: &App, f: &mut Frame<'_>, area: Rect) {
    let header = Row::new(vec![
        Cell::from("Date"),
        Cell::from("Time"),
        Cell::from("Title"),
        Cell::from("Category"),
        Cell::from("Registration"),
    ])
    .style(header_style());

    let total_rows = app.events.len();
    let max_visible_rows = usize::from(area.height.saturating_sub(3));
    let offset = scroll_offset(total_rows, max_visible_rows, app.events_index);

    let rows = app
        .events
        .iter()
        .enumerate()
        .skip(offset)
        .take(max_visible_rows)
        .map(|(index, event)| {
            let row = Row::new(vec![
                Cell::from(event.date.clone()),
                Cell::from(event.time.clone()),
                Cell::from(truncate(&event.title, 32)),
                Cell::from(event.category.label()),
                Cell::from(registration_label(event)),
            ]);
            if index == app.events_index {
                row.style(selected_style())
            } else {
                row
            }
        });

    let widths = [
        Constraint::Length(11),
        Constraint::Length(8),
        Constraint::Min(20),
        Constraint::Length(11),
        Constraint::Length(18),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!("Events ({} of {total_rows})", app.events_index + 1))
                .borders(Borders::ALL),
        )
        .column_spacing(1);
    f.render_widget(table, area);
}

fn registration_label(event: &Event) -> String {
    match event.registration_type {
        RegistrationType::NotRequired => "Drop in".to_string(),
        RegistrationType::External => "External".to_string(),
        RegistrationType::Internal => event
            .max_registrations
            .map_or_else(|| "Open".to_string(), |max| format!("Open ({max} spots)")),
    }
}

fn render_event_detail(event: &Event, f: &mut Frame<'_>, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            format!("{} · {} · {}", event.display_date(), event.time, event.location),
            Style::default().fg(Color::Cyan),
        )),
        Line::from(event.description.as_str()),
    ];
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title(event.title.as_str()).borders(Borders::ALL));
    f.render_widget(paragraph, area);
}
