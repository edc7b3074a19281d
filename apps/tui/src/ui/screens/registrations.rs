use crate::app::App;
use crate::ui::widgets::footer::{render_footer, render_status, split_screen};
use crate::ui::widgets::tables::{header_style, scroll_offset, selected_style, truncate};
use adapt_forms::RegistrationStatus;
use ratatui::layout::{Alignment, Constraint};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

const fn status_color(status: RegistrationStatus) -> Color {
    match status {
        RegistrationStatus::Confirmed => Color::Green,
        RegistrationStatus::Waitlisted => Color::Yellow,
        RegistrationStatus::Cancelled => Color::DarkGray,
    }
}

pub fn render_registrations(app: &App, f: &mut Frame<'_>) {
    let (body, status, footer) = split_screen(f.area());

    let title = match app.registration_event {
        Some(id) => format!(
            "Registrations [{}]",
            app.event_title(id).unwrap_or("unknown event")
        ),
        None => "Registrations [all events]".to_string(),
    };

    if app.registrations.is_empty() {
        let paragraph = Paragraph::new("No registrations yet.")
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .alignment(Alignment::Center);
        f.render_widget(paragraph, body);
    } else {
        let header = Row::new(vec![
            Cell::from("ID"),
            Cell::from("Event"),
            Cell::from("Name"),
            Cell::from("Email"),
            Cell::from("Status"),
            Cell::from("Registered"),
        ])
        .style(header_style());

        let total_rows = app.registrations.len();
        let max_visible_rows = usize::from(body.height.saturating_sub(3));
        let offset = scroll_offset(total_rows, max_visible_rows, app.registrations_index);

        let rows = app
            .registrations
            .iter()
            .enumerate()
            .skip(offset)
            .take(max_visible_rows)
            .map(|(index, registration)| {
                let style = if index == app.registrations_index {
                    selected_style()
                } else {
                    Style::default().fg(status_color(registration.status))
                };
                let field = |key: &str| registration.data.get(key).cloned().unwrap_or_default();
                Row::new(vec![
                    Cell::from(registration.id.to_string()),
                    Cell::from(truncate(
                        app.event_title(registration.event_id).unwrap_or("?"),
                        24,
                    )),
                    Cell::from(truncate(&field("name"), 24)),
                    Cell::from(truncate(&field("email"), 28)),
                    Cell::from(registration.status.label()),
                    Cell::from(registration.created_at.chars().take(16).collect::<String>()),
                ])
                .style(style)
            });

        let widths = [
            Constraint::Length(6),
            Constraint::Length(24),
            Constraint::Min(12),
            Constraint::Length(28),
            Constraint::Length(11),
            Constraint::Length(17),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .title(format!(
                        "{title} ({} of {total_rows})",
                        app.registrations_index + 1
                    ))
                    .borders(Borders::ALL),
            )
            .column_spacing(1);
        f.render_widget(table, body);
    }

    render_status(app, f, status);
    render_footer(
        f,
        footer,
        &[
            ("s", "Status"),
            ("n", "Notes"),
            ("d", "Delete"),
            ("e", "Export CSV"),
            ("a", "All events"),
            ("ESC", "Back"),
        ],
    );
}
