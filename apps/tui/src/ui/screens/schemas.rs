use crate::app::App;
use crate::ui::widgets::footer::{render_footer, render_status, split_screen};
use crate::ui::widgets::tables::{header_style, scroll_offset, selected_style, truncate};
use ratatui::layout::Constraint;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

pub fn render_schemas(app: &App, f: &mut Frame<'_>) {
    let (body, status, footer) = split_screen(f.area());

    let header = Row::new(vec![
        Cell::from("Form type"),
        Cell::from("Title"),
        Cell::from("Fields"),
        Cell::from("Enabled"),
        Cell::from("Updated"),
    ])
    .style(header_style());

    let total_rows = app.schemas.len();
    let max_visible_rows = usize::from(body.height.saturating_sub(3));
    let offset = scroll_offset(total_rows, max_visible_rows, app.schemas_index);

    let rows = app
        .schemas
        .iter()
        .enumerate()
        .skip(offset)
        .take(max_visible_rows)
        .map(|(index, schema)| {
            let style = if index == app.schemas_index {
                selected_style()
            } else if schema.enabled {
                Style::default()
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Row::new(vec![
                Cell::from(schema.form_type.clone()),
                Cell::from(truncate(&schema.title, 30)),
                Cell::from(schema.fields.len().to_string()),
                Cell::from(if schema.enabled { "Yes" } else { "No" }),
                Cell::from(schema.updated_at.clone().unwrap_or_default()),
            ])
            .style(style)
        });

    let widths = [
        Constraint::Length(22),
        Constraint::Min(20),
        Constraint::Length(7),
        Constraint::Length(8),
        Constraint::Length(25),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!("Form schemas ({total_rows})"))
                .borders(Borders::ALL),
        )
        .column_spacing(1);
    f.render_widget(table, body);

    render_status(app, f, status);
    render_footer(
        f,
        footer,
        &[
            ("Enter", "Preview"),
            ("t", "Enable/disable"),
            ("e", "Edit"),
            ("u", "Refresh"),
            ("ESC", "Back"),
        ],
    );
}
