use crate::app::App;
use crate::ui::widgets::footer::{render_footer, render_status, split_screen};
use crate::ui::widgets::tables::selected_style;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem};
use ratatui::Frame;

pub fn render_forms(app: &App, f: &mut Frame<'_>) {
    let (body, status, footer) = split_screen(f.area());

    let items: Vec<ListItem<'_>> = app
        .form_types
        .iter()
        .enumerate()
        .map(|(index, form_type)| {
            let title = app
                .schemas
                .iter()
                .find(|schema| &schema.form_type == form_type)
                .map(|schema| schema.title.clone());
            let mut spans = vec![Span::raw(form_type.clone())];
            if let Some(title) = title {
                spans.push(Span::styled(
                    format!("  {title}"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            let item = ListItem::new(Line::from(spans));
            if index == app.forms_index {
                item.style(selected_style())
            } else {
                item
            }
        })
        .collect();

    let list = List::new(items).block(Block::default().title("Forms").borders(Borders::ALL));
    f.render_widget(list, body);

    render_status(app, f, status);
    render_footer(
        f,
        footer,
        &[("↑/↓", "Navigate"), ("Enter", "Open form"), ("ESC", "Back")],
    );
}
