use crate::app::App;
use crate::ui::screens::submissions::status_color;
use crate::ui::widgets::footer::{render_footer, render_status, split_screen};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_submission_detail(app: &App, f: &mut Frame<'_>) {
    let (body, status, footer) = split_screen(f.area());
    let Some(submission) = app.selected_submission() else {
        f.render_widget(
            Paragraph::new("Submission no longer available.")
                .block(Block::default().borders(Borders::ALL)),
            body,
        );
        render_footer(f, footer, &[("ESC", "Back")]);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(5)])
        .split(body);

    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Status: ", key_style),
            Span::styled(
                submission.status.label(),
                Style::default().fg(status_color(submission.status)),
            ),
        ]),
        Line::from(vec![
            Span::styled("Received: ", key_style),
            Span::raw(submission.created_at.as_str()),
        ]),
        Line::from(""),
    ];
    for (key, value) in &submission.data {
        lines.push(Line::from(vec![
            Span::styled(format!("{key}: "), key_style),
            Span::raw(value.as_str()),
        ]));
    }

    let details = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(format!(
                    "Submission #{} ({})",
                    submission.id, submission.form_type
                ))
                .borders(Borders::ALL),
        );
    f.render_widget(details, chunks[0]);

    let (notes, notes_style, notes_title) = app.notes_input.as_ref().map_or_else(
        || {
            (
                submission.notes.clone().unwrap_or_default(),
                Style::default(),
                "Notes",
            )
        },
        |draft| (format!("{draft}▏"), Style::default().fg(Color::Yellow), "Notes (editing)"),
    );
    let notes = Paragraph::new(Span::styled(notes, notes_style))
        .wrap(Wrap { trim: false })
        .block(Block::default().title(notes_title).borders(Borders::ALL));
    f.render_widget(notes, chunks[1]);

    render_status(app, f, status);
    let keys: &[(&str, &str)] = if app.notes_input.is_some() {
        &[("Enter", "Save notes"), ("ESC", "Discard")]
    } else {
        &[("n", "Notes"), ("s", "Status"), ("d", "Delete"), ("ESC", "Back")]
    };
    render_footer(f, footer, keys);
}
