use crate::app::App;
use crate::ui::widgets::footer::{render_footer, render_status, split_screen};
use crate::ui::widgets::tables::{header_style, scroll_offset, selected_style, truncate};
use adapt_forms::{Submission, SubmissionStatus};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

pub fn render_submissions(app: &App, f: &mut Frame<'_>) {
    let (body, status, footer) = split_screen(f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(body);
    render_search_bar(app, f, chunks[0]);

    let visible = app.visible_submissions();
    if visible.is_empty() {
        let message = if app.submissions.is_empty() {
            "No submissions yet."
        } else {
            "Nothing matches the search."
        };
        let paragraph = Paragraph::new(message)
            .block(
                Block::default()
                    .title(title(app))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .alignment(Alignment::Center);
        f.render_widget(paragraph, chunks[1]);
    } else {
        render_table(app, &visible, f, chunks[1]);
    }

    render_status(app, f, status);
    render_footer(
        f,
        footer,
        &[
            ("Enter", "Open"),
            ("/", "Search"),
            ("f", "Filter form"),
            ("s", "Status"),
            ("d", "Delete"),
            ("e", "Export CSV"),
            ("ESC", "Back"),
        ],
    );
}

fn title(app: &App) -> String {
    match &app.submission_filter {
        Some(form_type) => format!("Submissions [{form_type}]"),
        None => "Submissions [all forms]".to_string(),
    }
}

fn render_search_bar(app: &App, f: &mut Frame<'_>, area: Rect) {
    let style = if app.search.active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let cursor = if app.search.active { "▏" } else { "" };
    let line = Line::from(vec![
        Span::styled("Search: ", style.add_modifier(Modifier::BOLD)),
        Span::styled(format!("{}{cursor}", app.search.query()), style),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

pub const fn status_color(status: SubmissionStatus) -> Color {
    match status {
        SubmissionStatus::New => Color::Green,
        SubmissionStatus::Read => Color::White,
        SubmissionStatus::Replied => Color::Cyan,
        SubmissionStatus::Archived => Color::DarkGray,
    }
}

/// Name-ish value to identify a submission in a table row.
fn who(submission: &Submission) -> String {
    ["name", "referrer_name", "email"]
        .iter()
        .find_map(|key| submission.data.get(*key).filter(|value| !value.is_empty()))
        .cloned()
        .unwrap_or_default()
}

fn render_table(app: &App, visible: &[usize], f: &mut Frame<'_>, area: Rect) {
    let header = Row::new(vec![
        Cell::from("ID"),
        Cell::from("Form"),
        Cell::from("Status"),
        Cell::from("From"),
        Cell::from("Received"),
    ])
    .style(header_style());

    let total_rows = visible.len();
    let max_visible_rows = usize::from(area.height.saturating_sub(3));
    let offset = scroll_offset(total_rows, max_visible_rows, app.submissions_index);

    let rows = visible
        .iter()
        .enumerate()
        .skip(offset)
        .take(max_visible_rows)
        .filter_map(|(position, index)| app.submissions.get(*index).map(|s| (position, s)))
        .map(|(position, submission)| {
            let style = if position == app.submissions_index {
                selected_style()
            } else {
                Style::default().fg(status_color(submission.status))
            };
            Row::new(vec![
                Cell::from(submission.id.to_string()),
                Cell::from(submission.form_type.clone()),
                Cell::from(submission.status.label()),
                Cell::from(truncate(&who(submission), 28)),
                Cell::from(submission.created_at.chars().take(16).collect::<String>()),
            ])
            .style(style)
        });

    let widths = [
        Constraint::Length(6),
        Constraint::Length(20),
        Constraint::Length(9),
        Constraint::Min(16),
        Constraint::Length(17),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(
                    "{} ({} of {total_rows})",
                    title(app),
                    app.submissions_index + 1
                ))
                .borders(Borders::ALL),
        )
        .column_spacing(1);
    f.render_widget(table, area);
}
