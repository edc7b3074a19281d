//! Renders a [`FormSession`] in whatever phase it is in.

use crate::app::App;
use crate::form::editing::selected_options;
use crate::form::{FormPhase, FormSession};
use crate::ui::widgets::footer::{render_footer, render_status, split_screen};
use adapt_forms::{FieldType, FormField};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

const CURSOR: &str = "▏";

pub fn render_form(app: &App, f: &mut Frame<'_>) {
    let (body, status, footer) = split_screen(f.area());
    let Some(session) = app.form.as_ref() else {
        return;
    };

    let title = session
        .schema()
        .map_or_else(|| "Form".to_string(), |schema| schema.title.clone());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(body);
    f.render_widget(block, body);

    let keys: &[(&str, &str)] = match session.phase() {
        FormPhase::Loading => {
            render_centered(f, inner, vec![Line::from("Loading form...")]);
            &[("ESC", "Cancel")]
        }
        FormPhase::LoadFailed => {
            render_load_failure(session, f, inner);
            &[("r", "Retry"), ("ESC", "Back")]
        }
        FormPhase::Submitted => {
            render_success(session, f, inner);
            &[("Enter", "Done"), ("n", "Submit another"), ("ESC", "Back")]
        }
        FormPhase::Ready | FormPhase::Submitting => {
            render_fields(session, f, inner);
            &[
                ("Tab/↑/↓", "Field"),
                ("←/→", "Choose"),
                ("Space", "Toggle"),
                ("Enter", "Next/Submit"),
                ("ESC", "Close"),
            ]
        }
    };

    render_status(app, f, status);
    render_footer(f, footer, keys);
}

fn render_centered(f: &mut Frame<'_>, area: Rect, lines: Vec<Line<'_>>) {
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area.inner(Margin::new(2, 2)));
}

fn render_load_failure(session: &FormSession, f: &mut Frame<'_>, area: Rect) {
    let mut lines = vec![Line::from(Span::styled(
        session.banner().unwrap_or_default().to_string(),
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    ))];
    if let Some(detail) = session.detail() {
        lines.push(Line::from(Span::styled(
            detail.to_string(),
            Style::default().fg(Color::DarkGray),
        )));
    }
    render_centered(f, area, lines);
}

fn render_success(session: &FormSession, f: &mut Frame<'_>, area: Rect) {
    let message = session
        .receipt()
        .map(|receipt| receipt.message.clone())
        .unwrap_or_default();
    let mut lines = vec![
        Line::from(Span::styled(
            "✓",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            message,
            Style::default().fg(Color::Green),
        )),
    ];
    if let Some(reference) = session.reference_line() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            reference,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )));
    }
    render_centered(f, area, lines);
}

fn render_fields(session: &FormSession, f: &mut Frame<'_>, area: Rect) {
    let mut lines: Vec<Line<'_>> = Vec::new();

    if let Some(schema) = session.schema() {
        if !schema.description.is_empty() {
            lines.push(Line::from(Span::styled(
                schema.description.clone(),
                Style::default().fg(Color::Gray),
            )));
        }
    }
    match session.spots_left() {
        Some(0) => lines.push(Line::from(Span::styled(
            "This event is full",
            Style::default().fg(Color::Red),
        ))),
        Some(spots) => lines.push(Line::from(Span::styled(
            format!("{spots} spot{} left", if spots == 1 { "" } else { "s" }),
            Style::default().fg(Color::Yellow),
        ))),
        None => {}
    }
    if let Some(banner) = session.banner() {
        lines.push(Line::from(Span::styled(
            format!("⚠ {banner}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(""));

    let mut focus_line = 0;
    for (index, field) in session.fields().iter().enumerate() {
        let focused = index == session.focus();
        if focused {
            focus_line = lines.len();
        }
        lines.extend(field_lines(session, field, focused));
        lines.push(Line::from(""));
    }

    if session.on_submit_button() {
        focus_line = lines.len();
    }
    lines.push(submit_line(session));

    let visible = usize::from(area.height);
    let scroll = (focus_line + 4).saturating_sub(visible);
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));

    let padded = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(1), Constraint::Min(10), Constraint::Length(1)])
        .split(area)[1];
    f.render_widget(paragraph, padded);
}

fn field_lines<'a>(session: &'a FormSession, field: &'a FormField, focused: bool) -> Vec<Line<'a>> {
    let label_style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let mut label = vec![Span::styled(field.label.as_str(), label_style)];
    if field.required {
        label.push(Span::styled(" *", Style::default().fg(Color::Red)));
    }

    let mut lines = vec![Line::from(label)];
    lines.extend(value_lines(session, field, focused));

    if let Some(error) = session.error(&field.id) {
        lines.push(Line::from(Span::styled(
            format!("  {error}"),
            Style::default().fg(Color::Red),
        )));
    } else if let Some(help) = &field.help_text {
        lines.push(Line::from(Span::styled(
            format!("  {help}"),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines
}

fn value_lines<'a>(session: &'a FormSession, field: &'a FormField, focused: bool) -> Vec<Line<'a>> {
    let value = session.value(&field.id);
    let input_style = if focused {
        Style::default().fg(Color::White).bg(Color::Rgb(30, 30, 60))
    } else {
        Style::default().fg(Color::White)
    };
    let placeholder = || {
        Span::styled(
            field.placeholder.clone().unwrap_or_default(),
            Style::default().fg(Color::DarkGray),
        )
    };

    match field.field_type {
        FieldType::Text | FieldType::Email | FieldType::Phone | FieldType::Number | FieldType::Date => {
            let mut spans = vec![Span::raw("  ")];
            if value.is_empty() && !focused {
                spans.push(placeholder());
            } else {
                spans.push(Span::styled(value, input_style));
            }
            if focused {
                spans.push(Span::styled(CURSOR, Style::default().fg(Color::Yellow)));
            }
            if field.field_type == FieldType::Date && value.is_empty() {
                spans.push(Span::styled(" YYYY-MM-DD", Style::default().fg(Color::DarkGray)));
            }
            vec![Line::from(spans)]
        }
        FieldType::Textarea => {
            let mut lines: Vec<Line<'a>> = if value.is_empty() {
                vec![Line::from(vec![Span::raw("  "), placeholder()])]
            } else {
                value
                    .lines()
                    .map(|line| Line::from(vec![Span::raw("  "), Span::styled(line, input_style)]))
                    .collect()
            };
            if focused {
                if let Some(last) = lines.last_mut() {
                    last.spans
                        .push(Span::styled(CURSOR, Style::default().fg(Color::Yellow)));
                }
            }
            lines.push(Line::from(""));
            lines
        }
        FieldType::Select => {
            let shown = if value.is_empty() {
                Span::styled("Select an option", Style::default().fg(Color::DarkGray))
            } else {
                Span::styled(value, input_style)
            };
            let arrow = Style::default().fg(if focused { Color::Yellow } else { Color::DarkGray });
            vec![Line::from(vec![
                Span::raw("  "),
                Span::styled("◀ ", arrow),
                shown,
                Span::styled(" ▶", arrow),
            ])]
        }
        FieldType::Checkbox if field.is_toggle() => {
            let mark = if value == "true" { "[x]" } else { "[ ]" };
            vec![Line::from(vec![
                Span::raw("  "),
                Span::styled(mark, input_style),
                Span::raw(" Yes"),
            ])]
        }
        FieldType::Checkbox | FieldType::Multiselect => {
            let chosen = selected_options(value);
            field
                .option_list()
                .iter()
                .enumerate()
                .map(|(index, option)| {
                    let mark = if chosen.contains(option) { "[x]" } else { "[ ]" };
                    let style = if focused && index == session.option_cursor() {
                        input_style.add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };
                    Line::from(vec![
                        Span::raw("  "),
                        Span::styled(format!("{mark} {option}"), style),
                    ])
                })
                .collect()
        }
    }
}

fn submit_line(session: &FormSession) -> Line<'_> {
    let text = if session.phase() == FormPhase::Submitting {
        "Submitting...".to_string()
    } else {
        session
            .schema()
            .map_or_else(|| "Submit".to_string(), |schema| schema.submit_button_text.clone())
    };
    let style = if session.on_submit_button() {
        Style::default()
            .bg(Color::Rgb(0, 0, 238))
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    Line::from(Span::styled(format!("[ {text} ]"), style)).alignment(Alignment::Center)
}
