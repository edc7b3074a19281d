use crate::app::editor::EditorState;
use crate::app::App;
use crate::ui::widgets::footer::{render_footer, render_status, split_screen};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

const LABEL_WIDTH: usize = 20;

pub fn render_editor(app: &App, f: &mut Frame<'_>) {
    let (body, status, footer) = split_screen(f.area());
    let Some(editor) = app.editor.as_ref() else {
        return;
    };

    let rows = u16::try_from(editor.fields.len()).unwrap_or(u16::MAX);
    let height = rows.saturating_add(6).min(body.height);
    let width = 76.min(body.width);
    let area = Rect {
        x: body.x + body.width.saturating_sub(width) / 2,
        y: body.y + body.height.saturating_sub(height) / 2,
        width,
        height,
    };

    let block = Block::default()
        .title(editor.target.title())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(rows),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let lines: Vec<Line<'_>> = editor
        .fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let style = slot_style(editor, index);
            let prefix = if index == editor.field && editor.editing {
                "► "
            } else if index == editor.field {
                "> "
            } else {
                "  "
            };
            let mut value = field.value.clone();
            if field.is_choice() {
                value = format!("‹ {value} ›");
            } else if index == editor.field && editor.editing {
                value.push('▏');
            }
            Line::from(vec![
                Span::styled(format!("{prefix}{:<width$}", field.label, width = LABEL_WIDTH), style),
                Span::styled(value, style),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), chunks[0]);

    let save_style = slot_style(editor, editor.fields.len());
    let save = Paragraph::new(Span::styled("Save", save_style))
        .block(Block::default().borders(Borders::ALL).border_style(save_style))
        .alignment(Alignment::Center);
    f.render_widget(save, chunks[1]);

    render_status(app, f, status);
    let keys: &[(&str, &str)] = if editor.editing {
        if editor.focused().is_some_and(|field| field.is_choice()) {
            &[("←/→", "Change"), ("Enter", "Done"), ("ESC", "Done")]
        } else {
            &[("Type", "Edit"), ("Enter", "Done"), ("ESC", "Done")]
        }
    } else {
        &[
            ("↑/↓", "Select"),
            ("Enter", "Edit field"),
            ("s", "Save"),
            ("ESC", "Discard"),
        ]
    };
    render_footer(f, footer, keys);
}

fn slot_style(editor: &EditorState, index: usize) -> Style {
    if index != editor.field {
        Style::default()
    } else if editor.editing {
        Style::default()
            .fg(Color::White)
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }
}
