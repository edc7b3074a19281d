use crate::app::{App, AppScreen};
use crate::ui::widgets::popup::{centered_rect, ClearWidget};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

fn screen_help(screen: AppScreen) -> &'static [(&'static str, &'static str)] {
    match screen {
        AppScreen::Home => &[
            ("↑/↓", "Move through the menu"),
            ("Enter", "Open the highlighted entry"),
            ("q", "Quit"),
        ],
        AppScreen::Forms => &[("Enter", "Open the form"), ("u", "Reload form list (admin)")],
        AppScreen::Form => &[
            ("Tab / ↓", "Next field"),
            ("Shift-Tab / ↑", "Previous field"),
            ("← / →", "Change a choice, or move between options"),
            ("Space", "Tick the highlighted option"),
            ("Enter", "Next field; submits on the button"),
            ("r", "Retry a form that failed to load"),
        ],
        AppScreen::Events => &[
            ("Enter", "Register for the event"),
            ("r", "Show registrations (admin)"),
            ("n / e", "New or edit event (admin)"),
            ("d", "Delete event (admin)"),
            ("u", "Refresh"),
        ],
        AppScreen::Submissions => &[
            ("/", "Fuzzy search names, emails and messages"),
            ("f", "Cycle the form type filter"),
            ("s", "Advance status: new, read, replied, archived"),
            ("d", "Delete (asks for confirmation)"),
            ("e", "Export the visible rows as CSV"),
        ],
        AppScreen::SubmissionDetail => &[
            ("n", "Edit triage notes"),
            ("s", "Advance status"),
            ("d", "Delete"),
        ],
        AppScreen::Registrations => &[
            ("s", "Advance status: confirmed, waitlisted, cancelled"),
            ("n", "Edit notes"),
            ("d", "Delete"),
            ("e", "Export as CSV"),
            ("a", "Show all events"),
        ],
        AppScreen::Schemas => &[
            ("Enter", "Preview the form"),
            ("t", "Enable or disable the form"),
            ("e", "Edit title, description, button and success text"),
        ],
        AppScreen::Editor => &[
            ("↑/↓", "Move between fields"),
            ("Enter", "Edit the field; saves on the button"),
            ("← / →", "Change a choice"),
            ("s", "Save"),
            ("ESC", "Stop editing, then discard"),
        ],
    }
}

pub fn render_help_popup(app: &App, f: &mut Frame<'_>) {
    let area = centered_rect(70, 60, f.area());
    f.render_widget(ClearWidget, area);

    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let mut lines: Vec<Line<'_>> = screen_help(app.screen)
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("{key:>14}  "), key_style),
                Span::raw(*action),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(format!("{:>14}  ", "F1 / ? / ESC"), key_style),
        Span::raw("Close help"),
    ]));

    let popup = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(popup, area);
}
