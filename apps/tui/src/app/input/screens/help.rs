use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

/// F1 toggles the help popup anywhere; `?` opens it only where it cannot be
/// text. While the popup is up it swallows every key.
pub fn handle_help_keys(app: &mut App, key: KeyCode) -> bool {
    if app.show_help {
        if matches!(key, KeyCode::F(1) | KeyCode::Esc | KeyCode::Char('?' | 'q')) {
            app.show_help = false;
        }
        return true;
    }

    let opens = match key {
        KeyCode::F(1) => true,
        KeyCode::Char('?') => !is_typing(app),
        _ => false,
    };
    if opens {
        app.show_help = true;
    }
    opens
}

/// Whether printable keys currently go into some text.
fn is_typing(app: &App) -> bool {
    match app.screen {
        AppScreen::Form => true,
        AppScreen::Submissions => app.search.active,
        AppScreen::SubmissionDetail => app.notes_input.is_some(),
        AppScreen::Editor => app.editor.as_ref().is_some_and(|editor| editor.editing),
        AppScreen::Home
        | AppScreen::Forms
        | AppScreen::Events
        | AppScreen::Registrations
        | AppScreen::Schemas => false,
    }
}
