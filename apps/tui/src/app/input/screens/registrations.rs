use crate::app::editor::EditorState;
use crate::app::input::helpers::{handle_delete_confirmation, navigate};
use crate::app::state::{App, AppScreen, PendingAction};
use crossterm::event::KeyCode;

pub fn handle_registrations_input(app: &mut App, key: KeyCode) {
    if handle_delete_confirmation(app, key, PendingAction::DeleteRegistration) {
        return;
    }

    let total_rows = app.registrations.len();
    if navigate(&mut app.registrations_index, total_rows, key) {
        return;
    }

    match key {
        KeyCode::Esc => {
            app.screen = if app.registration_event.is_some() {
                AppScreen::Events
            } else {
                AppScreen::Home
            };
        }
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('a') => {
            app.registration_event = None;
            app.registrations_index = 0;
            app.pending = Some(PendingAction::LoadRegistrations);
        }
        KeyCode::Char('s') if total_rows > 0 => {
            app.pending = Some(PendingAction::CycleRegistrationStatus);
        }
        KeyCode::Char('d') if total_rows > 0 => {
            app.confirm_delete = true;
            app.status_message = "Delete this registration? (y/n)".to_string();
        }
        KeyCode::Char('n') => {
            if let Some(editor) = app
                .selected_registration()
                .map(EditorState::for_registration_notes)
            {
                app.open_editor(editor, AppScreen::Registrations);
            }
        }
        KeyCode::Char('e') => app.pending = Some(PendingAction::ExportRegistrations),
        KeyCode::Char('u') | KeyCode::F(5) => {
            app.pending = Some(PendingAction::LoadRegistrations);
        }
        _ => {}
    }
}
