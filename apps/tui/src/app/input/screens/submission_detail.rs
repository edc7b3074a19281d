use crate::app::input::helpers::handle_delete_confirmation;
use crate::app::state::{App, AppScreen, PendingAction};
use crossterm::event::KeyCode;

pub fn handle_submission_detail_input(app: &mut App, key: KeyCode) {
    if handle_delete_confirmation(app, key, PendingAction::DeleteSubmission) {
        return;
    }

    if let Some(notes) = app.notes_input.as_mut() {
        match key {
            KeyCode::Esc => app.notes_input = None,
            KeyCode::Enter => app.pending = Some(PendingAction::SaveSubmissionNotes),
            KeyCode::Backspace => {
                notes.pop();
            }
            KeyCode::Char(c) => notes.push(c),
            _ => {}
        }
        return;
    }

    match key {
        KeyCode::Esc => app.screen = AppScreen::Submissions,
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('n') => {
            app.notes_input = Some(
                app.selected_submission()
                    .and_then(|submission| submission.notes.clone())
                    .unwrap_or_default(),
            );
        }
        KeyCode::Char('s') => app.pending = Some(PendingAction::CycleSubmissionStatus),
        KeyCode::Char('d') => {
            app.confirm_delete = true;
            app.status_message = "Delete this submission? (y/n)".to_string();
        }
        _ => {}
    }
}
