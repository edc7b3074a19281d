use crate::app::input::helpers::{handle_delete_confirmation, navigate};
use crate::app::state::{App, AppScreen, PendingAction};
use crossterm::event::KeyCode;

pub fn handle_submissions_input(app: &mut App, key: KeyCode) {
    if handle_delete_confirmation(app, key, PendingAction::DeleteSubmission) {
        return;
    }
    if app.search.active {
        handle_search_input(app, key);
        return;
    }

    let total_rows = app.visible_submissions().len();
    if navigate(&mut app.submissions_index, total_rows, key) {
        return;
    }

    match key {
        KeyCode::Esc => {
            if app.search.query().is_empty() {
                app.screen = AppScreen::Home;
            } else {
                app.clear_search();
            }
        }
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('/') => app.search.active = true,
        KeyCode::Enter => {
            if total_rows > 0 {
                app.notes_input = None;
                app.screen = AppScreen::SubmissionDetail;
            }
        }
        KeyCode::Char('f') => {
            app.submission_filter = next_filter(
                app.submission_filter.as_deref(),
                &app.submission_form_types(),
            );
            app.submissions_index = 0;
            app.pending = Some(PendingAction::LoadSubmissions);
        }
        KeyCode::Char('s') if total_rows > 0 => {
            app.pending = Some(PendingAction::CycleSubmissionStatus);
        }
        KeyCode::Char('d') if total_rows > 0 => {
            app.confirm_delete = true;
            app.status_message = "Delete this submission? (y/n)".to_string();
        }
        KeyCode::Char('e') => app.pending = Some(PendingAction::ExportSubmissions),
        KeyCode::Char('u') | KeyCode::F(5) => app.pending = Some(PendingAction::LoadSubmissions),
        _ => {}
    }
}

fn handle_search_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc => app.clear_search(),
        KeyCode::Enter => app.search.active = false,
        KeyCode::Backspace => {
            app.search.pop();
            app.submissions_index = 0;
        }
        KeyCode::Char(c) => {
            app.search.push(c);
            app.submissions_index = 0;
        }
        _ => {}
    }
}

/// All → each form type in turn → all.
fn next_filter(current: Option<&str>, form_types: &[String]) -> Option<String> {
    match current {
        None => form_types.first().cloned(),
        Some(current) => form_types
            .iter()
            .position(|form_type| form_type == current)
            .and_then(|index| form_types.get(index + 1))
            .cloned(),
    }
}
