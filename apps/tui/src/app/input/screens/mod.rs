use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

mod editor;
mod events;
mod form;
mod forms;
mod help;
mod home;
mod registrations;
mod schemas;
mod submission_detail;
mod submissions;

pub fn dispatch_input(app: &mut App, key: KeyCode) {
    if help::handle_help_keys(app, key) {
        return;
    }

    // A queued action has not run yet; drop keys until it has.
    if app.pending.is_some() {
        return;
    }

    match app.screen {
        AppScreen::Home => home::handle_home_input(app, key),
        AppScreen::Forms => forms::handle_forms_input(app, key),
        AppScreen::Form => form::handle_form_input(app, key),
        AppScreen::Events => events::handle_events_input(app, key),
        AppScreen::Submissions => submissions::handle_submissions_input(app, key),
        AppScreen::SubmissionDetail => {
            submission_detail::handle_submission_detail_input(app, key);
        }
        AppScreen::Registrations => registrations::handle_registrations_input(app, key),
        AppScreen::Schemas => schemas::handle_schemas_input(app, key),
        AppScreen::Editor => editor::handle_editor_input(app, key),
    }
}
