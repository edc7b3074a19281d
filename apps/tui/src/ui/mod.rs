pub mod screens;
pub mod widgets;

use crate::app::{App, AppScreen};
use ratatui::Frame;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    match app.screen {
        AppScreen::Home => screens::home::render_home(app, f),
        AppScreen::Forms => screens::forms::render_forms(app, f),
        AppScreen::Form => screens::form::render_form(app, f),
        AppScreen::Events => screens::events::render_events(app, f),
        AppScreen::Submissions => screens::submissions::render_submissions(app, f),
        AppScreen::SubmissionDetail => {
            screens::submission_detail::render_submission_detail(app, f);
        }
        AppScreen::Registrations => screens::registrations::render_registrations(app, f),
        AppScreen::Schemas => screens::schemas::render_schemas(app, f),
        AppScreen::Editor => screens::editor::render_editor(app, f),
    }

    if app.show_help {
        screens::help::render_help_popup(app, f);
    }
}
