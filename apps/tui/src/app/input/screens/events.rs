use crate::app::editor::EditorState;
use crate::app::input::helpers::{handle_delete_confirmation, navigate};
use crate::app::state::{App, AppScreen, PendingAction};
use crate::form::FormTarget;
use adapt_forms::RegistrationType;
use crossterm::event::KeyCode;

pub fn handle_events_input(app: &mut App, key: KeyCode) {
    if handle_delete_confirmation(app, key, PendingAction::DeleteEvent) {
        return;
    }

    if navigate(&mut app.events_index, app.events.len(), key) {
        return;
    }

    match key {
        KeyCode::Esc => app.screen = AppScreen::Home,
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('u') | KeyCode::F(5) => app.pending = Some(PendingAction::LoadEvents),
        KeyCode::Enter => register_for_selected(app),
        KeyCode::Char('r') if app.is_admin() => {
            if let Some(event) = app.selected_event() {
                app.registration_event = Some(event.id);
                app.screen = AppScreen::Registrations;
                app.pending = Some(PendingAction::LoadRegistrations);
            }
        }
        KeyCode::Char('n') if app.is_admin() => {
            app.open_editor(EditorState::for_new_event(), AppScreen::Events);
        }
        KeyCode::Char('e') if app.is_admin() => {
            if let Some(editor) = app.selected_event().map(EditorState::for_event) {
                app.open_editor(editor, AppScreen::Events);
            }
        }
        KeyCode::Char('d') if app.is_admin() && !app.events.is_empty() => {
            app.confirm_delete = true;
            app.status_message =
                "Delete this event and all of its registrations? (y/n)".to_string();
        }
        _ => {}
    }
}

fn register_for_selected(app: &mut App) {
    let Some(event) = app.selected_event() else {
        return;
    };

    match event.registration_type {
        RegistrationType::Internal => {
            let id = event.id;
            app.open_form(FormTarget::Event(id), AppScreen::Events);
        }
        RegistrationType::External => {
            app.status_message = event.registration_url.as_ref().map_or_else(
                || "Registration is handled elsewhere".to_string(),
                |url| format!("Register at {url}"),
            );
        }
        RegistrationType::NotRequired => {
            app.status_message = "No registration needed, just show up!".to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_app;
    use adapt_forms::{Event, EventCategory};

    fn event(id: i64, registration_type: RegistrationType) -> Event {
        Event {
            id,
            title: "Wheelchair Basketball".to_string(),
            date: "2026-11-02".to_string(),
            time: "10:00".to_string(),
            location: "Gym".to_string(),
            description: String::new(),
            category: EventCategory::Basketball,
            image_url: None,
            registration_type,
            registration_url: Some("https://example.org/signup".to_string()),
            registration_fields: Vec::new(),
            max_registrations: Some(1),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn internal_events_open_the_registration_form() {
        let mut app = test_app(None);
        app.events = vec![event(7, RegistrationType::Internal)];
        handle_events_input(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, AppScreen::Form);
        assert_eq!(
            app.form.as_ref().map(|session| session.target().clone()),
            Some(FormTarget::Event(7))
        );
    }

    #[test]
    fn admins_edit_and_delete_events() {
        let mut app = test_app(Some("secret"));
        app.screen = AppScreen::Events;
        app.events = vec![event(7, RegistrationType::Internal)];

        handle_events_input(&mut app, KeyCode::Char('e'));
        assert_eq!(app.screen, AppScreen::Editor);
        assert_eq!(
            app.editor.as_ref().map(|editor| editor.target.clone()),
            Some(crate::app::editor::EditTarget::Event(7))
        );

        app.close_editor();
        handle_events_input(&mut app, KeyCode::Char('d'));
        assert!(app.confirm_delete);
        handle_events_input(&mut app, KeyCode::Char('y'));
        assert_eq!(app.pending, Some(PendingAction::DeleteEvent));
    }

    #[test]
    fn visitors_cannot_edit_events() {
        let mut app = test_app(None);
        app.screen = AppScreen::Events;
        app.events = vec![event(7, RegistrationType::Internal)];
        handle_events_input(&mut app, KeyCode::Char('n'));
        handle_events_input(&mut app, KeyCode::Char('d'));
        assert_eq!(app.screen, AppScreen::Events);
        assert!(!app.confirm_delete);
    }

    #[test]
    fn external_events_point_at_their_url() {
        let mut app = test_app(None);
        app.screen = AppScreen::Events;
        app.events = vec![event(7, RegistrationType::External)];
        handle_events_input(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, AppScreen::Events);
        assert_eq!(app.status_message, "Register at https://example.org/signup");
    }
}
