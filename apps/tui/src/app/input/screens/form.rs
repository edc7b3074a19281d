use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::{App, PendingAction};
use crate::form::editing::{append_char, backspace, cycle_option, toggle};
use crate::form::{FormEvent, FormPhase, FormSession};
use adapt_forms::{FieldType, FormField};
use crossterm::event::KeyCode;

pub fn handle_form_input(app: &mut App, key: KeyCode) {
    if key == KeyCode::Esc {
        app.close_form();
        return;
    }
    let Some(session) = app.form.as_mut() else {
        return;
    };

    match session.phase() {
        FormPhase::Loading | FormPhase::Submitting => {}
        FormPhase::LoadFailed => {
            if matches!(key, KeyCode::Enter | KeyCode::Char('r')) {
                session.reopen();
                app.pending = Some(PendingAction::LoadForm);
            }
        }
        FormPhase::Submitted => match key {
            KeyCode::Enter => app.close_form(),
            KeyCode::Char('n') => {
                session.reopen();
                app.pending = Some(PendingAction::LoadForm);
            }
            _ => {}
        },
        FormPhase::Ready => {
            if handle_ready_input(session, key) {
                app.pending = Some(PendingAction::SubmitForm);
            }
        }
    }
}

/// Returns true when the key moved the session into `Submitting`.
fn handle_ready_input(session: &mut FormSession, key: KeyCode) -> bool {
    let slots = session.focus_slots();

    match key {
        KeyCode::Tab | KeyCode::Down => session.set_focus(wrap_increment(session.focus(), slots)),
        KeyCode::BackTab | KeyCode::Up => session.set_focus(wrap_decrement(session.focus(), slots)),
        KeyCode::Enter if session.on_submit_button() => {
            return matches!(session.process(FormEvent::Submit), Ok(FormPhase::Submitting));
        }
        KeyCode::Enter => session.set_focus(session.focus() + 1),
        _ => {
            let Some(field) = session.focused_field().cloned() else {
                return false;
            };
            handle_field_key(session, &field, key);
        }
    }
    false
}

fn handle_field_key(session: &mut FormSession, field: &FormField, key: KeyCode) {
    let current = session.value(&field.id).to_string();

    let next = match field.field_type {
        FieldType::Select => match key {
            KeyCode::Right | KeyCode::Char(' ') => Some(cycle_option(field, &current, true)),
            KeyCode::Left => Some(cycle_option(field, &current, false)),
            KeyCode::Backspace | KeyCode::Delete => Some(String::new()),
            _ => None,
        },
        FieldType::Checkbox if field.is_toggle() => {
            matches!(key, KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right)
                .then(|| toggle(field, &current, None))
        }
        FieldType::Checkbox | FieldType::Multiselect => match key {
            KeyCode::Right => {
                session.move_option_cursor(true);
                None
            }
            KeyCode::Left => {
                session.move_option_cursor(false);
                None
            }
            KeyCode::Char(' ') => field
                .option_list()
                .get(session.option_cursor())
                .map(|option| toggle(field, &current, Some(option.as_str()))),
            _ => None,
        },
        FieldType::Text
        | FieldType::Email
        | FieldType::Phone
        | FieldType::Textarea
        | FieldType::Number
        | FieldType::Date => match key {
            KeyCode::Char(c) => append_char(field, &current, c),
            KeyCode::Backspace => Some(backspace(field, &current)),
            _ => None,
        },
    };

    if let Some(value) = next {
        if let Err(error) = session.process(FormEvent::Edit {
            field: field.id.clone(),
            value,
        }) {
            tracing::warn!(%error, "edit ignored");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::AppScreen;
    use crate::app::test_app;
    use crate::form::FormTarget;
    use adapt_forms::schema::default_schemas;

    fn ready_contact_app() -> App {
        let mut app = test_app(None);
        app.open_form(FormTarget::Form("contact".to_string()), AppScreen::Forms);
        app.pending = None;
        let schema = default_schemas()
            .into_iter()
            .find(|schema| schema.form_type == "contact")
            .unwrap();
        app.form
            .as_mut()
            .unwrap()
            .process(FormEvent::Loaded {
                schema,
                spots_left: None,
            })
            .unwrap();
        app
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_form_input(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_fills_the_focused_field() {
        let mut app = ready_contact_app();
        type_text(&mut app, "Jane");
        handle_form_input(&mut app, KeyCode::Backspace);
        assert_eq!(app.form.as_ref().unwrap().value("name"), "Jan");
    }

    #[test]
    fn submit_with_missing_fields_stays_ready() {
        let mut app = ready_contact_app();
        let slots = app.form.as_ref().unwrap().focus_slots();
        app.form.as_mut().unwrap().set_focus(slots - 1);

        handle_form_input(&mut app, KeyCode::Enter);

        let session = app.form.as_ref().unwrap();
        assert_eq!(session.phase(), FormPhase::Ready);
        assert!(session.error("name").is_some());
        assert_eq!(app.pending, None);
    }

    #[test]
    fn complete_form_queues_the_request() {
        let mut app = ready_contact_app();
        let fields = app.form.as_ref().unwrap().fields().to_vec();
        for (index, field) in fields.iter().enumerate() {
            app.form.as_mut().unwrap().set_focus(index);
            match field.id.as_str() {
                "name" => type_text(&mut app, "Jane Doe"),
                "email" => type_text(&mut app, "jane@example.com"),
                "message" => type_text(&mut app, "Hi"),
                _ if field.field_type == FieldType::Select && field.required => {
                    handle_form_input(&mut app, KeyCode::Right);
                }
                _ => {}
            }
        }
        let slots = app.form.as_ref().unwrap().focus_slots();
        app.form.as_mut().unwrap().set_focus(slots - 1);

        handle_form_input(&mut app, KeyCode::Enter);

        assert_eq!(app.form.as_ref().unwrap().phase(), FormPhase::Submitting);
        assert_eq!(app.pending, Some(PendingAction::SubmitForm));
    }

    #[test]
    fn escape_returns_to_origin() {
        let mut app = ready_contact_app();
        handle_form_input(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, AppScreen::Forms);
        assert!(app.form.is_none());
    }
}
