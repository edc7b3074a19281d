use crate::app::state::{App, PendingAction};
use crossterm::event::KeyCode;

pub fn handle_editor_input(app: &mut App, key: KeyCode) {
    let Some(editor) = app.editor.as_mut() else {
        app.close_editor();
        return;
    };

    if editor.editing {
        match key {
            KeyCode::Esc | KeyCode::Enter => editor.editing = false,
            KeyCode::Backspace => editor.pop(),
            KeyCode::Left => editor.cycle(false),
            KeyCode::Right => editor.cycle(true),
            KeyCode::Char(c) => editor.push(c),
            _ => {}
        }
        return;
    }

    match key {
        KeyCode::Esc => {
            app.close_editor();
            app.status_message = "Edit discarded".to_string();
        }
        KeyCode::Up | KeyCode::BackTab => editor.prev_field(),
        KeyCode::Down | KeyCode::Tab => editor.next_field(),
        KeyCode::Left => editor.cycle(false),
        KeyCode::Right => editor.cycle(true),
        KeyCode::Enter if editor.on_save_button() => app.pending = Some(PendingAction::SaveEditor),
        KeyCode::Enter => editor.editing = true,
        KeyCode::Char('s') => app.pending = Some(PendingAction::SaveEditor),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::editor::EditorState;
    use crate::app::state::AppScreen;
    use crate::app::test_app;
    use adapt_forms::FormSchema;

    fn schema_editor_app() -> App {
        let mut app = test_app(Some("secret"));
        app.screen = AppScreen::Schemas;
        app.open_editor(
            EditorState::for_schema(&FormSchema::blank("newsletter")),
            AppScreen::Schemas,
        );
        app
    }

    #[test]
    fn typing_s_while_editing_is_text() {
        let mut app = schema_editor_app();
        handle_editor_input(&mut app, KeyCode::Enter);
        handle_editor_input(&mut app, KeyCode::Char('s'));
        assert_eq!(app.pending, None);
        assert_eq!(
            app.editor.as_ref().map(|e| e.value("title").to_string()),
            Some("newsletters".to_string())
        );

        handle_editor_input(&mut app, KeyCode::Enter);
        handle_editor_input(&mut app, KeyCode::Char('s'));
        assert_eq!(app.pending, Some(PendingAction::SaveEditor));
    }

    #[test]
    fn enter_on_save_button_queues_the_save() {
        let mut app = schema_editor_app();
        handle_editor_input(&mut app, KeyCode::Up);
        handle_editor_input(&mut app, KeyCode::Enter);
        assert_eq!(app.pending, Some(PendingAction::SaveEditor));
    }

    #[test]
    fn escape_backs_out_one_level_at_a_time() {
        let mut app = schema_editor_app();
        handle_editor_input(&mut app, KeyCode::Enter);
        handle_editor_input(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, AppScreen::Editor);
        handle_editor_input(&mut app, KeyCode::Esc);
        assert_eq!(app.screen, AppScreen::Schemas);
        assert!(app.editor.is_none());
    }
}
