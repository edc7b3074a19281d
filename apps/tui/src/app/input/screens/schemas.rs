use crate::app::editor::EditorState;
use crate::app::input::helpers::navigate;
use crate::app::state::{App, AppScreen, PendingAction};
use crate::form::FormTarget;
use crossterm::event::KeyCode;

pub fn handle_schemas_input(app: &mut App, key: KeyCode) {
    if navigate(&mut app.schemas_index, app.schemas.len(), key) {
        return;
    }

    match key {
        KeyCode::Esc => app.screen = AppScreen::Home,
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('t' | ' ') if !app.schemas.is_empty() => {
            app.pending = Some(PendingAction::ToggleSchema);
        }
        KeyCode::Char('u') | KeyCode::F(5) => app.pending = Some(PendingAction::LoadSchemas),
        KeyCode::Char('e') => {
            if let Some(editor) = app.selected_schema().map(EditorState::for_schema) {
                app.open_editor(editor, AppScreen::Schemas);
            }
        }
        KeyCode::Enter => {
            if let Some(form_type) = app.selected_schema().map(|s| s.form_type.clone()) {
                app.open_form(FormTarget::Form(form_type), AppScreen::Schemas);
            }
        }
        _ => {}
    }
}
