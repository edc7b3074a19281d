use crate::app::input::helpers::navigate;
use crate::app::state::{App, AppScreen, PendingAction};
use crate::form::FormTarget;
use crossterm::event::KeyCode;

pub fn handle_forms_input(app: &mut App, key: KeyCode) {
    if navigate(&mut app.forms_index, app.form_types.len(), key) {
        return;
    }

    match key {
        KeyCode::Esc => app.screen = AppScreen::Home,
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('u') if app.is_admin() => app.pending = Some(PendingAction::LoadSchemas),
        KeyCode::Enter => {
            if let Some(form_type) = app.form_types.get(app.forms_index).cloned() {
                app.open_form(FormTarget::Form(form_type), AppScreen::Forms);
            }
        }
        _ => {}
    }
}
