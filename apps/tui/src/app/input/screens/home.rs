use crate::app::input::helpers::{wrap_decrement, wrap_increment};
use crate::app::state::{App, AppScreen, HomeItem, PendingAction};
use crossterm::event::KeyCode;

pub fn handle_home_input(app: &mut App, key: KeyCode) {
    let items = app.home_items();

    match key {
        KeyCode::Char('q') | KeyCode::Esc => app.running = false,
        KeyCode::Up => app.home_index = wrap_decrement(app.home_index, items.len()),
        KeyCode::Down => app.home_index = wrap_increment(app.home_index, items.len()),
        KeyCode::Enter => {
            if let Some(item) = items.get(app.home_index) {
                open(app, *item);
            }
        }
        _ => {}
    }
}

fn open(app: &mut App, item: HomeItem) {
    match item {
        HomeItem::Forms => {
            app.screen = AppScreen::Forms;
            if app.is_admin() && app.schemas.is_empty() {
                app.pending = Some(PendingAction::LoadSchemas);
            }
        }
        HomeItem::Events => {
            app.screen = AppScreen::Events;
            app.pending = Some(PendingAction::LoadEvents);
        }
        HomeItem::Submissions => {
            app.screen = AppScreen::Submissions;
            app.pending = Some(PendingAction::LoadSubmissions);
        }
        HomeItem::Registrations => {
            app.registration_event = None;
            app.screen = AppScreen::Registrations;
            app.pending = Some(PendingAction::LoadRegistrations);
        }
        HomeItem::Schemas => {
            app.screen = AppScreen::Schemas;
            app.pending = Some(PendingAction::LoadSchemas);
        }
        HomeItem::DonationUrl => app.pending = Some(PendingAction::EditDonationUrl),
        HomeItem::Initialize => app.pending = Some(PendingAction::InitializeDatabase),
        HomeItem::Quit => app.running = false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_app;

    #[test]
    fn entering_events_queues_a_load() {
        let mut app = test_app(None);
        app.home_index = 1;
        handle_home_input(&mut app, KeyCode::Enter);
        assert_eq!(app.screen, AppScreen::Events);
        assert_eq!(app.pending, Some(PendingAction::LoadEvents));
    }

    #[test]
    fn admin_menu_reaches_settings_and_init() {
        let mut app = test_app(Some("secret"));
        let items = app.home_items();
        app.home_index = items
            .iter()
            .position(|item| *item == HomeItem::DonationUrl)
            .unwrap();
        handle_home_input(&mut app, KeyCode::Enter);
        assert_eq!(app.pending, Some(PendingAction::EditDonationUrl));

        app.pending = None;
        handle_home_input(&mut app, KeyCode::Down);
        handle_home_input(&mut app, KeyCode::Enter);
        assert_eq!(app.pending, Some(PendingAction::InitializeDatabase));
    }

    #[test]
    fn quit_is_last_for_public_users() {
        let mut app = test_app(None);
        handle_home_input(&mut app, KeyCode::Up);
        handle_home_input(&mut app, KeyCode::Enter);
        assert!(!app.running);
    }
}
