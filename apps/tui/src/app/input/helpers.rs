use crate::app::state::{App, PendingAction};
use crossterm::event::KeyCode;

const PAGE: usize = 5;

pub const fn wrap_decrement(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    if index == 0 {
        len - 1
    } else {
        index - 1
    }
}

pub const fn wrap_increment(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }

    (index + 1) % len
}

/// Table movement shared by every list screen. Returns true if `key` moved
/// the selection.
pub fn navigate(index: &mut usize, len: usize, key: KeyCode) -> bool {
    if len == 0 {
        *index = 0;
        return matches!(
            key,
            KeyCode::Up | KeyCode::Down | KeyCode::PageUp | KeyCode::PageDown | KeyCode::Home | KeyCode::End
        );
    }

    match key {
        KeyCode::Up => *index = index.saturating_sub(1),
        KeyCode::Down => *index = (*index + 1).min(len - 1),
        KeyCode::PageUp => *index = index.saturating_sub(PAGE),
        KeyCode::PageDown => *index = (*index + PAGE).min(len - 1),
        KeyCode::Home => *index = 0,
        KeyCode::End => *index = len - 1,
        _ => return false,
    }
    true
}

/// While a delete is awaiting confirmation, `y` queues `action` and any other
/// key cancels. Returns true if the key was consumed.
pub fn handle_delete_confirmation(app: &mut App, key: KeyCode, action: PendingAction) -> bool {
    if !app.confirm_delete {
        return false;
    }
    app.confirm_delete = false;
    if matches!(key, KeyCode::Char('y' | 'Y')) {
        app.pending = Some(action);
    } else {
        app.status_message = "Delete cancelled".to_string();
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapping_handles_empty_lists() {
        assert_eq!(wrap_increment(0, 0), 0);
        assert_eq!(wrap_decrement(0, 3), 2);
        assert_eq!(wrap_increment(2, 3), 0);
    }

    #[test]
    fn navigation_stops_at_the_ends() {
        let mut index = 0;
        assert!(navigate(&mut index, 3, KeyCode::Up));
        assert_eq!(index, 0);
        navigate(&mut index, 3, KeyCode::PageDown);
        assert_eq!(index, 2);
        assert!(!navigate(&mut index, 3, KeyCode::Char('x')));
    }
}
