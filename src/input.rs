//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  Adding a new keybinding is
//! a single match arm in [`handle_key_event`].
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a `KeyCode` match arm in [`handle_key_event`] that calls it.
//! 3. Update the help text in `draw_status_bar` in [`crate::ui`].

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::app::App;

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => app.next_user(),
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => app.previous_user(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, KeyModifiers};

    use crate::app::tests::{make_app, users};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn q_and_esc_quit() {
        let (_transport, mut app) = make_app(users());
        handle_key_event(&mut app, press(KeyCode::Char('q')));
        assert!(app.quit);

        let (_transport, mut app) = make_app(users());
        handle_key_event(&mut app, press(KeyCode::Esc));
        assert!(app.quit);
    }

    #[tokio::test]
    async fn tab_and_arrows_switch_users() {
        let (_transport, mut app) = make_app(users());
        handle_key_event(&mut app, press(KeyCode::Tab));
        assert_eq!(app.selected_user, 1);
        handle_key_event(&mut app, press(KeyCode::Right));
        assert_eq!(app.selected_user, 2);
        handle_key_event(&mut app, press(KeyCode::Left));
        assert_eq!(app.selected_user, 1);
        handle_key_event(&mut app, press(KeyCode::BackTab));
        assert_eq!(app.selected_user, 0);
    }

    #[tokio::test]
    async fn release_events_are_ignored() {
        let (_transport, mut app) = make_app(users());
        let release = KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        handle_key_event(&mut app, release);
        assert!(!app.quit);
    }
}
