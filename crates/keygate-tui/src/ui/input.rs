//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, LoginFocus, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Credential entry replaces everything else while the gate is closed
    if !app.is_authenticated() {
        return Ok(handle_login_input(app, key));
    }

    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    match key.code {
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('r') => app.refresh_accounts(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_account(1),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev_account(1),
        KeyCode::PageDown => app.select_next_account(PAGE_SCROLL_SIZE),
        KeyCode::PageUp => app.select_prev_account(PAGE_SCROLL_SIZE),
        _ => {}
    }
    Ok(false)
}

fn handle_login_input(app: &mut App, key: KeyEvent) -> bool {
    if app.locale_picker.is_open() {
        handle_locale_picker_input(app, key);
        return false;
    }

    match key.code {
        KeyCode::Esc => {
            // Quit if on login screen
            app.state = AppState::Quitting;
            return true;
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login_focus = app.login_focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login_focus = app.login_focus.prev();
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Key | LoginFocus::Button => app.attempt_login(),
            LoginFocus::Language => app.toggle_locale_picker(),
        },
        KeyCode::Backspace => {
            if app.login_focus == LoginFocus::Key {
                app.login_input.pop();
            }
        }
        KeyCode::Char(c) => {
            // Ignore character input outside the key field
            if app.login_focus == LoginFocus::Key {
                app.push_login_char(c);
            }
        }
        _ => {}
    }
    false
}

fn handle_locale_picker_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.locale_picker.close(),
        KeyCode::Down | KeyCode::Tab | KeyCode::Char('j') => app.locale_picker.next(),
        KeyCode::Up | KeyCode::BackTab | KeyCode::Char('k') => app.locale_picker.prev(),
        KeyCode::Enter => app.confirm_locale(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use keygate_core::{Config, ExecutionMode};

    use super::*;
    use crate::app::Root;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn hosted_app(dir: &std::path::Path) -> (Root, App) {
        let root = Root::new(Config::default(), dir.to_path_buf());
        let app = App::new(&root).unwrap();
        (root, app)
    }

    #[test]
    fn test_typing_and_submitting_key() {
        let dir = tempfile::tempdir().unwrap();
        let (root, mut app) = hosted_app(dir.path());

        for c in "xyz789".chars() {
            handle_input(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        handle_input(&mut app, key(KeyCode::Backspace)).unwrap();
        assert_eq!(app.login_input, "xyz78");

        handle_input(&mut app, key(KeyCode::Enter)).unwrap();
        assert!(root.reload.take());
    }

    #[test]
    fn test_chars_ignored_off_key_field() {
        let dir = tempfile::tempdir().unwrap();
        let (_root, mut app) = hosted_app(dir.path());

        handle_input(&mut app, key(KeyCode::Tab)).unwrap();
        assert_eq!(app.login_focus, LoginFocus::Button);
        handle_input(&mut app, key(KeyCode::Char('q'))).unwrap();
        assert!(app.login_input.is_empty());
        assert_eq!(app.state, AppState::Normal);
    }

    #[test]
    fn test_locale_picker_navigation_closes_on_esc() {
        let dir = tempfile::tempdir().unwrap();
        let (_root, mut app) = hosted_app(dir.path());

        app.login_focus = LoginFocus::Language;
        handle_input(&mut app, key(KeyCode::Enter)).unwrap();
        assert!(app.locale_picker.is_open());

        handle_input(&mut app, key(KeyCode::Down)).unwrap();
        assert_eq!(app.locale_picker.highlighted(), keygate_core::Locale::Ja);

        // Esc closes the picker instead of quitting
        let quit = handle_input(&mut app, key(KeyCode::Esc)).unwrap();
        assert!(!quit);
        assert!(!app.locale_picker.is_open());
        assert_eq!(app.locale.get(), keygate_core::Locale::En);
    }

    #[test]
    fn test_esc_on_login_quits() {
        let dir = tempfile::tempdir().unwrap();
        let (_root, mut app) = hosted_app(dir.path());
        assert!(handle_input(&mut app, key(KeyCode::Esc)).unwrap());
        assert_eq!(app.state, AppState::Quitting);
    }

    #[test]
    fn test_desktop_mode_skips_login() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            mode: ExecutionMode::Desktop,
            ..Config::default()
        };
        let root = Root::new(config, dir.path().to_path_buf());
        let mut app = App::new(&root).unwrap();
        assert!(app.is_authenticated());

        handle_input(&mut app, key(KeyCode::Char('?'))).unwrap();
        assert_eq!(app.state, AppState::ShowingHelp);
        handle_input(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(app.state, AppState::Normal);

        handle_input(&mut app, key(KeyCode::Char('q'))).unwrap();
        assert_eq!(app.state, AppState::ConfirmingQuit);
        assert!(handle_input(&mut app, key(KeyCode::Char('y'))).unwrap());
    }
}
