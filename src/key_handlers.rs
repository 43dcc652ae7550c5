use crate::app::{App, AppState};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

pub fn handle_key(key: KeyEvent, app: &mut App) {
    match app.state {
        AppState::Chat => handle_chat_input(key, app),
        AppState::QuitConfirm => handle_quit_confirm_input(key, app),
        AppState::Quit => {}
    }
}

pub fn handle_chat_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => app.cancel(),
        KeyCode::Enter if !key.modifiers.contains(KeyModifiers::SHIFT) => app.submit(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::PageDown => app.page_down(),
        KeyCode::End => app.follow(),
        KeyCode::Tab => app.focus_next_snippet(),
        KeyCode::BackTab => app.focus_previous_snippet(),
        KeyCode::Backspace => {
            if !app.chat.is_streaming() {
                app.chat.backspace();
            }
        }
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match c {
                    'c' => app.state = AppState::QuitConfirm,
                    'y' => app.copy_snippet(None, Instant::now()),
                    'u' => app.scroll_up(),
                    'd' => app.scroll_down(),
                    _ => {}
                }
            } else if key.modifiers.contains(KeyModifiers::ALT) {
                if let Some(number) = c.to_digit(10) {
                    app.copy_snippet(Some(number as usize), Instant::now());
                }
            } else if !app.chat.is_streaming() {
                // Input is disabled while a reply is in flight.
                app.chat.push_char(c);
            }
        }
        _ => {}
    }
}

pub fn handle_quit_confirm_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
            app.state = AppState::Quit;
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            app.state = AppState::Chat;
        }
        _ => {}
    }
}
