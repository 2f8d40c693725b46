// ABOUTME: Keyboard input handling for the TUI — translates key events into user intents.
// ABOUTME: Handles text editing in the input footer and navigation/actions in the session sidebar.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::state::{Focus, TuiState};

/// What the user asked for with a key press.
#[derive(Debug, PartialEq)]
pub enum InputResult {
    /// Nothing beyond local editing/navigation.
    None,
    /// Send this text to the responder.
    Send(String),
    NewSession,
    SwitchSession(usize),
    DeleteSession(usize),
    Quit,
}

/// Process a key event against the current TUI state and return the resulting intent.
pub fn handle_key(state: &mut TuiState, key: KeyEvent) -> InputResult {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
        return InputResult::Quit;
    }
    if ctrl && key.code == KeyCode::Char('n') {
        return InputResult::NewSession;
    }

    // PageUp/PageDown always scroll the chat, regardless of focus.
    match key.code {
        KeyCode::PageUp => {
            state.scroll_offset = state.scroll_offset.saturating_add(10);
            return InputResult::None;
        }
        KeyCode::PageDown => {
            state.scroll_offset = state.scroll_offset.saturating_sub(10);
            return InputResult::None;
        }
        _ => {}
    }

    match state.focus {
        Focus::Sidebar => handle_sidebar_key(state, key),
        Focus::Input => handle_input_key(state, key),
    }
}

fn handle_sidebar_key(state: &mut TuiState, key: KeyEvent) -> InputResult {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            state.sidebar_up();
            InputResult::None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.sidebar_down();
            InputResult::None
        }
        KeyCode::Enter => match state.sidebar_session() {
            Some(index) => InputResult::SwitchSession(index),
            None => InputResult::NewSession,
        },
        KeyCode::Delete | KeyCode::Char('d') => match state.sidebar_session() {
            Some(index) => InputResult::DeleteSession(index),
            None => InputResult::None,
        },
        KeyCode::Char('n') => InputResult::NewSession,
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Esc => {
            state.focus = Focus::Input;
            InputResult::None
        }
        _ => InputResult::None,
    }
}

fn handle_input_key(state: &mut TuiState, key: KeyEvent) -> InputResult {
    let newline = key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT);
    match key.code {
        KeyCode::Enter if newline => {
            state.insert_char_at_cursor('\n');
            InputResult::None
        }
        KeyCode::Char('j') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.insert_char_at_cursor('\n');
            InputResult::None
        }
        KeyCode::Enter => match state.take_input() {
            Some(text) => InputResult::Send(text),
            None => InputResult::None,
        },
        KeyCode::Tab | KeyCode::BackTab => {
            state.focus = Focus::Sidebar;
            state.sync_sidebar_to_active();
            InputResult::None
        }
        // Context-aware Up/Down: move within multiline input first, then scroll the chat.
        KeyCode::Up => {
            if !state.move_cursor_up_in_input() {
                state.scroll_offset = state.scroll_offset.saturating_add(1);
            }
            InputResult::None
        }
        KeyCode::Down => {
            if !state.move_cursor_down_in_input() {
                state.scroll_offset = state.scroll_offset.saturating_sub(1);
            }
            InputResult::None
        }
        KeyCode::Char(c) => {
            state.insert_char_at_cursor(c);
            InputResult::None
        }
        KeyCode::Backspace => {
            state.backspace_char();
            InputResult::None
        }
        KeyCode::Delete => {
            state.delete_char_at_cursor();
            InputResult::None
        }
        KeyCode::Left => {
            state.move_cursor_left();
            InputResult::None
        }
        KeyCode::Right => {
            state.move_cursor_right();
            InputResult::None
        }
        KeyCode::Home => {
            state.move_cursor_home();
            InputResult::None
        }
        KeyCode::End => {
            state.move_cursor_end();
            InputResult::None
        }
        KeyCode::Esc => InputResult::Quit,
        _ => InputResult::None,
    }
}
