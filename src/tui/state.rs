// ABOUTME: TUI state — the session store being shown plus the input buffer, focus, and toasts.
// ABOUTME: Everything the renderer reads lives here; the session store is the only durable part.

use std::time::{Duration, Instant};

use crate::exchange::ExchangeHandle;
use crate::session::SessionStore;

/// How long a toast stays in the status bar.
pub const TOAST_TTL: Duration = Duration::from_secs(8);

/// Which pane receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Sidebar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Error,
    Notice,
}

/// A transient line shown in the status bar.
#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub text: String,
    pub shown_at: Instant,
}

impl Toast {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= TOAST_TTL
    }
}

/// Full TUI application state.
pub struct TuiState {
    pub store: SessionStore,
    pub input: String,
    pub cursor_pos: usize,
    pub scroll_offset: u16,
    pub focus: Focus,
    /// Highlighted sidebar row: 0 is "New Session", row `i + 1` is session `i`.
    pub sidebar_cursor: usize,
    /// Requests issued but not yet answered.
    pub pending: Vec<ExchangeHandle>,
    pub toast: Option<Toast>,
    pub session_start: Instant,
}

impl TuiState {
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            input: String::new(),
            cursor_pos: 0,
            scroll_offset: 0,
            focus: Focus::Input,
            sidebar_cursor: 0,
            pending: Vec::new(),
            toast: None,
            session_start: Instant::now(),
        }
    }

    pub fn show_error(&mut self, text: impl Into<String>) {
        self.toast = Some(Toast {
            kind: ToastKind::Error,
            text: text.into(),
            shown_at: Instant::now(),
        });
    }

    pub fn show_notice(&mut self, text: impl Into<String>) {
        self.toast = Some(Toast {
            kind: ToastKind::Notice,
            text: text.into(),
            shown_at: Instant::now(),
        });
    }

    /// Drop the toast once it has been visible long enough. Returns true if it was cleared.
    pub fn expire_toast(&mut self, now: Instant) -> bool {
        if self.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.toast = None;
            return true;
        }
        false
    }

    /// Take the input buffer for sending. Returns None (and keeps the buffer) if
    /// it holds only whitespace. The text is sent exactly as typed.
    pub fn take_input(&mut self) -> Option<String> {
        if self.input.trim().is_empty() {
            return None;
        }
        self.cursor_pos = 0;
        Some(std::mem::take(&mut self.input))
    }

    /// Put unsent text back, unless the user has already started typing something new.
    pub fn restore_input(&mut self, text: &str) -> bool {
        if !self.input.trim().is_empty() {
            return false;
        }
        self.input = text.to_string();
        self.cursor_pos = self.input_char_len();
        true
    }

    /// Jump the chat view back to the newest message.
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }

    /// Number of sidebar rows: "New Session" plus one per session.
    pub fn sidebar_rows(&self) -> usize {
        self.store.len() + 1
    }

    pub fn clamp_sidebar_cursor(&mut self) {
        self.sidebar_cursor = self.sidebar_cursor.min(self.sidebar_rows() - 1);
    }

    pub fn sidebar_up(&mut self) {
        self.clamp_sidebar_cursor();
        self.sidebar_cursor = self.sidebar_cursor.saturating_sub(1);
    }

    pub fn sidebar_down(&mut self) {
        self.clamp_sidebar_cursor();
        if self.sidebar_cursor + 1 < self.sidebar_rows() {
            self.sidebar_cursor += 1;
        }
    }

    /// Session index under the sidebar cursor, if it is on a session row.
    pub fn sidebar_session(&self) -> Option<usize> {
        self.sidebar_cursor
            .checked_sub(1)
            .filter(|i| *i < self.store.len())
    }

    /// Point the sidebar cursor at the active session (or "New Session" if none).
    pub fn sync_sidebar_to_active(&mut self) {
        self.sidebar_cursor = self.store.active_index().map_or(0, |i| i + 1);
    }

    /// Clamp the cursor position to the valid character range of the input buffer.
    pub fn clamp_cursor(&mut self) {
        self.cursor_pos = self.cursor_pos.min(self.input_char_len());
    }

    /// Return the current cursor byte index in the UTF-8 input buffer.
    pub fn cursor_byte_index(&self) -> usize {
        char_index_to_byte_index(&self.input, self.cursor_pos)
    }

    pub fn input_char_len(&self) -> usize {
        self.input.chars().count()
    }

    /// Insert a character at the cursor and advance by one character.
    pub fn insert_char_at_cursor(&mut self, c: char) {
        self.clamp_cursor();
        let byte_index = self.cursor_byte_index();
        self.input.insert(byte_index, c);
        self.cursor_pos += 1;
    }

    /// Insert a pasted string at the cursor.
    pub fn insert_str_at_cursor(&mut self, text: &str) {
        self.clamp_cursor();
        let byte_index = self.cursor_byte_index();
        // Terminals deliver pasted newlines as carriage returns.
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        self.input.insert_str(byte_index, &normalized);
        self.cursor_pos += normalized.chars().count();
    }

    /// Delete the character before the cursor (backspace behavior).
    pub fn backspace_char(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos == 0 {
            return;
        }
        let end = self.cursor_byte_index();
        let start = char_index_to_byte_index(&self.input, self.cursor_pos - 1);
        self.input.replace_range(start..end, "");
        self.cursor_pos -= 1;
    }

    /// Delete the character at the cursor (delete behavior).
    pub fn delete_char_at_cursor(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos >= self.input_char_len() {
            return;
        }
        let start = self.cursor_byte_index();
        let end = char_index_to_byte_index(&self.input, self.cursor_pos + 1);
        self.input.replace_range(start..end, "");
    }

    pub fn move_cursor_left(&mut self) {
        self.clamp_cursor();
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos < self.input_char_len() {
            self.cursor_pos += 1;
        }
    }

    /// Move cursor to the start of the current input line.
    pub fn move_cursor_home(&mut self) {
        self.clamp_cursor();
        self.cursor_pos -= self.cursor_column();
    }

    /// Move cursor to the end of the current input line.
    pub fn move_cursor_end(&mut self) {
        self.clamp_cursor();
        let line = self.cursor_line();
        let line_len = self.input_lines()[line].chars().count();
        self.cursor_pos += line_len - self.cursor_column();
    }

    /// Input buffer split into logical lines (always at least one).
    pub fn input_lines(&self) -> Vec<&str> {
        self.input.split('\n').collect()
    }

    pub fn input_line_count(&self) -> usize {
        self.input_lines().len()
    }

    /// Zero-based logical line the cursor is on.
    pub fn cursor_line(&self) -> usize {
        self.input
            .chars()
            .take(self.cursor_pos)
            .filter(|c| *c == '\n')
            .count()
    }

    /// Character column of the cursor within its line.
    pub fn cursor_column(&self) -> usize {
        self.input
            .chars()
            .take(self.cursor_pos)
            .collect::<Vec<_>>()
            .iter()
            .rev()
            .take_while(|c| **c != '\n')
            .count()
    }

    /// Move the cursor up one line. Returns false when already on the first line.
    pub fn move_cursor_up_in_input(&mut self) -> bool {
        self.clamp_cursor();
        let line = self.cursor_line();
        if line == 0 {
            return false;
        }
        self.set_cursor_line_col(line - 1, self.cursor_column());
        true
    }

    /// Move the cursor down one line. Returns false when already on the last line.
    pub fn move_cursor_down_in_input(&mut self) -> bool {
        self.clamp_cursor();
        let line = self.cursor_line();
        if line + 1 >= self.input_line_count() {
            return false;
        }
        self.set_cursor_line_col(line + 1, self.cursor_column());
        true
    }

    fn set_cursor_line_col(&mut self, line: usize, col: usize) {
        let lines = self.input_lines();
        let before: usize = lines[..line].iter().map(|l| l.chars().count() + 1).sum();
        let col = col.min(lines[line].chars().count());
        self.cursor_pos = before + col;
    }
}

fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    if char_index == 0 {
        return 0;
    }
    match s.char_indices().nth(char_index) {
        Some((idx, _)) => idx,
        None => s.len(),
    }
}
