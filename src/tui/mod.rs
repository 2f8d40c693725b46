// ABOUTME: TUI module — ratatui full-screen interface for askcode.
// ABOUTME: Session sidebar, chat display, input footer, and status bar.

pub mod input;
pub mod state;
pub mod ui;
pub mod widgets;

pub use state::*;
