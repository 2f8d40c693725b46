// ABOUTME: TUI widget modules — chat messages, session sidebar, and status bar.
// ABOUTME: Each widget turns state into styled ratatui Lines; layout lives in ui.rs.

pub mod chat;
pub mod sidebar;
pub mod status;
