// ABOUTME: Chat widget — renders a session's messages into styled ratatui Lines.
// ABOUTME: Each message gets a bold "You" / "Ai Helper" label with its text below, line breaks kept.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::session::Message;

pub const USER_LABEL: &str = "You";
pub const BOT_LABEL: &str = "Ai Helper";

/// Render a slice of messages into styled Lines for display.
pub fn render_chat_lines(messages: &[Message]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (idx, msg) in messages.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(""));
        }

        let (label, color) = if msg.is_bot {
            (BOT_LABEL, Color::Cyan)
        } else {
            (USER_LABEL, Color::Green)
        };
        lines.push(Line::from(Span::styled(
            label,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));

        for text in msg.text.split('\n') {
            lines.push(Line::from(Span::raw(text.to_string())));
        }
    }

    lines
}

/// Placeholder shown when no session is selected.
pub fn empty_chat_lines(has_sessions: bool) -> Vec<Line<'static>> {
    let hint = if has_sessions {
        "Pick a chat from the sidebar (Tab), or just ask a question."
    } else {
        "Ask a question below to start your first chat."
    };
    vec![Line::from(Span::styled(
        hint,
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    ))]
}
