// ABOUTME: Status bar widget — session count, in-flight requests, elapsed time, and toasts.
// ABOUTME: Displayed at the bottom of the TUI as a single-line summary.

use std::time::Instant;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::state::{Toast, ToastKind};

/// Parameters for rendering the status bar.
pub struct StatusBarParams<'a> {
    pub session_count: usize,
    pub pending: usize,
    pub session_start: Instant,
    pub toast: Option<&'a Toast>,
}

/// Render the status bar line.
pub fn status_line(params: &StatusBarParams) -> Line<'static> {
    let dim = Style::default().fg(Color::DarkGray);

    if let Some(toast) = params.toast {
        let (prefix, color) = match toast.kind {
            ToastKind::Error => (" ⚠ ", Color::Red),
            ToastKind::Notice => (" ℹ ", Color::Yellow),
        };
        return Line::from(vec![
            Span::styled(
                prefix,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(first_line(&toast.text), Style::default().fg(color)),
        ]);
    }

    let chats = if params.session_count == 1 {
        "1 chat ".to_string()
    } else {
        format!("{} chats ", params.session_count)
    };
    let mut spans = vec![
        Span::styled(format!(" {chats}"), Style::default().fg(Color::White)),
        Span::styled("| ", dim),
        Span::styled(
            format!("{} ", format_elapsed(params.session_start.elapsed().as_secs())),
            dim,
        ),
    ];

    if params.pending > 0 {
        spans.push(Span::styled("| ", dim));
        spans.push(Span::styled(
            format!("waiting for {} repl{}... ", params.pending, if params.pending == 1 { "y" } else { "ies" }),
            Style::default().fg(Color::Yellow),
        ));
    }

    spans.push(Span::styled("| Tab: chats  Enter: send  Ctrl+N: new  Ctrl+C: quit", dim));

    Line::from(spans)
}

/// Format elapsed seconds as `Xm YYs`, or `Xh YYm` past an hour.
pub fn format_elapsed(secs: u64) -> String {
    if secs >= 3600 {
        format!("{}h {:02}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}

// Error bodies can be whole HTML pages; the bar has room for one line.
fn first_line(text: &str) -> String {
    let mut lines = text.lines();
    let first = lines.next().unwrap_or_default().to_string();
    if lines.next().is_some() {
        format!("{first} …")
    } else {
        first
    }
}
