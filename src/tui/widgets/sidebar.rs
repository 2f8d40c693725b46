// ABOUTME: Sidebar widget — the "New Session" action and one "Chat N" row per session.
// ABOUTME: Marks the active session and, when the sidebar has focus, the highlighted row.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::session::SessionStore;

pub const NEW_SESSION_LABEL: &str = "+ New Session";
pub const DELETE_LABEL: &str = "Delete";

/// Parameters for rendering the sidebar.
pub struct SidebarParams<'a> {
    pub store: &'a SessionStore,
    /// Highlighted row (0 = New Session); only drawn when `focused`.
    pub cursor: usize,
    pub focused: bool,
}

/// Render the sidebar rows.
pub fn sidebar_lines(params: &SidebarParams) -> Vec<Line<'static>> {
    let highlight = |row: usize| params.focused && params.cursor == row;
    let mut lines = Vec::with_capacity(params.store.len() + 1);

    lines.push(Line::from(Span::styled(
        NEW_SESSION_LABEL,
        row_style(highlight(0), Style::default().fg(Color::Yellow)),
    )));

    let active = params.store.active_index();
    for index in 0..params.store.len() {
        let row = index + 1;
        let is_active = active == Some(index);
        let marker = if is_active { "▶ " } else { "  " };
        let label_style = if is_active {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let mut spans = vec![
            Span::styled(marker, Style::default().fg(Color::Cyan)),
            Span::styled(format!("Chat {}", index + 1), row_style(highlight(row), label_style)),
        ];
        if highlight(row) {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("[d] {DELETE_LABEL}"),
                Style::default().fg(Color::Red),
            ));
        }
        lines.push(Line::from(spans));
    }

    lines
}

/// Rows to scroll so the row that matters stays inside `visible_rows`: the
/// highlighted row while the sidebar has focus, otherwise the active session.
pub fn sidebar_scroll(params: &SidebarParams, visible_rows: u16) -> u16 {
    let anchor = if params.focused {
        params.cursor
    } else {
        params.store.active_index().map_or(0, |i| i + 1)
    };
    let visible = usize::from(visible_rows.max(1));
    anchor.saturating_sub(visible - 1).min(usize::from(u16::MAX)) as u16
}

fn row_style(highlighted: bool, base: Style) -> Style {
    if highlighted {
        base.add_modifier(Modifier::REVERSED)
    } else {
        base
    }
}
