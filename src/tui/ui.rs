// ABOUTME: Main TUI rendering function — assembles header, sidebar, chat, input footer, and status bar.
// ABOUTME: Splits the terminal frame into layout chunks and delegates to widgets.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::tui::state::{Focus, TuiState};
use crate::tui::widgets::chat::{empty_chat_lines, render_chat_lines};
use crate::tui::widgets::sidebar::{SidebarParams, sidebar_lines, sidebar_scroll};
use crate::tui::widgets::status::{StatusBarParams, status_line};

pub const INPUT_PLACEHOLDER: &str = "Place your code and question...";
const SIDEBAR_WIDTH: u16 = 24;
// Maximum height the input area can grow to (in terminal rows).
const MAX_INPUT_HEIGHT: u16 = 10;

/// Render the full TUI screen layout to the given frame.
pub fn render(frame: &mut Frame, state: &mut TuiState) {
    let area = frame.area();

    // +2 accounts for top and bottom borders
    let input_height = (state.input_line_count() as u16 + 2).clamp(3, MAX_INPUT_HEIGHT);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),            // Header
            Constraint::Min(3),               // Sidebar + chat
            Constraint::Length(input_height), // Input footer
            Constraint::Length(1),            // Status bar
        ])
        .split(area);

    let sidebar_width = SIDEBAR_WIDTH.min(area.width / 3);
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(sidebar_width), Constraint::Min(1)])
        .split(rows[1]);

    // Header
    let title = match state.store.active_index() {
        Some(i) => format!(" askcode · Chat {}", i + 1),
        None => " askcode".to_string(),
    };
    let header = Line::from(Span::styled(
        title,
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(header), rows[0]);

    // Sidebar
    state.clamp_sidebar_cursor();
    let sidebar_focused = state.focus == Focus::Sidebar;
    let sidebar_block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(if sidebar_focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        });
    let sidebar_params = SidebarParams {
        store: &state.store,
        cursor: state.sidebar_cursor,
        focused: sidebar_focused,
    };
    // Only a right border, so every row of the chunk holds an entry.
    let sidebar_offset = sidebar_scroll(&sidebar_params, body[0].height);
    let sidebar = Paragraph::new(sidebar_lines(&sidebar_params))
        .block(sidebar_block)
        .scroll((sidebar_offset, 0));
    frame.render_widget(sidebar, body[0]);

    // Chat area: only the active session's messages are shown.
    let chat_lines = match state.store.active_session() {
        Some(session) => render_chat_lines(&session.messages),
        None => empty_chat_lines(!state.store.is_empty()),
    };
    let chat_chunk = body[1].inner(ratatui::layout::Margin::new(1, 0));
    let visible_height = chat_chunk.height;

    // Use ratatui's own line_count() so the wrapped height matches rendering exactly.
    let chat_paragraph = Paragraph::new(chat_lines).wrap(Wrap { trim: false });
    let total_lines = chat_paragraph.line_count(chat_chunk.width) as u16;
    let max_scroll = total_lines.saturating_sub(visible_height);

    // Cap scroll_offset so it can't go past the top of the content.
    if state.scroll_offset > max_scroll {
        state.scroll_offset = max_scroll;
    }

    // scroll_offset is lines scrolled up from the bottom (0 = at bottom)
    let scroll = max_scroll.saturating_sub(state.scroll_offset);
    frame.render_widget(chat_paragraph.scroll((scroll, 0)), chat_chunk);

    // Input footer
    let input_chunk = rows[2];
    let input_focused = state.focus == Focus::Input;
    let mut input_block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(if input_focused {
            Style::default()
        } else {
            Style::default().fg(Color::DarkGray)
        })
        .title_bottom(
            Line::from(Span::styled(
                " [Enter] Send ",
                Style::default().fg(Color::Green),
            ))
            .right_aligned(),
        );
    if !state.pending.is_empty() {
        input_block = input_block.title(Span::styled(
            " waiting for reply... ",
            Style::default().fg(Color::DarkGray),
        ));
    }

    let input = if state.input.is_empty() {
        Paragraph::new(Span::styled(
            INPUT_PLACEHOLDER,
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Paragraph::new(state.input.clone())
    };
    frame.render_widget(input.block(input_block), input_chunk);

    if input_focused && input_chunk.width > 0 && input_chunk.height > 1 {
        state.clamp_cursor();

        let cursor_line = state.cursor_line();
        let cursor_col = state.cursor_column();

        // Compute the visual (display) width of the text before the cursor on its line.
        let lines = state.input_lines();
        let line_text = lines.get(cursor_line).unwrap_or(&"");
        let prefix: String = line_text.chars().take(cursor_col).collect();
        let visual_col = UnicodeWidthStr::width(prefix.as_str());

        let max_visual_col = input_chunk.width.saturating_sub(1) as usize;
        let clamped_visual_col = visual_col.min(max_visual_col);

        let max_line = input_chunk.height.saturating_sub(3) as usize;
        let cursor_x = input_chunk.x.saturating_add(clamped_visual_col as u16);
        // +1 for the top border, then offset by the cursor's line index.
        let cursor_y = input_chunk
            .y
            .saturating_add(1 + cursor_line.min(max_line) as u16);
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }

    // Status bar
    let status = status_line(&StatusBarParams {
        session_count: state.store.len(),
        pending: state.pending.len(),
        session_start: state.session_start,
        toast: state.toast.as_ref(),
    });
    frame.render_widget(Paragraph::new(status), rows[3]);
}
