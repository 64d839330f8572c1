//! # InputBox Component
//!
//! One bordered, soft-wrapping text editor. The analyze screen stacks several
//! of these, one per comment.
//!
//! ## Responsibilities
//!
//! - Capture text input (typing, paste, Ctrl+J newlines)
//! - Cursor movement by character, word, logical line and visual row
//! - Internal scrolling once content outgrows `max_rows`
//! - Placeholder text while empty
//!
//! ## State Management
//!
//! The text and cursor are internal state. `title`, `placeholder`, `focused`
//! and `disabled` are props set by the parent each frame. The parent reads the
//! text back with `text()` whenever an `InputEvent::Edited` is emitted.

mod buffer;
mod layout;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use buffer::TextBuffer;
use layout::{
    CONTENT_INSET_X, CONTENT_INSET_Y, VERTICAL_OVERHEAD, inner_width, locate, vertical_target,
    visual_rows,
};

/// Rows shown before the box starts scrolling internally.
pub const DEFAULT_MAX_ROWS: u16 = 4;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Text changed; read it with `text()`
    Edited,
    /// Cursor moved without changing text
    Moved,
}

pub struct InputBox {
    pub title: String,
    pub placeholder: String,
    pub focused: bool,
    pub disabled: bool,
    pub max_rows: u16,
    buffer: TextBuffer,
    /// First visible visual row
    scroll: usize,
    /// Width from the last render, used for Up/Down before the next frame
    last_width: u16,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            placeholder: String::new(),
            focused: false,
            disabled: false,
            max_rows: DEFAULT_MAX_ROWS,
            buffer: TextBuffer::new(),
            scroll: 0,
            last_width: 80,
        }
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    /// Replaces the content (cursor to end). Used when the collector's copy
    /// diverges, e.g. after a reset.
    pub fn set_text(&mut self, text: &str) {
        self.buffer.set(text);
        self.scroll = 0;
    }

    /// Total height for `width`, clamped to `max_rows` of content.
    pub fn calculate_height(&self, width: u16) -> u16 {
        let rows = visual_rows(self.buffer.text(), inner_width(width)).len() as u16;
        rows.clamp(1, self.max_rows.max(1)) + VERTICAL_OVERHEAD
    }

    fn keep_cursor_visible(&mut self, cursor_row: usize, visible: usize) {
        if cursor_row < self.scroll {
            self.scroll = cursor_row;
        } else if cursor_row >= self.scroll + visible {
            self.scroll = cursor_row + 1 - visible;
        }
    }

    fn border_style(&self) -> Style {
        if self.disabled {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
        } else if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        }
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.last_width = area.width;
        let width = inner_width(area.width);
        let visible = area.height.saturating_sub(VERTICAL_OVERHEAD).max(1) as usize;

        let text = self.buffer.text();
        let rows = visual_rows(text, width);
        let (cursor_row, cursor_col) = locate(text, &rows, self.buffer.cursor());
        self.keep_cursor_visible(cursor_row, visible);
        self.scroll = self.scroll.min(rows.len().saturating_sub(visible));

        let text = self.buffer.text();
        let lines: Vec<Line> = if text.is_empty() {
            vec![Line::from(Span::styled(
                self.placeholder.clone(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ))]
        } else {
            let fg = if self.disabled { Color::DarkGray } else { Color::White };
            rows.iter()
                .skip(self.scroll)
                .take(visible)
                .map(|r| Line::from(Span::styled(text[r.clone()].to_string(), Style::default().fg(fg))))
                .collect()
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(self.border_style())
            .title(Span::styled(
                self.title.clone(),
                self.border_style().add_modifier(Modifier::BOLD),
            ))
            .padding(ratatui::widgets::Padding::horizontal(1));
        frame.render_widget(Paragraph::new(lines).block(block), area);

        if rows.len() > visible {
            let mut state = ScrollbarState::default()
                .content_length(rows.len() - visible)
                .position(self.scroll);
            let bar_area = Rect {
                x: area.x + area.width.saturating_sub(1),
                y: area.y + 1,
                width: 1,
                height: area.height.saturating_sub(VERTICAL_OVERHEAD),
            };
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                bar_area,
                &mut state,
            );
        }

        if self.focused && !self.disabled {
            let x = area.x + CONTENT_INSET_X + cursor_col as u16;
            let y = area.y + CONTENT_INSET_Y + (cursor_row - self.scroll) as u16;
            frame.set_cursor_position((
                x.min(area.right().saturating_sub(2)),
                y.min(area.bottom().saturating_sub(2)),
            ));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    /// Returns `None` when the event doesn't apply, including Up on the first
    /// row and Down on the last, so the parent can move focus instead.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.disabled {
            return None;
        }
        let moved = |changed: bool| changed.then_some(InputEvent::Moved);
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert_char(*c);
                Some(InputEvent::Edited)
            }
            TuiEvent::Paste(text) => {
                self.buffer.insert_str(text);
                Some(InputEvent::Edited)
            }
            TuiEvent::Backspace => self.buffer.backspace().then_some(InputEvent::Edited),
            TuiEvent::Delete => self.buffer.delete().then_some(InputEvent::Edited),
            TuiEvent::CursorLeft => moved(self.buffer.left()),
            TuiEvent::CursorRight => moved(self.buffer.right()),
            TuiEvent::WordLeft => moved(self.buffer.word_left()),
            TuiEvent::WordRight => moved(self.buffer.word_right()),
            TuiEvent::CursorHome => moved(self.buffer.home()),
            TuiEvent::CursorEnd => moved(self.buffer.end()),
            TuiEvent::CursorUp | TuiEvent::CursorDown => {
                let delta = if matches!(event, TuiEvent::CursorUp) { -1 } else { 1 };
                let text = self.buffer.text();
                let rows = visual_rows(text, inner_width(self.last_width));
                let target = vertical_target(text, &rows, self.buffer.cursor(), delta)?;
                self.buffer.set_cursor(target);
                Some(InputEvent::Moved)
            }
            _ => None,
        }
    }
}
