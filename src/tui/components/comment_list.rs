//! # CommentList Component
//!
//! The analyze screen: a header, a stack of `InputBox` editors (one per
//! collector entry) and a footer with key help or the loading indicator.
//!
//! ## Architecture
//!
//! Same split as the other stateful components: `CommentListState` persists in
//! `TuiState` and owns the editors; `CommentList` is rebuilt every frame with
//! props from the collector. The collector stays the source of truth for the
//! text, so `sync()` is called before each frame to pull in changes that
//! didn't originate from typing (reset, removal).

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::collector::{MAX_COMMENTS, MIN_COMMENT_CHARS};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::input_box::{InputBox, InputEvent};
use crate::tui::event::TuiEvent;

const SPINNER: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// What the analyze screen asks the controller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectorEvent {
    Edited { index: usize, text: String },
    Add,
    Remove(usize),
    Submit,
    Back,
}

pub struct CommentListState {
    editors: Vec<InputBox>,
    pub focused: usize,
    /// First editor drawn; moves to keep the focused one on screen
    first_visible: usize,
}

impl Default for CommentListState {
    fn default() -> Self {
        Self::new()
    }
}

impl CommentListState {
    pub fn new() -> Self {
        Self {
            editors: vec![InputBox::new()],
            focused: 0,
            first_visible: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.editors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }

    pub fn editor_text(&self, index: usize) -> Option<&str> {
        self.editors.get(index).map(InputBox::text)
    }

    /// Mirrors the collector: same number of editors, same text. Editors
    /// whose text already matches keep their cursor.
    pub fn sync(&mut self, comments: &[String]) {
        self.editors.resize_with(comments.len(), InputBox::new);
        for (editor, comment) in self.editors.iter_mut().zip(comments) {
            if editor.text() != comment {
                editor.set_text(comment);
            }
        }
        self.focused = self.focused.min(self.editors.len().saturating_sub(1));
        self.first_visible = self.first_visible.min(self.focused);
    }

    /// Call after the collector accepted an add: a new editor at the end,
    /// focused.
    pub fn after_add(&mut self, comments: &[String]) {
        self.sync(comments);
        self.focused = self.editors.len().saturating_sub(1);
    }

    /// Call after the collector removed `index`. Focus moves to the nearest
    /// surviving entry.
    pub fn after_remove(&mut self, index: usize, comments: &[String]) {
        if index < self.editors.len() {
            self.editors.remove(index);
        }
        if self.focused > index || self.focused >= comments.len() {
            self.focused = self.focused.saturating_sub(1);
        }
        self.sync(comments);
    }

    /// Back to a single empty editor.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn focus_next(&mut self) {
        if !self.editors.is_empty() {
            self.focused = (self.focused + 1) % self.editors.len();
        }
    }

    fn focus_prev(&mut self) {
        if !self.editors.is_empty() {
            self.focused = (self.focused + self.editors.len() - 1) % self.editors.len();
        }
    }

    fn scroll_to_focused(&mut self, heights: &[u16], viewport: u16) {
        if self.focused < self.first_visible {
            self.first_visible = self.focused;
        }
        while self.first_visible < self.focused
            && heights[self.first_visible..=self.focused].iter().sum::<u16>() > viewport
        {
            self.first_visible += 1;
        }
    }
}

impl EventHandler for CommentListState {
    type Event = CollectorEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Escape => Some(CollectorEvent::Back),
            TuiEvent::Submit | TuiEvent::ForceSubmit => Some(CollectorEvent::Submit),
            TuiEvent::AddEntry => Some(CollectorEvent::Add),
            TuiEvent::RemoveEntry => Some(CollectorEvent::Remove(self.focused)),
            TuiEvent::FocusNext => {
                self.focus_next();
                None
            }
            TuiEvent::FocusPrev => {
                self.focus_prev();
                None
            }
            _ => {
                let index = self.focused;
                let editor = self.editors.get_mut(index)?;
                match editor.handle_event(event) {
                    Some(InputEvent::Edited) => Some(CollectorEvent::Edited {
                        index,
                        text: editor.text().to_string(),
                    }),
                    Some(InputEvent::Moved) => None,
                    None => {
                        // Arrowing past the first/last row walks between comments
                        if !editor.disabled {
                            match event {
                                TuiEvent::CursorUp if index > 0 => self.focused -= 1,
                                TuiEvent::CursorDown if index + 1 < self.editors.len() => {
                                    self.focused += 1
                                }
                                _ => {}
                            }
                        }
                        None
                    }
                }
            }
        }
    }
}

/// Analyze screen, rebuilt every frame.
pub struct CommentList<'a> {
    pub state: &'a mut CommentListState,
    pub loading: bool,
    pub spinner_frame: usize,
}

impl<'a> CommentList<'a> {
    pub fn new(state: &'a mut CommentListState, loading: bool, spinner_frame: usize) -> Self {
        Self {
            state,
            loading,
            spinner_frame,
        }
    }

    fn header(&self) -> Paragraph<'static> {
        Paragraph::new(vec![
            Line::from(Span::styled(
                "Discover Your Personality",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!(
                    "Share a few thoughts about yourself. Up to {MAX_COMMENTS} comments, at least {MIN_COMMENT_CHARS} characters each."
                ),
                Style::default().fg(Color::Gray),
            )),
        ])
        .alignment(Alignment::Center)
    }

    fn footer(&self) -> Paragraph<'static> {
        let line = if self.loading {
            Line::from(vec![
                Span::styled(
                    format!("{} ", SPINNER[self.spinner_frame % SPINNER.len()]),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(
                    "Analyzing...",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("  Esc cancel", Style::default().fg(Color::DarkGray)),
            ])
        } else {
            let key = Style::default().fg(Color::Cyan);
            let dim = Style::default().fg(Color::DarkGray);
            Line::from(vec![
                Span::styled(
                    format!("{}/{} ", self.state.len(), MAX_COMMENTS),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled("Enter", key),
                Span::styled(" analyze  ", dim),
                Span::styled("Ctrl+J", key),
                Span::styled(" newline  ", dim),
                Span::styled("Tab", key),
                Span::styled(" next  ", dim),
                Span::styled("Ctrl+N", key),
                Span::styled(" add  ", dim),
                Span::styled("Ctrl+D", key),
                Span::styled(" remove  ", dim),
                Span::styled("Esc", key),
                Span::styled(" back", dim),
            ])
        };
        Paragraph::new(line).alignment(Alignment::Center)
    }
}

impl<'a> Component for CommentList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [header_area, body_area, footer_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(self.header(), header_area);
        frame.render_widget(self.footer(), footer_area);

        // Props for every editor
        let loading = self.loading;
        let focused = self.state.focused;
        for (i, editor) in self.state.editors.iter_mut().enumerate() {
            let n = i + 1;
            let chars = editor.text().chars().count();
            editor.title = if !editor.text().trim().is_empty() && chars < MIN_COMMENT_CHARS {
                format!(" Comment {n} · {chars}/{MIN_COMMENT_CHARS} chars ")
            } else {
                format!(" Comment {n} ")
            };
            editor.placeholder =
                format!("Comment {n}: Share your thoughts, experiences, or opinions...");
            editor.focused = i == focused;
            editor.disabled = loading;
        }

        let heights: Vec<u16> = self
            .state
            .editors
            .iter()
            .map(|e| e.calculate_height(body_area.width))
            .collect();
        self.state.scroll_to_focused(&heights, body_area.height);

        let mut y = body_area.y;
        let first = self.state.first_visible;
        for (editor, &height) in self.state.editors.iter_mut().zip(&heights).skip(first) {
            if y + height > body_area.bottom() {
                break;
            }
            editor.render(frame, Rect::new(body_area.x, y, body_area.width, height));
            y += height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn comments(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    fn screen(state: &mut CommentListState, loading: bool, w: u16, h: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
        terminal
            .draw(|f| CommentList::new(state, loading, 0).render(f, f.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_typing_reports_index_and_text() {
        let mut state = CommentListState::new();
        state.sync(&comments(&["", ""]));
        state.handle_event(&TuiEvent::FocusNext);
        let event = state.handle_event(&TuiEvent::InputChar('x'));
        assert_eq!(
            event,
            Some(CollectorEvent::Edited {
                index: 1,
                text: "x".to_string()
            })
        );
    }

    #[test]
    fn test_focus_wraps_both_ways() {
        let mut state = CommentListState::new();
        state.sync(&comments(&["", "", ""]));
        state.handle_event(&TuiEvent::FocusPrev);
        assert_eq!(state.focused, 2);
        state.handle_event(&TuiEvent::FocusNext);
        assert_eq!(state.focused, 0);
    }

    #[test]
    fn test_arrow_past_edge_moves_focus() {
        let mut state = CommentListState::new();
        state.sync(&comments(&["first", "second"]));
        state.handle_event(&TuiEvent::CursorDown);
        assert_eq!(state.focused, 1);
        state.handle_event(&TuiEvent::CursorUp);
        assert_eq!(state.focused, 0);
    }

    #[test]
    fn test_control_keys_map_to_collector_events() {
        let mut state = CommentListState::new();
        assert_eq!(state.handle_event(&TuiEvent::AddEntry), Some(CollectorEvent::Add));
        assert_eq!(
            state.handle_event(&TuiEvent::RemoveEntry),
            Some(CollectorEvent::Remove(0))
        );
        assert_eq!(state.handle_event(&TuiEvent::Submit), Some(CollectorEvent::Submit));
        assert_eq!(
            state.handle_event(&TuiEvent::ForceSubmit),
            Some(CollectorEvent::Submit)
        );
        assert_eq!(state.handle_event(&TuiEvent::Escape), Some(CollectorEvent::Back));
    }

    #[test]
    fn test_remove_focused_moves_to_nearest() {
        let mut state = CommentListState::new();
        state.sync(&comments(&["a", "b", "c"]));
        state.focused = 2;
        state.after_remove(2, &comments(&["a", "b"]));
        assert_eq!(state.focused, 1);
        assert_eq!(state.editor_text(1), Some("b"));

        state.focused = 0;
        state.after_remove(0, &comments(&["b"]));
        assert_eq!(state.focused, 0);
        assert_eq!(state.editor_text(0), Some("b"));
    }

    #[test]
    fn test_remove_before_focus_keeps_same_entry_focused() {
        let mut state = CommentListState::new();
        state.sync(&comments(&["a", "b", "c"]));
        state.focused = 2;
        state.after_remove(0, &comments(&["b", "c"]));
        assert_eq!(state.focused, 1);
        assert_eq!(state.editor_text(1), Some("c"));
    }

    #[test]
    fn test_add_focuses_new_entry() {
        let mut state = CommentListState::new();
        state.after_add(&comments(&["a", ""]));
        assert_eq!(state.len(), 2);
        assert_eq!(state.focused, 1);
    }

    #[test]
    fn test_sync_pulls_reset_text() {
        let mut state = CommentListState::new();
        state.sync(&comments(&["typed text", "more"]));
        state.focused = 1;
        state.sync(&comments(&[""]));
        assert_eq!(state.len(), 1);
        assert_eq!(state.focused, 0);
        assert_eq!(state.editor_text(0), Some(""));
    }

    #[test]
    fn test_render_placeholders_and_header() {
        let mut state = CommentListState::new();
        state.sync(&comments(&["", ""]));
        let text = screen(&mut state, false, 100, 20);
        assert!(text.contains("Discover Your Personality"));
        assert!(text.contains("Comment 1: Share your thoughts, experiences, or opinions..."));
        assert!(text.contains("Comment 2: Share your thoughts"));
        assert!(text.contains("2/10"));
    }

    #[test]
    fn test_render_loading_indicator() {
        let mut state = CommentListState::new();
        let text = screen(&mut state, true, 100, 12);
        assert!(text.contains("Analyzing..."));
    }

    #[test]
    fn test_focused_editor_stays_visible() {
        let mut state = CommentListState::new();
        state.sync(&comments(&["one", "two", "three", "four", "five", "six"]));
        state.focused = 5;
        // 3 header + 1 footer leaves 8 rows: two 3-row editors fit
        let text = screen(&mut state, false, 60, 12);
        assert!(text.contains("six"));
        assert!(!text.contains("one"));
    }
}
