//! # ResultsView Component
//!
//! Scrollable results screen: header, "Trait Distribution" chart, one
//! `TraitCard` per score (in received order), the narrative summary sections
//! and the "Take Test Again" action.
//!
//! ## Architecture
//!
//! `ResultsView` is a transient component (created each frame) that wraps
//! `&'a mut ResultsViewState` (scroll + selected card) and the shown results
//! (props). Which blocks appear is decided by the pure `build_blocks`, so the
//! rules (one card per score, skip empty summary fields) are testable without
//! a terminal.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::api::{PredictionResult, SummarySection};
use crate::core::state::ShownResults;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::trait_card::TraitCard;
use crate::tui::components::trait_chart::TraitChart;
use crate::tui::event::TuiEvent;
use crate::tui::markdown;

/// One vertical slot of the results page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultBlock {
    Header,
    Chart,
    /// Index into `scores`
    Card(usize),
    SummaryHeading,
    /// Index into `Summary::sections()`
    Section(usize),
    Footnote,
    Actions,
}

/// Blocks to show for `result`, top to bottom.
pub fn build_blocks(result: &PredictionResult) -> Vec<ResultBlock> {
    let mut blocks = vec![ResultBlock::Header];
    if !result.scores.is_empty() {
        blocks.push(ResultBlock::Chart);
    }
    blocks.extend((0..result.scores.len()).map(ResultBlock::Card));

    if let Some(summary) = &result.summary {
        let sections = summary.sections();
        let footnote = summary.provenance().is_some();
        if !sections.is_empty() || footnote {
            blocks.push(ResultBlock::SummaryHeading);
        }
        blocks.extend((0..sections.len()).map(ResultBlock::Section));
        if footnote {
            blocks.push(ResultBlock::Footnote);
        }
    }
    blocks.push(ResultBlock::Actions);
    blocks
}

/// Row count as `u16`, saturating for text longer than the canvas can hold.
fn clamp_rows(rows: usize) -> u16 {
    u16::try_from(rows).unwrap_or(u16::MAX)
}

/// Lays blocks out top to bottom as `(top, height)`. The canvas is capped at
/// `u16::MAX` rows; blocks past the cap are cut short or get zero height.
fn stack(heights: &[u16]) -> Vec<(u16, u16)> {
    let mut top = 0u16;
    heights
        .iter()
        .map(|&h| {
            let h = h.min(u16::MAX - top);
            let span = (top, h);
            top += h;
            span
        })
        .collect()
}

/// What the results screen asks the controller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsEvent {
    /// "Take Test Again"
    Reset,
    Back,
    /// Insight for the card at this index
    RequestInsight(usize),
}

pub struct ResultsViewState {
    pub scroll_state: ScrollViewState,
    pub selected: usize,
    /// Cards known from the last render
    card_count: usize,
    /// (top, height) of each card from the last render
    card_spans: Vec<(u16, u16)>,
    viewport_height: u16,
    content_height: u16,
    /// Bring the selected card into view on the next render
    reveal_selected: bool,
}

impl Default for ResultsViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultsViewState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            selected: 0,
            card_count: 0,
            card_spans: Vec::new(),
            viewport_height: 0,
            content_height: 0,
            reveal_selected: false,
        }
    }

    fn clamp_scroll(&mut self) {
        let max_y = self.content_height.saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position { x: 0, y: max_y });
        }
    }

    /// Scroll so the selected card is fully visible (top edge if it's taller
    /// than the viewport).
    fn scroll_to_selected(&mut self) {
        let Some(&(top, height)) = self.card_spans.get(self.selected) else {
            return;
        };
        let offset_y = self.scroll_state.offset().y;
        if top < offset_y || height > self.viewport_height {
            self.scroll_state.set_offset(Position { x: 0, y: top });
        } else if top + height > offset_y.saturating_add(self.viewport_height) {
            self.scroll_state.set_offset(Position {
                x: 0,
                y: (top + height).saturating_sub(self.viewport_height),
            });
        }
    }
}

impl EventHandler for ResultsViewState {
    type Event = ResultsEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::CursorUp | TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                None
            }
            TuiEvent::CursorDown | TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.clamp_scroll();
                None
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                None
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.clamp_scroll();
                None
            }
            TuiEvent::CursorHome => {
                self.scroll_state.scroll_to_top();
                None
            }
            TuiEvent::CursorLeft | TuiEvent::FocusPrev => {
                self.selected = self.selected.saturating_sub(1);
                self.reveal_selected = true;
                None
            }
            TuiEvent::CursorRight | TuiEvent::FocusNext => {
                if self.selected + 1 < self.card_count {
                    self.selected += 1;
                }
                self.reveal_selected = true;
                None
            }
            TuiEvent::InputChar('i') if self.card_count > 0 => {
                Some(ResultsEvent::RequestInsight(self.selected))
            }
            TuiEvent::InputChar('r') => Some(ResultsEvent::Reset),
            TuiEvent::Escape => Some(ResultsEvent::Back),
            _ => None,
        }
    }
}

pub struct ResultsView<'a> {
    pub state: &'a mut ResultsViewState,
    pub shown: &'a ShownResults,
}

impl<'a> ResultsView<'a> {
    pub fn new(state: &'a mut ResultsViewState, shown: &'a ShownResults) -> Self {
        Self { state, shown }
    }

    fn card(&self, index: usize) -> Option<TraitCard<'a>> {
        let shown = self.shown;
        let (name, score) = shown.result.scores.get_index(index)?;
        Some(TraitCard {
            name,
            score,
            interpretation: shown.result.interpretation(name),
            insight: shown.insight(name),
            selected: index == self.state.selected,
            position: index,
        })
    }

    fn header(&self) -> Paragraph<'static> {
        Paragraph::new(vec![
            Line::from(Span::styled(
                "Your Personality Profile",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!(
                    "Big Five analysis of your comments · {}",
                    self.shown.received_at.format("%b %e, %H:%M")
                ),
                Style::default().fg(Color::Gray),
            )),
        ])
    }

    fn summary_heading() -> Paragraph<'static> {
        Paragraph::new(vec![
            Line::default(),
            Line::from(Span::styled(
                "AI-Powered Personality Summary",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )),
        ])
    }

    fn section(section: &SummarySection<'_>) -> Paragraph<'static> {
        let mut text = Text::from(Line::from(Span::styled(
            section.label,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        text.extend(markdown::render(section.text, Style::default().fg(Color::White)));
        text.push_line(Line::default());
        Paragraph::new(text).wrap(Wrap { trim: false })
    }

    fn footnote(provenance: &str) -> Paragraph<'static> {
        Paragraph::new(Line::from(Span::styled(
            format!("Summary: {provenance}"),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )))
    }

    fn actions() -> Paragraph<'static> {
        let key = Style::default().fg(Color::Cyan);
        let dim = Style::default().fg(Color::DarkGray);
        Paragraph::new(vec![
            Line::default(),
            Line::from(vec![
                Span::styled("r", key.add_modifier(Modifier::BOLD)),
                Span::styled(" Take Test Again  ", Style::default().fg(Color::White)),
                Span::styled("←/→", key),
                Span::styled(" select trait  ", dim),
                Span::styled("i", key),
                Span::styled(" insight  ", dim),
                Span::styled("↑/↓", key),
                Span::styled(" scroll  ", dim),
                Span::styled("Esc", key),
                Span::styled(" back", dim),
            ]),
        ])
    }
}

impl<'a> Component for ResultsView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = area.width.saturating_sub(1); // -1 for scrollbar
        let result = &self.shown.result;
        let blocks = build_blocks(result);
        let sections = result
            .summary
            .as_ref()
            .map(|s| s.sections())
            .unwrap_or_default();
        let provenance = result.summary.as_ref().and_then(|s| s.provenance());

        self.state.card_count = result.scores.len();
        self.state.selected = self.state.selected.min(self.state.card_count.saturating_sub(1));

        // 1. Measure
        let heights: Vec<u16> = blocks
            .iter()
            .map(|block| match *block {
                ResultBlock::Header => 3,
                ResultBlock::Chart => TraitChart::calculate_height(&result.scores),
                ResultBlock::Card(i) => self.card(i).map_or(0, |c| c.calculate_height(width)),
                ResultBlock::SummaryHeading => 3,
                ResultBlock::Section(i) => sections
                    .get(i)
                    .map_or(0, |s| clamp_rows(Self::section(s).line_count(width))),
                ResultBlock::Footnote => 1,
                ResultBlock::Actions => 2,
            })
            .collect();
        let spans = stack(&heights);
        let total = spans.last().map_or(0, |&(top, h)| top + h);

        self.state.card_spans = blocks
            .iter()
            .zip(&spans)
            .filter(|(block, _)| matches!(block, ResultBlock::Card(_)))
            .map(|(_, &span)| span)
            .collect();
        self.state.content_height = total;
        self.state.viewport_height = area.height;

        // 2. Scroll
        if self.state.reveal_selected {
            self.state.scroll_to_selected();
            self.state.reveal_selected = false;
        }
        self.state.clamp_scroll();

        // 3. Draw every block into the scroll canvas
        let mut scroll_view = ScrollView::new(Size::new(width, total))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        for (block, &(top, h)) in blocks.iter().zip(&spans) {
            if h == 0 {
                continue;
            }
            let rect = Rect::new(0, top, width, h);
            match *block {
                ResultBlock::Header => scroll_view.render_widget(self.header(), rect),
                ResultBlock::Chart => {
                    scroll_view.render_widget(TraitChart::new(&result.scores), rect)
                }
                ResultBlock::Card(i) => {
                    if let Some(card) = self.card(i) {
                        scroll_view.render_widget(card, rect);
                    }
                }
                ResultBlock::SummaryHeading => {
                    scroll_view.render_widget(Self::summary_heading(), rect)
                }
                ResultBlock::Section(i) => {
                    if let Some(section) = sections.get(i) {
                        scroll_view.render_widget(Self::section(section), rect);
                    }
                }
                ResultBlock::Footnote => {
                    if let Some(p) = provenance {
                        scroll_view.render_widget(Self::footnote(p), rect);
                    }
                }
                ResultBlock::Actions => scroll_view.render_widget(Self::actions(), rect),
            }
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}
