//! # TraitCard Component
//!
//! Detail card for one trait: score and percentage as sent by the backend,
//! a gauge, the fixed trait description, the backend's interpretation and,
//! once requested, the longer insight.
//!
//! Text is pre-wrapped with `textwrap` so `calculate_height` and `render`
//! agree on the line count exactly.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Widget};

use crate::api::{Trait, TraitScore};
use crate::core::state::InsightState;
use crate::tui::components::trait_chart::{format_number, trait_color};

/// Borders (2) + one column padding each side
const HORIZONTAL_OVERHEAD: u16 = 4;
const VERTICAL_OVERHEAD: u16 = 2;

pub struct TraitCard<'a> {
    pub name: &'a str,
    pub score: &'a TraitScore,
    pub interpretation: Option<&'a str>,
    pub insight: Option<&'a InsightState>,
    pub selected: bool,
    /// Position in the received order, for fallback colors
    pub position: usize,
}

impl<'a> TraitCard<'a> {
    pub fn calculate_height(&self, width: u16) -> u16 {
        let rows = self.lines(width.saturating_sub(HORIZONTAL_OVERHEAD)).len();
        u16::try_from(rows)
            .unwrap_or(u16::MAX)
            .saturating_add(VERTICAL_OVERHEAD)
    }

    fn color(&self) -> Color {
        trait_color(self.name, self.position)
    }

    fn lines(&self, width: u16) -> Vec<Line<'static>> {
        let width = (width as usize).max(1);
        let mut lines = vec![self.gauge(width)];

        let wrapped = |text: &str, style: Style, lines: &mut Vec<Line<'static>>| {
            for row in textwrap::wrap(text, width) {
                lines.push(Line::from(Span::styled(row.into_owned(), style)));
            }
        };

        if let Some(t) = Trait::from_name(self.name) {
            wrapped(
                t.description(),
                Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
                &mut lines,
            );
        }
        if let Some(text) = self.interpretation.filter(|t| !t.trim().is_empty()) {
            lines.push(Line::default());
            wrapped(text, Style::default().fg(Color::White), &mut lines);
        }
        match self.insight {
            Some(InsightState::Loading(_)) => {
                lines.push(Line::default());
                lines.push(Line::from(Span::styled(
                    "Loading insight...",
                    Style::default().fg(Color::Yellow),
                )));
            }
            Some(InsightState::Ready(text)) => {
                lines.push(Line::default());
                lines.push(Line::from(Span::styled(
                    "Insight",
                    Style::default().fg(self.color()).add_modifier(Modifier::BOLD),
                )));
                wrapped(text, Style::default().fg(Color::White), &mut lines);
            }
            None if self.selected => {
                lines.push(Line::from(Span::styled(
                    "Press i for a deeper insight",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            None => {}
        }
        lines
    }

    /// Filled portion tracks `percentage` (clamped to 0..=100).
    fn gauge(&self, width: usize) -> Line<'static> {
        let pct = if self.score.percentage.is_finite() {
            self.score.percentage.clamp(0.0, 100.0)
        } else {
            0.0
        };
        let filled = ((pct / 100.0) * width as f64).round() as usize;
        Line::from(vec![
            Span::styled("━".repeat(filled), Style::default().fg(self.color())),
            Span::styled(
                "━".repeat(width.saturating_sub(filled)),
                Style::default().fg(Color::DarkGray),
            ),
        ])
    }
}

impl Widget for TraitCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border = if self.selected {
            Style::default().fg(self.color()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let figures = format!(
            " {}/10 · {}% ",
            format_number(self.score.score),
            format_number(self.score.percentage)
        );
        let block = Block::bordered()
            .border_type(if self.selected {
                BorderType::Thick
            } else {
                BorderType::Rounded
            })
            .border_style(border)
            .title(Span::styled(
                format!(" {} ", self.name),
                Style::default().fg(self.color()).add_modifier(Modifier::BOLD),
            ))
            .title_top(Line::from(figures).right_aligned())
            .padding(ratatui::widgets::Padding::horizontal(1));
        let lines = self.lines(area.width.saturating_sub(HORIZONTAL_OVERHEAD));
        Paragraph::new(lines).block(block).render(area, buf);
    }
}
