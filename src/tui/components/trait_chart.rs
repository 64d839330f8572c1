//! # TraitChart Component
//!
//! "Trait Distribution": one horizontal bar split into a segment per trait,
//! each as wide as its `percentage` share, followed by a color legend.
//!
//! Stateless widget; rendered into the results scroll view.

use indexmap::IndexMap;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Widget};

use crate::api::{Trait, TraitScore};

/// Rows used by the bar itself
const BAR_ROWS: u16 = 2;
/// Borders (2) + bar + blank line before the legend
const FIXED_ROWS: u16 = 2 + BAR_ROWS + 1;
/// Colors for keys that aren't one of the Big Five
const FALLBACK_COLORS: [Color; 3] = [Color::Cyan, Color::LightBlue, Color::Gray];

pub fn trait_color(name: &str, position: usize) -> Color {
    match Trait::from_name(name) {
        Some(Trait::Openness) => Color::Magenta,
        Some(Trait::Conscientiousness) => Color::Blue,
        Some(Trait::Extraversion) => Color::Yellow,
        Some(Trait::Agreeableness) => Color::Green,
        Some(Trait::Neuroticism) => Color::Red,
        None => FALLBACK_COLORS[position % FALLBACK_COLORS.len()],
    }
}

/// Shows a backend number as sent: `7` for 7.0, `7.5` for 7.5.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Splits `total` columns proportionally to `shares`.
///
/// Uses largest-remainder rounding so the widths always add up to `total`
/// (unless every share is zero, in which case all widths are zero).
/// Negative and non-finite shares count as zero.
pub fn segment_widths(shares: &[f64], total: u16) -> Vec<u16> {
    let clean: Vec<f64> = shares
        .iter()
        .map(|&s| if s.is_finite() && s > 0.0 { s } else { 0.0 })
        .collect();
    let sum: f64 = clean.iter().sum();
    if sum <= 0.0 || total == 0 {
        return vec![0; shares.len()];
    }

    let exact: Vec<f64> = clean.iter().map(|s| s / sum * total as f64).collect();
    let mut widths: Vec<u16> = exact.iter().map(|e| e.floor() as u16).collect();
    let assigned: u16 = widths.iter().sum();

    let mut by_remainder: Vec<usize> = (0..exact.len()).filter(|&i| clean[i] > 0.0).collect();
    by_remainder.sort_by(|&a, &b| {
        let ra = exact[a] - exact[a].floor();
        let rb = exact[b] - exact[b].floor();
        rb.total_cmp(&ra).then(a.cmp(&b))
    });
    for &i in by_remainder.iter().take(total.saturating_sub(assigned) as usize) {
        widths[i] += 1;
    }
    widths
}

pub struct TraitChart<'a> {
    pub scores: &'a IndexMap<String, TraitScore>,
}

impl<'a> TraitChart<'a> {
    pub fn new(scores: &'a IndexMap<String, TraitScore>) -> Self {
        Self { scores }
    }

    pub fn calculate_height(scores: &IndexMap<String, TraitScore>) -> u16 {
        FIXED_ROWS + scores.len() as u16
    }

    fn bar_line(&self, width: u16) -> Line<'static> {
        let shares: Vec<f64> = self.scores.values().map(|s| s.percentage).collect();
        let widths = segment_widths(&shares, width);
        Line::from(
            self.scores
                .keys()
                .zip(widths)
                .enumerate()
                .filter(|(_, (_, w))| *w > 0)
                .map(|(i, (name, w))| {
                    Span::styled(
                        "█".repeat(w as usize),
                        Style::default().fg(trait_color(name, i)),
                    )
                })
                .collect::<Vec<_>>(),
        )
    }

    fn legend(&self) -> Vec<Line<'static>> {
        let name_width = self.scores.keys().map(|k| k.chars().count()).max().unwrap_or(0);
        self.scores
            .iter()
            .enumerate()
            .map(|(i, (name, score))| {
                Line::from(vec![
                    Span::styled("■ ", Style::default().fg(trait_color(name, i))),
                    Span::raw(format!("{name:<name_width$}  ")),
                    Span::styled(
                        format!("{}%", format_number(score.percentage)),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ])
            })
            .collect()
    }
}

impl Widget for TraitChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                " Trait Distribution ",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ));
        let inner = block.inner(area);
        block.render(area, buf);

        let bar = self.bar_line(inner.width);
        let mut lines = vec![bar; BAR_ROWS as usize];
        lines.push(Line::default());
        lines.extend(self.legend());
        Paragraph::new(lines).render(inner, buf);
    }
}
