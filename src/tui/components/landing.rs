//! # Landing Page Component
//!
//! Entry screen: headline, Big Five tagline, three feature blurbs and the
//! call to action. Centered vertically; the blurbs sit side by side when the
//! terminal is wide enough and stack otherwise.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};

/// Side-by-side blurbs need at least this many columns
const WIDE_LAYOUT_MIN: u16 = 90;
const BLURB_HEIGHT: u16 = 6;

pub const FEATURES: [(&str, &str); 3] = [
    (
        "Scientific Accuracy",
        "Built on the Big Five model, the most widely validated framework in personality psychology.",
    ),
    (
        "AI-Powered Insights",
        "A trained model reads your own words and turns them into trait scores and a written profile.",
    ),
    (
        "Growth Opportunities",
        "See your strengths, the areas worth working on and the careers that suit you.",
    ),
];

pub struct LandingPage {
    /// Drives the call-to-action pulse
    pub frame_index: usize,
}

impl LandingPage {
    pub fn new(frame_index: usize) -> Self {
        Self { frame_index }
    }

    fn heading() -> Paragraph<'static> {
        Paragraph::new(vec![
            Line::from(Span::styled(
                "Discover Your True Self",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(Span::styled(
                "Uncover your personality across the Big Five traits: Openness, Conscientiousness,",
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                "Extraversion, Agreeableness and Neuroticism, from nothing more than a few comments.",
                Style::default().fg(Color::Gray),
            )),
        ])
        .alignment(Alignment::Center)
    }

    fn blurb(title: &'static str, body: &'static str) -> Paragraph<'static> {
        Paragraph::new(body)
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: true })
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(Span::styled(
                        format!(" {title} "),
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                    )),
            )
    }

    fn call_to_action(&self) -> Paragraph<'static> {
        // Bold on alternate half-seconds at ~12fps
        let style = if (self.frame_index / 6) % 2 == 0 {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Yellow)
        };
        Paragraph::new(vec![
            Line::from(vec![
                Span::raw("Press "),
                Span::styled("Enter", style),
                Span::raw(" to get started"),
            ]),
            Line::from(Span::styled(
                format!("q to quit · v{}", env!("CARGO_PKG_VERSION")),
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center)
    }
}

impl Component for LandingPage {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let wide = area.width >= WIDE_LAYOUT_MIN;
        let blurbs_height = if wide {
            BLURB_HEIGHT
        } else {
            BLURB_HEIGHT * FEATURES.len() as u16
        };

        let [heading_area, blurbs_area, cta_area] = Layout::vertical([
            Constraint::Length(5),
            Constraint::Length(blurbs_height),
            Constraint::Length(3),
        ])
        .spacing(1)
        .flex(Flex::Center)
        .areas(area);

        frame.render_widget(Self::heading(), heading_area);

        let blurbs_area = Layout::horizontal([Constraint::Max(120)])
            .flex(Flex::Center)
            .split(blurbs_area)[0];
        let slots = if wide {
            Layout::horizontal([Constraint::Fill(1); 3])
                .spacing(1)
                .split(blurbs_area)
        } else {
            Layout::vertical([Constraint::Length(BLURB_HEIGHT); 3]).split(blurbs_area)
        };
        for (slot, (title, body)) in slots.iter().zip(FEATURES) {
            frame.render_widget(Self::blurb(title, body), *slot);
        }

        frame.render_widget(self.call_to_action(), cta_area);
    }
}
