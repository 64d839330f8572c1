//! # TitleBar Component
//!
//! Top status bar: app name, backend address with a reachability dot, and
//! the current notice (colored by level) on the right.
//!
//! ## Design Decisions
//!
//! ### Stateless Component
//!
//! TitleBar is purely presentational. It receives all data as props and has
//! no internal state:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(&app.api_url, app.backend_status, app.notice.as_ref());
//! title_bar.render(frame, area);
//! ```
//!
//! ### Notice Priority
//!
//! On narrow terminals the notice wins: the left side is truncated first so
//! errors such as "Failed to analyze personality..." stay readable.

use crate::core::state::{BackendStatus, Notice, NoticeLevel};
use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

pub struct TitleBar<'a> {
    /// Backend base URL
    pub api_url: &'a str,
    pub backend_status: BackendStatus,
    pub notice: Option<&'a Notice>,
}

impl<'a> TitleBar<'a> {
    pub fn new(api_url: &'a str, backend_status: BackendStatus, notice: Option<&'a Notice>) -> Self {
        Self {
            api_url,
            backend_status,
            notice,
        }
    }

    fn status_color(&self) -> Color {
        match self.backend_status {
            BackendStatus::Online => Color::Green,
            BackendStatus::Offline => Color::Red,
            BackendStatus::Checking => Color::Yellow,
            BackendStatus::Unknown => Color::DarkGray,
        }
    }

    fn left(&self) -> Line<'a> {
        Line::from(vec![
            Span::styled(
                "Persona",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled("● ", Style::default().fg(self.status_color())),
            Span::styled(self.api_url, Style::default().fg(Color::Gray)),
            Span::styled(
                format!(" ({})", self.backend_status.label()),
                Style::default().fg(Color::DarkGray),
            ),
        ])
    }

    fn right(&self) -> Option<Line<'a>> {
        let notice = self.notice?;
        let color = match notice.level {
            NoticeLevel::Info => Color::Cyan,
            NoticeLevel::Success => Color::Green,
            NoticeLevel::Error => Color::Red,
        };
        Some(
            Line::from(Span::styled(
                notice.text.as_str(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
            .right_aligned(),
        )
    }
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let Some(right) = self.right() else {
            frame.render_widget(Paragraph::new(self.left()), area);
            return;
        };

        let wanted = right.width() as u16;
        let [left_area, right_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(wanted.min(area.width))])
                .areas(area);
        frame.render_widget(Paragraph::new(self.left()), left_area);
        frame.render_widget(Paragraph::new(right), right_area);
    }
}
