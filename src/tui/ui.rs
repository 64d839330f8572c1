//! Frame layout: title bar on top, the current route's screen below.

use crate::core::state::{App, Route};
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{CommentList, LandingPage, ResultsView, TitleBar};

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;

/// Side margin around the route screen
const MARGIN_X: u16 = 2;

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let [title_area, _gap, main_area] =
        Layout::vertical([Length(1), Length(1), Min(0)]).areas(frame.area());
    let main_area = inset(main_area);

    TitleBar::new(&app.api_url, app.backend_status, app.notice.as_ref()).render(frame, title_area);

    match &app.route {
        Route::Landing => LandingPage::new(spinner_frame).render(frame, main_area),
        Route::Analyze => {
            tui.comment_list.sync(app.collector.comments());
            CommentList::new(&mut tui.comment_list, app.is_submitting(), spinner_frame)
                .render(frame, main_area);
        }
        Route::Results(_) => match app.shown() {
            Some(shown) => ResultsView::new(&mut tui.results, shown).render(frame, main_area),
            None => frame.render_widget(
                Paragraph::new("No results to show.")
                    .style(Style::default().fg(Color::DarkGray))
                    .alignment(Alignment::Center),
                main_area,
            ),
        },
    }
}

fn inset(area: Rect) -> Rect {
    Rect {
        x: area.x + MARGIN_X.min(area.width / 2),
        width: area.width.saturating_sub(MARGIN_X * 2),
        ..area
    }
}
