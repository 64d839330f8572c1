use ratatui::Frame;
use ratatui::layout::Rect;

/// A piece of a screen that draws itself.
///
/// Props arrive as struct fields set by the parent; render takes `&mut self`
/// so components can refresh cached layout (heights, scroll clamps) while
/// they draw, the way ratatui's `StatefulWidget` does.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that reacts to terminal input.
pub trait EventHandler {
    /// What the component reports upward.
    type Event;

    /// Consumes a low-level `TuiEvent`, optionally producing a higher-level one
    /// for the parent to act on.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
