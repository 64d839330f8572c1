use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};
use log::{debug, warn};
use std::time::Duration;

/// TUI-specific input events. Screens decide what each one means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    /// Ctrl+C, quits from anywhere
    ForceQuit,
    Escape,
    /// Enter
    Submit,
    /// Ctrl+S
    ForceSubmit,
    InputChar(char),
    Paste(String), // Bracketed paste - preserves newlines
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    CursorHome,
    CursorEnd,
    WordLeft,
    WordRight,
    /// Tab
    FocusNext,
    /// Shift+Tab
    FocusPrev,
    /// Ctrl+N
    AddEntry,
    /// Ctrl+D
    RemoveEntry,
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    Resize,
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(Duration::ZERO)
}

/// Wait up to `timeout` for the next event. Terminal read errors are logged
/// and treated as "no event".
pub fn poll_event_timeout(timeout: Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => {}
        Ok(false) => return None,
        Err(e) => {
            warn!("Event poll failed: {}", e);
            return None;
        }
    }
    match event::read() {
        Ok(event) => translate(event),
        Err(e) => {
            warn!("Event read failed: {}", e);
            None
        }
    }
}

fn translate(event: Event) -> Option<TuiEvent> {
    match event {
        Event::Key(key_event) => {
            // Keyboard enhancement reports releases too; only act on presses
            if key_event.kind == KeyEventKind::Release {
                return None;
            }
            debug!(
                "Key event: {:?} with modifiers {:?}",
                key_event.code, key_event.modifiers
            );
            let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
            match key_event.code {
                KeyCode::Char('c') if ctrl => Some(TuiEvent::ForceQuit),
                KeyCode::Char('s') if ctrl => Some(TuiEvent::ForceSubmit),
                KeyCode::Char('n') if ctrl => Some(TuiEvent::AddEntry),
                KeyCode::Char('d') if ctrl => Some(TuiEvent::RemoveEntry),
                // Ctrl+J inserts newline (ASCII LF; Ctrl+Enter sends this in most terminals)
                KeyCode::Char('j') if ctrl => Some(TuiEvent::InputChar('\n')),
                KeyCode::Enter if key_event.modifiers.contains(KeyModifiers::SHIFT) => {
                    Some(TuiEvent::InputChar('\n'))
                }
                KeyCode::Char(_) if ctrl => None,
                KeyCode::Char(c) => Some(TuiEvent::InputChar(c)),
                KeyCode::Backspace => Some(TuiEvent::Backspace),
                KeyCode::Delete => Some(TuiEvent::Delete),
                KeyCode::Enter => Some(TuiEvent::Submit),
                KeyCode::Esc => Some(TuiEvent::Escape),
                KeyCode::Tab => Some(TuiEvent::FocusNext),
                KeyCode::BackTab => Some(TuiEvent::FocusPrev),
                KeyCode::Left if ctrl => Some(TuiEvent::WordLeft),
                KeyCode::Right if ctrl => Some(TuiEvent::WordRight),
                KeyCode::Left => Some(TuiEvent::CursorLeft),
                KeyCode::Right => Some(TuiEvent::CursorRight),
                KeyCode::Up => Some(TuiEvent::CursorUp),
                KeyCode::Down => Some(TuiEvent::CursorDown),
                KeyCode::Home => Some(TuiEvent::CursorHome),
                KeyCode::End => Some(TuiEvent::CursorEnd),
                KeyCode::PageUp => Some(TuiEvent::ScrollPageUp),
                KeyCode::PageDown => Some(TuiEvent::ScrollPageDown),
                _ => None,
            }
        }
        Event::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
            _ => None,
        },
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}
