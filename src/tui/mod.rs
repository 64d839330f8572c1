//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (landing page, "Analyzing..." spinner, insight loading):
//!   draws every ~80ms.
//! - **Idle**: sleeps up to 500ms, only redraws on events, background
//!   completions, or when a notice expires.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use log::{debug, error, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::api::{HttpPredictionClient, PredictionService};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::{App, InsightState, Route};
use crate::tui::component::EventHandler;
use crate::tui::components::{CollectorEvent, CommentListState, ResultsEvent, ResultsViewState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    // Persistent component states
    pub comment_list: CommentListState,
    pub results: ResultsViewState,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            comment_list: CommentListState::new(),
            results: ResultsViewState::new(),
        }
    }

    /// Fresh component state for the screen that was just entered.
    fn route_changed(&mut self, from: &Route, to: &Route) {
        match (from, to) {
            (_, Route::Results(_)) => self.results = ResultsViewState::new(),
            (Route::Results(_), _) => self.comment_list.reset(),
            _ => {}
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets Shift+Enter through; terminals without it
        // ignore the request
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!(
            "Terminal modes enabled (mouse, bracketed paste, steady block cursor, keyboard enhancement)"
        );
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let client = HttpPredictionClient::new(config.api_url.clone(), config.timeout).map_err(|e| {
        error!("Could not build HTTP client for {}: {}", config.api_url, e);
        std::io::Error::other(e)
    })?;
    info!(
        "Using backend {} (timeout: {:?})",
        config.api_url, config.timeout
    );

    let mut app = App::new(Arc::new(client));
    let mut tui = TuiState::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    if config.health_check {
        let effect = update(&mut app, Action::CheckHealth);
        apply_effect(effect, &app, &tx);
    } else {
        info!("Startup health check skipped");
    }

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    'main: loop {
        let animating = is_animating(&app);
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let effect = handle_event(&mut app, &mut tui, event);
            if apply_effect(effect, &app, &tx) {
                break 'main;
            }
        }

        // Completions from background tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = dispatch(&mut app, &mut tui, action);
            if apply_effect(effect, &app, &tx) {
                break 'main;
            }
        }

        let had_notice = app.notice.is_some();
        update(&mut app, Action::Tick);
        if had_notice && app.notice.is_none() {
            needs_redraw = true;
        }
    }

    ratatui::restore();
    info!("Persona shutting down");
    Ok(())
}

fn is_animating(app: &App) -> bool {
    app.route == Route::Landing
        || app.is_submitting()
        || app.shown().is_some_and(|s| {
            s.insights
                .values()
                .any(|i| matches!(i, InsightState::Loading(_)))
        })
}

/// Runs `action` through the core and keeps component state in step with
/// the route.
fn dispatch(app: &mut App, tui: &mut TuiState, action: Action) -> Effect {
    let before = app.route.clone();
    let effect = update(app, action);
    if app.route != before {
        tui.route_changed(&before, &app.route);
    }
    effect
}

/// Translates one terminal event for the current route.
fn handle_event(app: &mut App, tui: &mut TuiState, event: TuiEvent) -> Effect {
    match event {
        // Redraw already flagged by the caller
        TuiEvent::Resize => return Effect::None,
        // Ctrl+C always quits
        TuiEvent::ForceQuit => return dispatch(app, tui, Action::Quit),
        _ => {}
    }

    match app.route {
        Route::Landing => match event {
            TuiEvent::Submit => dispatch(app, tui, Action::Start),
            TuiEvent::Escape | TuiEvent::InputChar('q') => dispatch(app, tui, Action::Quit),
            _ => Effect::None,
        },
        Route::Analyze => {
            let Some(collector_event) = tui.comment_list.handle_event(&event) else {
                return Effect::None;
            };
            match collector_event {
                CollectorEvent::Edited { index, text } => {
                    dispatch(app, tui, Action::UpdateComment { index, text })
                }
                CollectorEvent::Add => {
                    let before = app.collector.len();
                    let effect = dispatch(app, tui, Action::AddComment);
                    if app.collector.len() > before {
                        tui.comment_list.after_add(app.collector.comments());
                    }
                    effect
                }
                CollectorEvent::Remove(index) => {
                    let before = app.collector.len();
                    let effect = dispatch(app, tui, Action::RemoveComment(index));
                    if app.collector.len() < before {
                        tui.comment_list
                            .after_remove(index, app.collector.comments());
                    }
                    effect
                }
                CollectorEvent::Submit => dispatch(app, tui, Action::Submit),
                CollectorEvent::Back => dispatch(app, tui, Action::Back),
            }
        }
        Route::Results(_) => {
            let Some(results_event) = tui.results.handle_event(&event) else {
                return Effect::None;
            };
            match results_event {
                ResultsEvent::Reset => dispatch(app, tui, Action::Reset),
                ResultsEvent::Back => dispatch(app, tui, Action::Back),
                ResultsEvent::RequestInsight(index) => {
                    let Some(name) = app
                        .shown()
                        .and_then(|s| s.result.scores.get_index(index))
                        .map(|(name, _)| name.clone())
                    else {
                        return Effect::None;
                    };
                    dispatch(app, tui, Action::RequestInsight(name))
                }
            }
        }
    }
}

/// Carries out an effect. Returns true when the app should exit.
fn apply_effect(effect: Effect, app: &App, tx: &mpsc::Sender<Action>) -> bool {
    match effect {
        Effect::None => false,
        Effect::Quit => true,
        Effect::SpawnPrediction {
            request_id,
            comments,
        } => {
            spawn_prediction(app.service.clone(), request_id, comments, tx.clone());
            false
        }
        Effect::SpawnInsight {
            request_id,
            trait_name,
            score,
        } => {
            spawn_insight(
                app.service.clone(),
                request_id,
                trait_name,
                score,
                tx.clone(),
            );
            false
        }
        Effect::SpawnHealthCheck => {
            spawn_health_check(app.service.clone(), tx.clone());
            false
        }
    }
}

fn spawn_prediction(
    service: Arc<dyn PredictionService>,
    request_id: u64,
    comments: Vec<String>,
    tx: mpsc::Sender<Action>,
) {
    info!(
        "Spawning prediction request {} ({} comments)",
        request_id,
        comments.len()
    );
    tokio::spawn(async move {
        let started = Instant::now();
        let action = match service.predict(&comments).await {
            Ok(result) => {
                info!(
                    "Prediction {} succeeded in {}ms ({} traits)",
                    request_id,
                    started.elapsed().as_millis(),
                    result.scores.len()
                );
                Action::PredictionSucceeded { request_id, result }
            }
            Err(error) => Action::PredictionFailed { request_id, error },
        };
        if tx.send(action).is_err() {
            warn!(
                "Failed to deliver prediction {}: receiver dropped",
                request_id
            );
        }
    });
}

fn spawn_insight(
    service: Arc<dyn PredictionService>,
    request_id: u64,
    trait_name: String,
    score: f64,
    tx: mpsc::Sender<Action>,
) {
    info!(
        "Spawning insight request {} for {} (score {})",
        request_id, trait_name, score
    );
    tokio::spawn(async move {
        let action = match service.trait_insight(&trait_name, score).await {
            Ok(insight) => Action::InsightReady {
                request_id,
                trait_name,
                insight: insight.insight,
            },
            Err(error) => Action::InsightFailed {
                request_id,
                trait_name,
                error,
            },
        };
        if tx.send(action).is_err() {
            warn!("Failed to deliver insight {}: receiver dropped", request_id);
        }
    });
}

fn spawn_health_check(service: Arc<dyn PredictionService>, tx: mpsc::Sender<Action>) {
    debug!("Probing backend at {}", service.base_url());
    tokio::spawn(async move {
        let outcome = service.health().await;
        if tx.send(Action::HealthChecked(outcome)).is_err() {
            warn!("Failed to deliver health check: receiver dropped");
        }
    });
}
