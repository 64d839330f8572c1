//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as props:
//! - `TitleBar`: app name, backend status, current notice
//! - `LandingPage`: entry screen
//! - `TraitChart`: proportional "Trait Distribution" bar with legend
//! - `TraitCard`: one trait's score, description, interpretation and insight
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that keep local state and emit events for the controller:
//! - `InputBox`: multi-line text editor (one per comment)
//! - `CommentList`: the analyze screen, a column of `InputBox` editors
//! - `ResultsView`: scrollable results page with card selection
//!
//! Stateful components split persistent state (`CommentListState`,
//! `ResultsViewState`, owned by `TuiState`) from a transient wrapper built
//! each frame with borrowed props.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── landing.rs       (Landing route)
//! ├── comment_list.rs  (Analyze route)
//! ├── input_box/       (Multi-line editor)
//! ├── results_view.rs  (Results route)
//! ├── trait_chart.rs   (Distribution bar)
//! └── trait_card.rs    (Per-trait card)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod comment_list;
pub mod input_box;
pub mod landing;
pub mod results_view;
pub mod trait_card;
pub mod trait_chart;

pub use comment_list::{CollectorEvent, CommentList, CommentListState};
pub use landing::LandingPage;
pub use results_view::{ResultsEvent, ResultsView, ResultsViewState};
