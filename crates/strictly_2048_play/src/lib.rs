//! Terminal host for the `strictly_2048` engine.
//!
//! The engine is pure; this crate supplies everything around it: a TOML
//! configuration, a single-writer session task that owns the game and
//! publishes views, win tracking against a configurable threshold, a JSON
//! save file and a ratatui front end.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;
mod config;
mod session;
mod simulate;
mod store;
mod terminal;
mod ui;
mod win;

pub use app::{resume_or_start, run_play, run_show, run_simulate};
pub use config::{ConfigError, ConfigOverrides, GameConfig};
pub use session::{GameSession, SessionError, SessionHandle, SessionView};
pub use simulate::{SimulationReport, simulate, simulate_game};
pub use store::{SaveStore, StoreError};
pub use terminal::{Action, action_for};
pub use win::{WinStatus, WinTracker};
