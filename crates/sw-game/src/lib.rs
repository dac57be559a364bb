//! Game logic for Streetwise.
//!
//! Everything that changes a [`sw_core::GameState`] lives here: the reducer
//! that applies one [`sw_core::Action`] at a time, the task-run queue, outcome
//! and membership bookkeeping, journal export, and the [`GameSession`] that
//! ties state, content and RNG together.

/// Session configuration.
pub mod config;
/// Error types.
pub mod error;
/// Journal export.
pub mod journal;
/// Affiliation memberships derived from job assignments.
pub mod membership;
/// Outcome application.
pub mod outcome;
/// The action reducer.
pub mod reducer;
/// The task-run queue.
pub mod runs;
/// Game sessions and text commands.
pub mod session;

pub use config::GameConfig;
pub use error::{GameError, GameResult};
pub use journal::{export_log_markdown, export_log_text};
pub use reducer::{ReduceEnv, reduce};
pub use session::{GameSession, SessionMeta, create_initial_game_state};
