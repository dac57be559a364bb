//! Error types for game sessions.

use thiserror::Error;

/// Result type for session operations.
pub type GameResult<T> = Result<T, GameError>;

/// Errors that can occur while setting up or driving a session.
///
/// The reducer itself never fails; these come from session setup, snapshots
/// and the text command interface.
#[derive(Debug, Error)]
pub enum GameError {
    /// The configured or requested district does not exist.
    #[error("unknown district: {0}")]
    UnknownDistrict(String),

    /// A command named a task that is not on the board.
    #[error("unknown task: {0}")]
    UnknownTask(String),

    /// A command needs a narrative run and none is active.
    #[error("no task run is active")]
    NoActiveRun,

    /// A story command was given but no scripts are attached.
    #[error("no stories are loaded")]
    NoStories,

    /// The story engine refused a step.
    #[error("{0}")]
    Narrative(#[from] sw_narrative::NarrativeError),

    /// Invalid command or arguments.
    #[error("{0}")]
    InvalidCommand(String),

    /// Content error.
    #[error("{0}")]
    Core(#[from] sw_core::CoreError),

    /// Generator error.
    #[error("{0}")]
    Sim(#[from] sw_simulation::SimError),

    /// Snapshot (de)serialization failed.
    #[error("snapshot error: {0}")]
    Json(#[from] serde_json::Error),
}
