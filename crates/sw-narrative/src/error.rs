//! Error types for the narrative bridge.

use thiserror::Error;

/// Result type for narrative operations.
pub type NarrativeResult<T> = Result<T, NarrativeError>;

/// Errors that can occur while loading or stepping a story.
#[derive(Debug, Error)]
pub enum NarrativeError {
    /// No story is registered under this id.
    #[error("story not found: {0}")]
    UnknownStory(String),

    /// A knot named by a jump or entry point does not exist.
    #[error("knot not found: {0}")]
    UnknownKnot(String),

    /// A choice index outside the current choice list.
    #[error("invalid choice: {0}")]
    InvalidChoice(usize),

    /// The bridge was asked to step with nothing loaded.
    #[error("no story is running")]
    NoActiveStory,

    /// A story kept jumping without producing text or choices.
    #[error("story ran away in knot \"{knot}\"")]
    Runaway {
        /// Knot the story was in when it was stopped.
        knot: String,
    },

    /// A compiled script could not be parsed.
    #[error("failed to parse story: {0}")]
    Parse(#[from] serde_json::Error),

    /// A story file could not be read.
    #[error("failed to read story: {0}")]
    Io(#[from] std::io::Error),
}
