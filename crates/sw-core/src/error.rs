/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when loading or validating game content.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Content JSON could not be parsed.
    #[error("failed to parse content: {0}")]
    Parse(#[from] serde_json::Error),

    /// A content table references something that does not exist.
    #[error("invalid content: {0}")]
    InvalidContent(String),

    /// A stat or subskill name could not be resolved.
    #[error("unknown stat: \"{0}\"")]
    UnknownStat(String),

    /// An outcome tier name could not be resolved.
    #[error("unknown outcome tier: \"{0}\"")]
    UnknownOutcome(String),
}
