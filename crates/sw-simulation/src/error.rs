//! Error types for the generators.

/// Alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;

/// Errors a generator reports instead of rolling.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A requested NPC template does not exist.
    #[error("unknown template: {0}")]
    UnknownTemplate(String),

    /// There was nothing to roll an NPC from.
    #[error("no npc templates to choose from")]
    NoTemplates,
}
