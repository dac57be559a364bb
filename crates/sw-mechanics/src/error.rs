//! Error types for the mechanics engine.

/// Errors that can occur while parsing mechanics settings.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// A bonus mapping name was not recognised.
    #[error("unknown bonus mapping: {0} (expected \"quintile\" or \"scaled\")")]
    UnknownMapping(String),
}

/// Convenience result type for mechanics operations.
pub type MechResult<T> = Result<T, MechError>;
