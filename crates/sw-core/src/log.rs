use serde::{Deserialize, Serialize};

use crate::stats::StatsDelta;

/// One line of the append-only game log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Sequential, starting at 1.
    pub id: u64,
    /// Month the entry was written in.
    pub month: u32,
    /// The line itself.
    pub text: String,
    /// Vitals change shown next to the text, if any.
    #[serde(default)]
    pub deltas: Option<StatsDelta>,
}
