use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// What sort of monthly content a task represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// A shift at one of the player's jobs.
    Job,
    /// Something that happened to the player, usually while travelling.
    #[default]
    RandomEvent,
    /// A small chore or opportunity offered during the month.
    Errand,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Job => write!(f, "job"),
            Self::RandomEvent => write!(f, "random event"),
            Self::Errand => write!(f, "errand"),
        }
    }
}

/// Where a task came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskMetadata {
    /// District the task was raised in.
    pub origin_district: Option<String>,
    /// Job the shift belongs to.
    pub job_id: Option<String>,
    /// Month the task appeared.
    pub month_issued: Option<u32>,
}

/// A unit of monthly content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskState {
    /// Unique id, e.g. `task-m3-2`.
    pub id: String,
    /// Board category.
    pub kind: TaskKind,
    /// Event or job template this came from.
    pub template_id: String,
    /// Display title.
    pub title: String,
    /// Set once the task is done.
    #[serde(default)]
    pub resolved: bool,
    /// Narrative graph this task escalates into, if any.
    #[serde(default)]
    pub task_graph_id: Option<String>,
    /// Tags describing the situation.
    #[serde(default)]
    pub context_tags: BTreeSet<String>,
    /// Provenance.
    #[serde(default)]
    pub metadata: Option<TaskMetadata>,
}

impl TaskState {
    /// An open task with no graph, tags or metadata.
    pub fn new(
        id: impl Into<String>,
        kind: TaskKind,
        template_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            template_id: template_id.into(),
            title: title.into(),
            resolved: false,
            task_graph_id: None,
            context_tags: BTreeSet::new(),
            metadata: None,
        }
    }

    /// Attach a task graph.
    pub fn with_graph(mut self, graph_id: impl Into<String>) -> Self {
        self.task_graph_id = Some(graph_id.into());
        self
    }

    /// Replace the context tags.
    pub fn with_context_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.context_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Record where the task came from.
    pub fn with_metadata(mut self, metadata: TaskMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// The district the task was raised in, if recorded.
    pub fn origin_district(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.origin_district.as_deref())
    }
}

/// A narrative encounter waiting for the active slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRun {
    /// Task the run belongs to.
    pub task_id: String,
    /// Graph to play.
    pub task_graph_id: String,
}

/// The narrative encounter currently being played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveRun {
    /// Graph being played.
    pub task_graph_id: String,
    /// Task the run belongs to.
    pub origin_task_id: String,
    /// Node the player is standing on.
    pub current_node_id: String,
}
