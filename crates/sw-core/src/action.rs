//! The dispatch vocabulary: every state transition the reducer accepts.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::character::NpcState;
use crate::outcome::OutcomeTier;
use crate::stats::{MainStat, SkillDeltas, StatsDelta, SubSkill};
use crate::task::TaskState;

/// A request to change the game state.
///
/// Serialized with a `type` tag in SCREAMING_SNAKE_CASE (`"ADVANCE_MONTH"`,
/// `"RESOLVE_TASK"`, ...) so scripted runs and replays can be stored as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Move the calendar forward one month.
    AdvanceMonth,
    /// Append a free-form log line.
    AddLog {
        /// The line.
        text: String,
        /// Vitals change to show with it.
        #[serde(default)]
        deltas: Option<StatsDelta>,
    },
    /// Replace the task list wholesale.
    SetTasks {
        /// The new list.
        tasks: Vec<TaskState>,
    },
    /// Mark a task done.
    ResolveTask {
        /// Task to resolve.
        task_id: String,
    },
    /// Open (or queue) a narrative run for a task.
    StartTaskRun {
        /// Task the run belongs to.
        task_id: String,
        /// Graph to play.
        task_graph_id: String,
    },
    /// Pick a choice at the active run's current node.
    MakeTaskChoice {
        /// Choice id at the current node.
        choice_id: String,
    },
    /// Land an outcome tier, optionally using a graph's overrides.
    ApplyOutcome {
        /// Tier to land.
        outcome: OutcomeTier,
        /// Graph whose overrides win over the defaults.
        #[serde(default)]
        task_graph_id: Option<String>,
    },
    /// Add to the player's vitals.
    ApplyStatsDelta {
        /// Change to add.
        delta: StatsDelta,
    },
    /// Add to the player's stats and subskills.
    ApplySkillDeltas {
        /// Main stat changes.
        #[serde(default)]
        skill_deltas: BTreeMap<MainStat, i32>,
        /// Subskill changes.
        #[serde(default)]
        sub_skill_deltas: BTreeMap<SubSkill, i32>,
    },
    /// Give the player exactly this job, or none.
    SetPlayerJob {
        /// Job template id; `None` quits everything.
        job_id: Option<String>,
    },
    /// Travel to a district.
    SetPlayerDistrict {
        /// Destination.
        district_id: String,
    },
    /// Quit a job.
    RemoveJobAssignment {
        /// Job template id.
        job_id: String,
    },
    /// Take a specific posting.
    TakeJobInstance {
        /// Posting id.
        instance_id: String,
        /// Leave other jobs in the same career first.
        #[serde(default)]
        replace_career: bool,
    },
    /// Meet an NPC and register them in the world.
    ConnectNpc {
        /// The NPC, stored as given.
        npc: Box<NpcState>,
        /// Affiliations to enrol the NPC in.
        #[serde(default)]
        affiliations: Vec<String>,
        /// Starting tie strength; the default when absent.
        #[serde(default)]
        relationship_strength: Option<i32>,
    },
}

impl Action {
    /// The wire name of this action.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AdvanceMonth => "ADVANCE_MONTH",
            Self::AddLog { .. } => "ADD_LOG",
            Self::SetTasks { .. } => "SET_TASKS",
            Self::ResolveTask { .. } => "RESOLVE_TASK",
            Self::StartTaskRun { .. } => "START_TASK_RUN",
            Self::MakeTaskChoice { .. } => "MAKE_TASK_CHOICE",
            Self::ApplyOutcome { .. } => "APPLY_OUTCOME",
            Self::ApplyStatsDelta { .. } => "APPLY_STATS_DELTA",
            Self::ApplySkillDeltas { .. } => "APPLY_SKILL_DELTAS",
            Self::SetPlayerJob { .. } => "SET_PLAYER_JOB",
            Self::SetPlayerDistrict { .. } => "SET_PLAYER_DISTRICT",
            Self::RemoveJobAssignment { .. } => "REMOVE_JOB_ASSIGNMENT",
            Self::TakeJobInstance { .. } => "TAKE_JOB_INSTANCE",
            Self::ConnectNpc { .. } => "CONNECT_NPC",
        }
    }

    /// Convenience for `APPLY_SKILL_DELTAS` from a [`SkillDeltas`] bundle.
    pub fn skill_deltas(deltas: SkillDeltas) -> Self {
        Self::ApplySkillDeltas {
            skill_deltas: deltas.skills,
            sub_skill_deltas: deltas.sub_skills,
        }
    }

    /// Convenience for `CONNECT_NPC` with default strength.
    pub fn connect(npc: NpcState, affiliations: Vec<String>) -> Self {
        Self::ConnectNpc {
            npc: Box::new(npc),
            affiliations,
            relationship_strength: None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
