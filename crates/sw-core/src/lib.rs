//! Core types for Streetwise: the game state, its entities, and the content
//! tables everything else looks up by id.
//!
//! Nothing in this crate rolls dice or mutates state on its own. The reducer
//! in `sw-game` is the only thing that transforms a [`GameState`].

/// The dispatch vocabulary accepted by the reducer.
pub mod action;
/// Player and NPC state.
pub mod character;
/// Read-only content tables.
pub mod content;
/// City districts.
pub mod district;
/// Error types used throughout the crate.
pub mod error;
/// Narrative task graphs.
pub mod graph;
/// Job assignments and postings.
pub mod job;
/// Log entries.
pub mod log;
/// Outcome tiers and effects.
pub mod outcome;
/// Relationships and memberships.
pub mod relationship;
/// The root game state.
pub mod state;
/// Vitals, skills and their deltas.
pub mod stats;
/// Tasks and narrative runs.
pub mod task;

/// Re-export the action vocabulary.
pub use action::Action;
/// Re-export character types.
pub use character::{NpcOrigin, NpcState, PLAYER_ID, PlayerState};
/// Re-export content tables.
pub use content::ContentTables;
/// Re-export district types.
pub use district::DistrictState;
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export graph types.
pub use graph::{ChoiceCheck, TaskChoice, TaskGraph, TaskNode};
/// Re-export job types.
pub use job::{JobAssignment, JobGeneration, JobInstance, assignment_id};
/// Re-export log types.
pub use log::LogEntry;
/// Re-export outcome types.
pub use outcome::{Effect, OutcomeDefinition, OutcomeTier};
/// Re-export relationship types.
pub use relationship::{Membership, NO_AFFILIATION, Relationship};
/// Re-export the game state.
pub use state::GameState;
/// Re-export stat types.
pub use stats::{MainStat, SkillDeltas, Skills, StatRef, StatsDelta, SubSkill, Vitals};
/// Re-export task types.
pub use task::{ActiveRun, PendingRun, TaskKind, TaskMetadata, TaskState};
