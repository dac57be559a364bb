//! The narrative side of Streetwise.
//!
//! Stories are opaque to the game: anything that implements the five-call
//! [`StoryEngine`] surface can be played. [`ScriptStory`] is the built-in
//! JSON binding. [`NarrativeBridge`] runs a story for a task, answers its
//! `stat_check`/`has_money` calls from the player's sheet, and turns what the
//! story leaves behind into reducer actions.
//!
//! In-reducer task graphs live in `sw-core` and are re-exported here.

/// Runs stories for tasks and collects their results.
pub mod bridge;
/// The story-engine surface.
pub mod engine;
/// Error types.
pub mod error;
/// Stat-check subscriptions.
pub mod observers;
/// Fuzzy name hints.
pub mod resolve;
/// The JSON script binding.
pub mod script;

pub use bridge::{NarrativeBridge, NarrativeFrame};
pub use engine::{NoHost, StoryChoice, StoryEngine, StoryHost, StoryLoader, StoryValue};
pub use error::{NarrativeError, NarrativeResult};
pub use observers::{CheckEvent, CheckObservers, Subscription};
pub use resolve::closest_match;
pub use script::{CompiledScript, ScriptLibrary, ScriptStory, Step};
pub use sw_core::graph::{ChoiceCheck, TaskChoice, TaskGraph, TaskNode};
