//! Procedural content for Streetwise.
//!
//! Generators for NPCs, job postings, monthly tasks and travel encounters,
//! plus district routing and the in-game calendar. Every generator takes
//! an explicit RNG and reads [`sw_core::ContentTables`]; none of them touch
//! the game state directly.

/// In-game calendar.
pub mod clock;
/// Generator configuration.
pub mod config;
/// Weighted event and encounter selection.
pub mod encounter;
/// Error types for the simulation crate.
pub mod error;
/// Job posting generator.
pub mod jobs;
/// NPC generator.
pub mod npc;
/// District routing.
pub mod spatial;
/// Monthly task generator.
pub mod tasks;

/// Re-exports of [`clock::Calendar`] and [`clock::GameDate`].
pub use clock::{Calendar, GameDate};
/// Re-export of [`config::GenConfig`].
pub use config::GenConfig;
/// Re-exports of the encounter helpers.
pub use encounter::{encounter_weight, event_task, select_encounter, select_event};
/// Re-exports of [`error::SimError`] and [`error::SimResult`].
pub use error::{SimError, SimResult};
/// Re-exports of the job posting generator.
pub use jobs::{JobGenOptions, generate_job_instances, posting_id};
/// Re-exports of the NPC generators.
pub use npc::{
    NpcGenOptions, apportion, generate_npc_batch, generate_npc_batch_seeded,
    generate_npc_from_template, generate_npc_from_template_seeded, generate_random_npc,
    generate_random_npc_seeded, npc_from_profile,
};
/// Re-exports of routing helpers.
pub use spatial::{DistrictGraph, build_travel_log_text, find_route, format_route};
/// Re-exports of the monthly task generator.
pub use tasks::{TaskGenContext, generate_monthly_tasks, next_task_id};
