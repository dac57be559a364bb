//! Monthly task generation.

use std::collections::BTreeSet;

use rand::RngCore;
use sw_core::content::EventTemplate;
use sw_core::{ContentTables, GameState, TaskKind, TaskMetadata, TaskState};
use sw_mechanics::range_int;

use crate::config::GenConfig;
use crate::encounter::{encounter_weight, event_task};

/// What the monthly generator needs to know about the game.
#[derive(Debug, Clone, Default)]
pub struct TaskGenContext {
    /// Month being generated.
    pub month: u32,
    /// Jobs the player holds; each gets a shift.
    pub job_ids: Vec<String>,
    /// District the player stands in.
    pub district_id: Option<String>,
    /// Tags of that district.
    pub district_tags: BTreeSet<String>,
    /// Ids already in use.
    pub existing_ids: BTreeSet<String>,
}

impl TaskGenContext {
    /// Read the context off a state.
    pub fn from_state(state: &GameState) -> Self {
        let district = state.current_district();
        Self {
            month: state.month,
            job_ids: state.player_job_ids(),
            district_id: state.player.current_district.clone(),
            district_tags: district.map(|d| d.tags.clone()).unwrap_or_default(),
            existing_ids: state.tasks.iter().map(|t| t.id.clone()).collect(),
        }
    }
}

/// The first `{prefix}-m{month}-{n}` id (n from 1) not in `taken`.
pub fn next_task_id(prefix: &str, month: u32, taken: &BTreeSet<String>) -> String {
    (1..)
        .map(|n| format!("{prefix}-m{month}-{n}"))
        .find(|id| !taken.contains(id))
        .unwrap_or_else(|| format!("{prefix}-m{month}"))
}

/// One shift per held job plus a handful of errands and events that fit the
/// player's district.
pub fn generate_monthly_tasks<R: RngCore + ?Sized>(
    tables: &ContentTables,
    ctx: &TaskGenContext,
    config: &GenConfig,
    rng: &mut R,
) -> Vec<TaskState> {
    let mut taken = ctx.existing_ids.clone();
    let mut tasks = Vec::new();

    for job_id in &ctx.job_ids {
        let Some(job) = tables.job(job_id) else {
            tracing::warn!(job = %job_id, "player holds an unknown job, no shift");
            continue;
        };
        let id = next_task_id("task", ctx.month, &taken);
        taken.insert(id.clone());
        tasks.push(
            TaskState::new(id, TaskKind::Job, job_id.clone(), format!("Shift: {}", job.title))
                .with_context_tags(job.tags.iter().cloned())
                .with_metadata(TaskMetadata {
                    origin_district: ctx.district_id.clone(),
                    job_id: Some(job_id.clone()),
                    month_issued: Some(ctx.month),
                }),
        );
    }

    let (lo, hi) = config.monthly_events;
    let count = range_int(rng, i64::from(lo), i64::from(hi)).max(0) as usize;
    let mut pool: Vec<&EventTemplate> = tables.events.iter().collect();
    for _ in 0..count {
        let weights: Vec<f64> = pool
            .iter()
            .map(|e| encounter_weight(e, &ctx.district_tags))
            .collect();
        let Some(idx) = sw_mechanics::weighted_index(rng, &weights) else {
            break;
        };
        let event = pool.remove(idx);
        let id = next_task_id("task", ctx.month, &taken);
        taken.insert(id.clone());
        tasks.push(event_task(event, id, ctx.month, ctx.district_id.as_deref()));
    }

    tracing::debug!(month = ctx.month, count = tasks.len(), "generated monthly tasks");
    tasks
}
