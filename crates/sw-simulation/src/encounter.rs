//! Weighted selection of events against a district's tags.

use std::collections::BTreeSet;

use rand::RngCore;
use sw_core::content::EventTemplate;
use sw_core::{ContentTables, DistrictState, TaskKind, TaskMetadata, TaskState};
use sw_mechanics::weighted_index;

/// Selection weight of `event` in a district tagged `district_tags`.
///
/// Events with no district tags fit anywhere; otherwise they need at least
/// one shared tag. Weight is `event.weight * (1 + shared tags)`, or zero when
/// the event does not fit.
pub fn encounter_weight(event: &EventTemplate, district_tags: &BTreeSet<String>) -> f64 {
    let shared = event.district_tags.intersection(district_tags).count();
    if !event.district_tags.is_empty() && shared == 0 {
        return 0.0;
    }
    event.weight.max(0.0) * (1.0 + shared as f64)
}

/// Pick one of `candidates` by [`encounter_weight`].
pub fn select_event<'a, R: RngCore + ?Sized>(
    candidates: &[&'a EventTemplate],
    district_tags: &BTreeSet<String>,
    rng: &mut R,
) -> Option<&'a EventTemplate> {
    let weights: Vec<f64> = candidates
        .iter()
        .map(|e| encounter_weight(e, district_tags))
        .collect();
    weighted_index(rng, &weights).map(|i| candidates[i])
}

/// Pick a random encounter for a stop in `district`.
pub fn select_encounter<'a, R: RngCore + ?Sized>(
    tables: &'a ContentTables,
    district: &DistrictState,
    rng: &mut R,
) -> Option<&'a EventTemplate> {
    let candidates: Vec<&EventTemplate> = tables.events_of_kind(TaskKind::RandomEvent).collect();
    select_event(&candidates, &district.tags, rng)
}

/// The task an event turns into.
pub fn event_task(
    event: &EventTemplate,
    id: impl Into<String>,
    month: u32,
    district_id: Option<&str>,
) -> TaskState {
    let mut task = TaskState::new(id, event.kind, event.id.clone(), event.title.clone())
        .with_context_tags(event.context_tags.iter().cloned())
        .with_metadata(TaskMetadata {
            origin_district: district_id.map(str::to_string),
            job_id: None,
            month_issued: Some(month),
        });
    task.task_graph_id = event.task_graph_id.clone();
    task
}
