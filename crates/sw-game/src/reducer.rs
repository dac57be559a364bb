//! The single state transition: `reduce(state, action) -> state`.
//!
//! The reducer is total. Unknown ids, missing graphs and impossible moves
//! are logged at `debug`/`warn` and leave the state as it was. Randomness
//! only comes from the RNG passed in, so a seeded run replays exactly.

use std::collections::{BTreeMap, BTreeSet};

use rand::RngCore;
use sw_core::relationship::DEFAULT_RELATIONSHIP_STRENGTH;
use sw_core::{
    Action, ActiveRun, ChoiceCheck, ContentTables, GameState, JobAssignment, NpcState,
    OutcomeTier, Relationship, SkillDeltas, StatRef, TaskKind, TaskState, assignment_id,
};
use sw_mechanics::{Critical, StatCheckRequest, chance, perform_stat_check, pick};
use sw_simulation::{
    GenConfig, JobGenOptions, TaskGenContext, build_travel_log_text, event_task, find_route,
    generate_job_instances, generate_monthly_tasks, next_task_id, select_encounter,
};

use crate::membership::{memberships_for, rebuild_memberships, replace_memberships};
use crate::outcome::apply_outcome;
use crate::runs::{drop_queued, ensure_active_run, queue_run};

/// Read-only collaborators the reducer consults.
#[derive(Debug, Clone, Copy)]
pub struct ReduceEnv<'a> {
    /// Content tables to look ids up in.
    pub content: &'a ContentTables,
    /// Generator knobs.
    pub config: &'a GenConfig,
}

impl<'a> ReduceEnv<'a> {
    /// Bundle the collaborators.
    pub fn new(content: &'a ContentTables, config: &'a GenConfig) -> Self {
        Self { content, config }
    }
}

/// Apply one action and return the next state.
pub fn reduce<R: RngCore + ?Sized>(
    mut state: GameState,
    action: &Action,
    env: &ReduceEnv<'_>,
    rng: &mut R,
) -> GameState {
    tracing::debug!(action = action.name(), month = state.month, "reduce");
    let content = env.content;
    match action {
        Action::AdvanceMonth => advance_month(&mut state, env, rng),
        Action::AddLog { text, deltas } => state.push_log(text.clone(), deltas.clone()),
        Action::SetTasks { tasks } => state.tasks = tasks.clone(),
        Action::ResolveTask { task_id } => resolve_task(&mut state, content, task_id),
        Action::StartTaskRun {
            task_id,
            task_graph_id,
        } => start_task_run(&mut state, content, task_id, task_graph_id),
        Action::MakeTaskChoice { choice_id } => make_task_choice(&mut state, content, choice_id, rng),
        Action::ApplyOutcome {
            outcome,
            task_graph_id,
        } => apply_outcome(&mut state, content, *outcome, task_graph_id.as_deref(), rng),
        Action::ApplyStatsDelta { delta } => state.player.vitals.apply(delta),
        Action::ApplySkillDeltas {
            skill_deltas,
            sub_skill_deltas,
        } => state.player.skills.apply(&SkillDeltas {
            skills: skill_deltas.clone(),
            sub_skills: sub_skill_deltas.clone(),
        }),
        Action::SetPlayerJob { job_id } => set_player_job(&mut state, content, job_id.as_deref()),
        Action::SetPlayerDistrict { district_id } => {
            set_player_district(&mut state, env, district_id, rng)
        }
        Action::RemoveJobAssignment { job_id } => remove_job_assignment(&mut state, content, job_id),
        Action::TakeJobInstance {
            instance_id,
            replace_career,
        } => take_job_instance(&mut state, content, instance_id, *replace_career),
        Action::ConnectNpc {
            npc,
            affiliations,
            relationship_strength,
        } => connect_npc(&mut state, npc, affiliations, *relationship_strength),
    }
    state
}

/// "a" or "an" for the word that follows.
pub fn indefinite_article(word: &str) -> &'static str {
    match word.trim_start().chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

fn advance_month<R: RngCore + ?Sized>(state: &mut GameState, env: &ReduceEnv<'_>, rng: &mut R) {
    state.month += 1;
    state.player.age_months += 1;

    // Last month's shifts expire; everything else unresolved carries over.
    state.tasks.retain(|t| !t.resolved && t.kind != TaskKind::Job);
    let live: BTreeSet<String> = state.tasks.iter().map(|t| t.id.clone()).collect();
    state.pending_task_runs.retain(|r| live.contains(&r.task_id));
    let orphaned = state
        .active_task_run
        .as_ref()
        .is_some_and(|run| !live.contains(&run.origin_task_id));
    if orphaned {
        state.active_task_run = None;
    }

    let ctx = TaskGenContext::from_state(state);
    let fresh = generate_monthly_tasks(env.content, &ctx, env.config, rng);
    state.tasks.extend(fresh);

    refresh_postings(state, env, rng);

    if let Some(headline) = pick(rng, &env.content.headlines) {
        state.push_log(headline.clone(), None);
    }
    ensure_active_run(state, env.content);
}

/// Replace every unfilled posting with a fresh board for this month.
pub fn refresh_postings<R: RngCore + ?Sized>(state: &mut GameState, env: &ReduceEnv<'_>, rng: &mut R) {
    state.job_postings.retain(|_, p| p.filled_by.is_some());

    let mut opts = JobGenOptions::default()
        .with_max_listings(env.config.max_listings)
        .with_salary_jitter(env.config.salary_jitter)
        .for_month(state.month);
    let player_id = state.player.id.clone();
    if let Some(job_id) = state.player_job_ids().first() {
        let affiliation = state
            .posting_held_by(job_id, &player_id)
            .and_then(|p| p.affiliation_id.clone())
            .or_else(|| {
                state
                    .memberships_of(&player_id)
                    .find(|m| !m.is_sentinel())
                    .map(|m| m.affiliation_id.clone())
            });
        opts = opts.excluding(job_id, affiliation.as_deref()).excluding_career();
    }

    for posting in generate_job_instances(env.content, &env.content.job_ids(), &opts, rng) {
        state.job_postings.entry(posting.id.clone()).or_insert(posting);
    }
}

// ---------------------------------------------------------------------------
// Tasks and runs
// ---------------------------------------------------------------------------

fn resolve_task(state: &mut GameState, content: &ContentTables, task_id: &str) {
    match state.task_mut(task_id) {
        Some(task) => task.resolved = true,
        None => tracing::debug!(task = task_id, "resolving unknown task"),
    }
    // The active run is left alone; it concludes through its own graph.
    drop_queued(state, task_id);
    ensure_active_run(state, content);
}

fn start_task_run(state: &mut GameState, content: &ContentTables, task_id: &str, graph_id: &str) {
    let Some(graph) = content.graph(graph_id) else {
        tracing::warn!(graph = graph_id, "cannot start run, unknown graph");
        return;
    };
    if state.task(task_id).is_some_and(|t| t.resolved) {
        tracing::debug!(task = task_id, "task already resolved");
        return;
    }
    let active_origin = state
        .active_task_run
        .as_ref()
        .map(|run| run.origin_task_id.clone());
    match active_origin.as_deref() {
        None => {
            drop_queued(state, task_id);
            state.active_task_run = Some(ActiveRun {
                task_graph_id: graph.id.clone(),
                origin_task_id: task_id.to_string(),
                current_node_id: graph.entry_node_id.clone(),
            });
        }
        Some(origin) if origin == task_id => {
            tracing::debug!(task = task_id, "run already active");
        }
        Some(_) => queue_run(state, task_id, graph_id),
    }
}

fn make_task_choice<R: RngCore + ?Sized>(
    state: &mut GameState,
    content: &ContentTables,
    choice_id: &str,
    rng: &mut R,
) {
    let Some(run) = state.active_task_run.clone() else {
        tracing::debug!(choice = choice_id, "no active run");
        return;
    };
    let Some(node) = content
        .graph(&run.task_graph_id)
        .and_then(|g| g.node(&run.current_node_id))
    else {
        tracing::warn!(graph = %run.task_graph_id, node = %run.current_node_id, "run points nowhere, ending it");
        state.active_task_run = None;
        ensure_active_run(state, content);
        return;
    };
    let Some(choice) = node.choice(choice_id) else {
        tracing::debug!(choice = choice_id, node = %node.id, "unknown choice");
        return;
    };

    if let Some(check) = &choice.check {
        let tier = roll_choice_check(state, check, &choice.text, rng);
        conclude_run(state, content, &run, tier, rng);
    } else if let Some(next) = &choice.next_node_id {
        if let Some(active) = state.active_task_run.as_mut() {
            active.current_node_id = next.clone();
        }
    } else if let Some(tier) = choice.outcome {
        conclude_run(state, content, &run, tier, rng);
    } else {
        tracing::warn!(choice = choice_id, "choice leads nowhere");
    }
}

/// Roll a choice's check and map the roll to a tier: criticals become the
/// great tiers.
fn roll_choice_check<R: RngCore + ?Sized>(
    state: &mut GameState,
    check: &ChoiceCheck,
    label: &str,
    rng: &mut R,
) -> OutcomeTier {
    let skills = &state.player.skills;
    let mut request = StatCheckRequest::new(check.dc, skills.main(check.stat.main_stat()));
    if let StatRef::Sub(skill) = check.stat {
        request = request.with_sub_skill(skills.sub(skill));
    }
    let result = perform_stat_check(&request, rng);
    let tier = match result.critical {
        Some(Critical::Success) => OutcomeTier::GreatSuccess,
        Some(Critical::Failure) => OutcomeTier::GreatFailure,
        None if result.success => OutcomeTier::Success,
        None => OutcomeTier::Failure,
    };
    state.push_log(format!("{label} ({} check) {result}", check.stat), None);
    tier
}

fn conclude_run<R: RngCore + ?Sized>(
    state: &mut GameState,
    content: &ContentTables,
    run: &ActiveRun,
    tier: OutcomeTier,
    rng: &mut R,
) {
    apply_outcome(state, content, tier, Some(&run.task_graph_id), rng);
    if let Some(task) = state.task_mut(&run.origin_task_id) {
        task.resolved = true;
    }
    drop_queued(state, &run.origin_task_id);
    state.active_task_run = None;
    ensure_active_run(state, content);
}

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

/// Release postings `member_id` fills for any job in `job_ids`.
fn release_postings(state: &mut GameState, member_id: &str, job_ids: &BTreeSet<String>) {
    for posting in state.job_postings.values_mut() {
        if posting.filled_by.as_deref() == Some(member_id) && job_ids.contains(&posting.template_id) {
            posting.filled_by = None;
        }
    }
}

fn set_player_job(state: &mut GameState, content: &ContentTables, job_id: Option<&str>) {
    let job = match job_id {
        Some(id) => match content.job(id) {
            Some(job) => Some(job),
            None => {
                tracing::warn!(job = id, "unknown job");
                return;
            }
        },
        None => None,
    };
    let player_id = state.player.id.clone();

    let previous: BTreeSet<String> = state
        .assignments_of(&player_id)
        .map(|a| a.job_id.clone())
        .filter(|id| Some(id.as_str()) != job_id)
        .collect();
    release_postings(state, &player_id, &previous);
    state.job_assignments.retain(|_, a| a.member_id != player_id);

    match job {
        Some(job) => {
            let row = JobAssignment::new(job.id.clone(), player_id.clone());
            state.job_assignments.insert(row.id.clone(), row);
            rebuild_memberships(state, content, &player_id);
            let text = format!("You now work as {} {}.", indefinite_article(&job.title), job.title);
            state.push_log(text, None);
        }
        None => {
            rebuild_memberships(state, content, &player_id);
            state.push_log("You are out of work.", None);
        }
    }
}

fn remove_job_assignment(state: &mut GameState, content: &ContentTables, job_id: &str) {
    let player_id = state.player.id.clone();
    if state
        .job_assignments
        .remove(&assignment_id(job_id, &player_id))
        .is_none()
    {
        tracing::debug!(job = job_id, "player does not hold this job");
        return;
    }
    release_postings(state, &player_id, &BTreeSet::from([job_id.to_string()]));
    rebuild_memberships(state, content, &player_id);
    let title = content.job(job_id).map_or(job_id, |j| j.title.as_str());
    state.push_log(format!("You quit your job as {} {title}.", indefinite_article(title)), None);
}

fn take_job_instance(state: &mut GameState, content: &ContentTables, instance_id: &str, replace_career: bool) {
    let player_id = state.player.id.clone();
    let Some(posting) = state.job_postings.get(instance_id).cloned() else {
        tracing::debug!(posting = instance_id, "unknown posting");
        return;
    };
    if posting
        .filled_by
        .as_deref()
        .is_some_and(|holder| holder != player_id)
    {
        tracing::debug!(posting = instance_id, "posting already filled");
        return;
    }
    let Some(job) = content.job(&posting.template_id) else {
        tracing::warn!(job = %posting.template_id, "posting for an unknown job");
        return;
    };

    if replace_career {
        let career = content.career_of_job(&job.id).map(|c| c.id.clone());
        let same_career: BTreeSet<String> = state
            .assignments_of(&player_id)
            .map(|a| a.job_id.clone())
            .filter(|id| content.career_of_job(id).map(|c| c.id.clone()) == career)
            .collect();
        release_postings(state, &player_id, &same_career);
        state
            .job_assignments
            .retain(|_, a| !(a.member_id == player_id && same_career.contains(&a.job_id)));
    }

    // One posting per job and member.
    for other in state.job_postings.values_mut() {
        if other.id != posting.id
            && other.template_id == posting.template_id
            && other.filled_by.as_deref() == Some(player_id.as_str())
        {
            other.filled_by = None;
        }
    }
    if let Some(filled) = state.job_postings.get_mut(instance_id) {
        filled.filled_by = Some(player_id.clone());
    }
    let row = JobAssignment::new(job.id.clone(), player_id.clone());
    state.job_assignments.entry(row.id.clone()).or_insert(row);
    rebuild_memberships(state, content, &player_id);

    let employer = match posting.affiliation_id.as_deref() {
        Some(aff) => format!(" with {}", content.affiliation_name(aff)),
        None => String::new(),
    };
    let text = format!(
        "Hired as {} {}{employer} for ${} a month.",
        indefinite_article(&posting.title),
        posting.title,
        posting.salary
    );
    state.push_log(text, None);
}

// ---------------------------------------------------------------------------
// Travel
// ---------------------------------------------------------------------------

fn set_player_district<R: RngCore + ?Sized>(
    state: &mut GameState,
    env: &ReduceEnv<'_>,
    district_id: &str,
    rng: &mut R,
) {
    if !state.districts.contains_key(district_id) {
        tracing::warn!(district = district_id, "unknown district");
        return;
    }
    let from = state.player.current_district.clone();
    if from.as_deref() == Some(district_id) {
        return;
    }

    let route = find_route(from.as_deref(), district_id, &state.districts);
    let text = build_travel_log_text(&route, &state.districts);
    state.push_log(text, None);
    state.player.current_district = Some(district_id.to_string());

    for hop in route.iter().skip(1) {
        if !chance(rng, env.config.encounter_chance) {
            continue;
        }
        let Some(district) = state.districts.get(hop).cloned() else {
            continue;
        };
        let Some(event) = select_encounter(env.content, &district, rng) else {
            continue;
        };
        let taken: BTreeSet<String> = state.tasks.iter().map(|t| t.id.clone()).collect();
        let id = next_task_id("enc", state.month, &taken);
        let task = event_task(event, id, state.month, Some(hop));
        tracing::debug!(task = %task.id, event = %event.id, district = %hop, "encounter");
        state.push_log(format!("Trouble in {}: {}.", district.name, event.title), None);
        push_encounter(state, task);
    }
    ensure_active_run(state, env.content);
}

fn push_encounter(state: &mut GameState, task: TaskState) {
    if let Some(graph_id) = &task.task_graph_id {
        queue_run(state, &task.id, graph_id);
    }
    state.tasks.push(task);
}

// ---------------------------------------------------------------------------
// People
// ---------------------------------------------------------------------------

fn connect_npc(state: &mut GameState, npc: &NpcState, affiliations: &[String], strength: Option<i32>) {
    let player_id = state.player.id.clone();
    let strength = strength.unwrap_or(DEFAULT_RELATIONSHIP_STRENGTH).clamp(0, 100);
    state.npcs.insert(npc.id.clone(), npc.clone());

    match state.relationship_between_mut(&player_id, &npc.id) {
        Some(rel) => rel.strength = strength,
        None => {
            let rel = Relationship::new(player_id, npc.id.clone(), strength);
            state.relationships.insert(rel.id.clone(), rel);
        }
    }

    let rows = memberships_for(&npc.id, affiliations.iter().cloned(), &state.memberships);
    replace_memberships(state, &npc.id, rows);
    state.push_log(format!("You meet {}.", npc.name), None);
}

/// Membership rows for an NPC that has not been connected yet.
pub(crate) fn seed_npc(state: &mut GameState, npc: NpcState) {
    let rows = memberships_for(&npc.id, npc.affiliations.iter().cloned(), &BTreeMap::new());
    replace_memberships(state, &npc.id, rows);
    state.npcs.insert(npc.id.clone(), npc);
}

#[cfg(test)]
mod tests {
    use sw_core::StatsDelta;

    use super::*;

    #[test]
    fn articles() {
        assert_eq!(indefinite_article("Analyst"), "an");
        assert_eq!(indefinite_article("enforcer"), "an");
        assert_eq!(indefinite_article("Courier"), "a");
        assert_eq!(indefinite_article(""), "a");
    }

    #[test]
    fn stats_delta_is_unclamped_for_money() {
        let content = ContentTables::builtin();
        let config = GenConfig::default();
        let env = ReduceEnv::new(&content, &config);
        let state = reduce(
            GameState::default(),
            &Action::ApplyStatsDelta {
                delta: StatsDelta {
                    health: -500,
                    ..StatsDelta::money(-900)
                },
            },
            &env,
            &mut sw_mechanics::FixedRng(0.5),
        );
        assert_eq!(state.player.vitals.health, 0);
        assert_eq!(state.player.vitals.money, -900);
    }

    #[test]
    fn max_stat_delta_does_not_overflow() {
        let content = ContentTables::builtin();
        let config = GenConfig::default();
        let env = ReduceEnv::new(&content, &config);
        let state = reduce(
            GameState::default(),
            &Action::ApplyStatsDelta {
                delta: StatsDelta {
                    health: i32::MAX,
                    looks: i32::MAX,
                    ..StatsDelta::default()
                },
            },
            &env,
            &mut sw_mechanics::FixedRng(0.5),
        );
        assert_eq!(state.player.vitals.health, 100);
        assert_eq!(state.player.vitals.looks, 100);
    }
}
