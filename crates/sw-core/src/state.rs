use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::character::{NpcState, PlayerState};
use crate::district::DistrictState;
use crate::job::{JobAssignment, JobInstance};
use crate::log::LogEntry;
use crate::relationship::{Membership, Relationship};
use crate::stats::StatsDelta;
use crate::task::{ActiveRun, PendingRun, TaskState};

/// The single root of a game session.
///
/// Only the reducer transforms it; everything else reads snapshots. The
/// helpers here are lookups and small bookkeeping used by the reducer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Turns played; month 0 is the opening month.
    pub month: u32,
    /// The player character.
    pub player: PlayerState,
    /// NPCs keyed by id.
    pub npcs: BTreeMap<String, NpcState>,
    /// The city map keyed by district id.
    pub districts: BTreeMap<String, DistrictState>,
    /// This month's tasks, resolved ones included until rollover.
    pub tasks: Vec<TaskState>,
    /// Job assignment rows keyed by [`crate::assignment_id`].
    pub job_assignments: BTreeMap<String, JobAssignment>,
    /// The job board keyed by posting id.
    pub job_postings: BTreeMap<String, JobInstance>,
    /// Membership rows keyed by [`crate::relationship::membership_id`].
    pub memberships: BTreeMap<String, Membership>,
    /// Relationship rows keyed by [`crate::relationship::relationship_id`].
    pub relationships: BTreeMap<String, Relationship>,
    /// Runs waiting for the active slot, oldest first.
    pub pending_task_runs: VecDeque<PendingRun>,
    /// The one narrative run being played.
    pub active_task_run: Option<ActiveRun>,
    /// Append-only journal.
    pub log: Vec<LogEntry>,
    /// Tags outcomes set on the world.
    pub world_tags: BTreeSet<String>,
}

impl GameState {
    // -----------------------------------------------------------------------
    // Log
    // -----------------------------------------------------------------------

    /// Append a log line stamped with the current month.
    pub fn push_log(&mut self, text: impl Into<String>, deltas: Option<StatsDelta>) {
        let id = self.log.last().map_or(1, |entry| entry.id + 1);
        self.log.push(LogEntry {
            id,
            month: self.month,
            text: text.into(),
            deltas,
        });
    }

    /// Log lines written during `month`.
    pub fn log_for_month(&self, month: u32) -> impl Iterator<Item = &LogEntry> {
        self.log.iter().filter(move |entry| entry.month == month)
    }

    // -----------------------------------------------------------------------
    // Tasks
    // -----------------------------------------------------------------------

    /// A task by id.
    pub fn task(&self, id: &str) -> Option<&TaskState> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// A task by id, mutably.
    pub fn task_mut(&mut self, id: &str) -> Option<&mut TaskState> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Tasks still open.
    pub fn unresolved_tasks(&self) -> impl Iterator<Item = &TaskState> {
        self.tasks.iter().filter(|t| !t.resolved)
    }

    /// Returns true if a run for `task_id` is queued.
    pub fn is_queued(&self, task_id: &str) -> bool {
        self.pending_task_runs.iter().any(|r| r.task_id == task_id)
    }

    // -----------------------------------------------------------------------
    // Jobs and affiliations
    // -----------------------------------------------------------------------

    /// Assignment rows held by `member_id`.
    pub fn assignments_of<'a>(
        &'a self,
        member_id: &'a str,
    ) -> impl Iterator<Item = &'a JobAssignment> + 'a {
        self.job_assignments
            .values()
            .filter(move |a| a.member_id == member_id)
    }

    /// Job ids held by the player.
    pub fn player_job_ids(&self) -> Vec<String> {
        self.assignments_of(&self.player.id)
            .map(|a| a.job_id.clone())
            .collect()
    }

    /// Membership rows belonging to `member_id`.
    pub fn memberships_of<'a>(
        &'a self,
        member_id: &'a str,
    ) -> impl Iterator<Item = &'a Membership> + 'a {
        self.memberships
            .values()
            .filter(move |m| m.member_id == member_id)
    }

    /// The posting `member_id` currently fills for `template_id`, if any.
    pub fn posting_held_by(&self, template_id: &str, member_id: &str) -> Option<&JobInstance> {
        self.job_postings.values().find(|p| {
            p.template_id == template_id && p.filled_by.as_deref() == Some(member_id)
        })
    }

    /// Postings nobody fills.
    pub fn open_postings(&self) -> impl Iterator<Item = &JobInstance> {
        self.job_postings.values().filter(|p| p.is_open())
    }

    // -----------------------------------------------------------------------
    // People and places
    // -----------------------------------------------------------------------

    /// The tie between two characters in either stored direction.
    pub fn relationship_between(&self, x: &str, y: &str) -> Option<&Relationship> {
        self.relationships.values().find(|r| r.connects(x, y))
    }

    /// Mutable form of [`GameState::relationship_between`].
    pub fn relationship_between_mut(&mut self, x: &str, y: &str) -> Option<&mut Relationship> {
        self.relationships.values_mut().find(|r| r.connects(x, y))
    }

    /// The district the player stands in.
    pub fn current_district(&self) -> Option<&DistrictState> {
        self.player
            .current_district
            .as_deref()
            .and_then(|id| self.districts.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relationship::NO_AFFILIATION;
    use crate::task::TaskKind;

    #[test]
    fn log_ids_are_sequential() {
        let mut state = GameState::default();
        state.push_log("first", None);
        state.month = 3;
        state.push_log("second", Some(StatsDelta::money(10)));
        assert_eq!(state.log[0].id, 1);
        assert_eq!(state.log[1].id, 2);
        assert_eq!(state.log[1].month, 3);
        assert_eq!(state.log_for_month(3).count(), 1);
    }

    #[test]
    fn task_lookup() {
        let mut state = GameState::default();
        state
            .tasks
            .push(TaskState::new("t1", TaskKind::Errand, "errand", "Fetch noodles"));
        assert!(state.task("t1").is_some());
        state.task_mut("t1").unwrap().resolved = true;
        assert_eq!(state.unresolved_tasks().count(), 0);
    }

    #[test]
    fn per_member_views() {
        let mut state = GameState::default();
        let row = JobAssignment::new("courier", "player");
        state.job_assignments.insert(row.id.clone(), row);
        let other = JobAssignment::new("clerk", "npc-1");
        state.job_assignments.insert(other.id.clone(), other);
        let m = Membership::new(NO_AFFILIATION, "player", 0);
        state.memberships.insert(m.id.clone(), m);

        assert_eq!(state.player_job_ids(), vec!["courier".to_string()]);
        assert_eq!(state.memberships_of("player").count(), 1);
        assert_eq!(state.memberships_of("npc-1").count(), 0);
    }

    #[test]
    fn relationship_found_from_either_end() {
        let mut state = GameState::default();
        let tie = Relationship::new("player", "npc-1", 30);
        state.relationships.insert(tie.id.clone(), tie);
        assert!(state.relationship_between("npc-1", "player").is_some());
    }

    #[test]
    fn state_round_trips_through_json() {
        let mut state = GameState::default();
        state.push_log("hello", None);
        state.world_tags.insert("curfew".into());
        let json = serde_json::to_string(&state).unwrap();
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
