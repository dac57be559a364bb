//! Task-run orchestration: the pending queue and the single active slot.
//!
//! Every handler that can empty the slot or grow the queue ends by calling
//! [`ensure_active_run`], so activation happens in exactly one place and a
//! second active run can never appear.

use sw_core::{ActiveRun, ContentTables, GameState, PendingRun};

/// Fill an empty active slot from the head of the queue.
///
/// Queued runs whose task is already resolved, or whose graph is missing,
/// are discarded on the way.
pub fn ensure_active_run(state: &mut GameState, content: &ContentTables) {
    while state.active_task_run.is_none() {
        let Some(next) = state.pending_task_runs.pop_front() else {
            break;
        };
        if state.task(&next.task_id).is_some_and(|t| t.resolved) {
            tracing::debug!(task = %next.task_id, "dropping queued run for resolved task");
            continue;
        }
        let Some(graph) = content.graph(&next.task_graph_id) else {
            tracing::warn!(graph = %next.task_graph_id, "dropping queued run with unknown graph");
            continue;
        };
        tracing::debug!(task = %next.task_id, graph = %graph.id, "activating task run");
        state.active_task_run = Some(ActiveRun {
            task_graph_id: graph.id.clone(),
            origin_task_id: next.task_id,
            current_node_id: graph.entry_node_id.clone(),
        });
    }
}

/// Append a run to the queue unless one for the task is already waiting.
pub fn queue_run(state: &mut GameState, task_id: &str, task_graph_id: &str) {
    if state.is_queued(task_id) {
        return;
    }
    state.pending_task_runs.push_back(PendingRun {
        task_id: task_id.to_string(),
        task_graph_id: task_graph_id.to_string(),
    });
}

/// Remove every queued run for a task.
pub fn drop_queued(state: &mut GameState, task_id: &str) {
    state.pending_task_runs.retain(|r| r.task_id != task_id);
}

#[cfg(test)]
mod tests {
    use sw_core::{TaskKind, TaskState};

    use super::*;

    fn state_with(tasks: &[(&str, bool)]) -> GameState {
        GameState {
            tasks: tasks
                .iter()
                .map(|(id, resolved)| {
                    let mut t = TaskState::new(*id, TaskKind::RandomEvent, "alley_mugging", "Mugging");
                    t.resolved = *resolved;
                    t
                })
                .collect(),
            ..GameState::default()
        }
    }

    #[test]
    fn activates_head_at_entry_node() {
        let content = ContentTables::builtin();
        let mut state = state_with(&[("a", false), ("b", false)]);
        queue_run(&mut state, "a", "alley_mugging");
        queue_run(&mut state, "b", "checkpoint_shakedown");
        queue_run(&mut state, "a", "alley_mugging");
        assert_eq!(state.pending_task_runs.len(), 2);

        ensure_active_run(&mut state, &content);
        let run = state.active_task_run.clone().unwrap();
        assert_eq!(run.origin_task_id, "a");
        assert_eq!(run.current_node_id, "start");
        assert_eq!(state.pending_task_runs.len(), 1);

        // occupied slot: nothing moves
        ensure_active_run(&mut state, &content);
        assert_eq!(state.active_task_run, Some(run));
        assert_eq!(state.pending_task_runs.len(), 1);
    }

    #[test]
    fn skips_resolved_and_unknown() {
        let content = ContentTables::builtin();
        let mut state = state_with(&[("done", true), ("ghost", false), ("live", false)]);
        queue_run(&mut state, "done", "alley_mugging");
        queue_run(&mut state, "ghost", "no_such_graph");
        queue_run(&mut state, "live", "checkpoint_shakedown");

        ensure_active_run(&mut state, &content);
        let run = state.active_task_run.as_ref().unwrap();
        assert_eq!(run.origin_task_id, "live");
        assert!(state.pending_task_runs.is_empty());
    }

    #[test]
    fn empty_queue_leaves_slot_empty() {
        let content = ContentTables::builtin();
        let mut state = GameState::default();
        ensure_active_run(&mut state, &content);
        assert!(state.active_task_run.is_none());
    }
}
