use std::sync::Arc;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use sw_core::{Action, ContentTables};
use sw_game::{GameConfig, GameSession};

/// Choices one story may take under `--auto` before it is abandoned.
const AUTO_STEP_LIMIT: usize = 32;

/// Advance a game month by month and tabulate the vitals.
pub fn run(
    content: Arc<ContentTables>,
    config: GameConfig,
    months: u32,
    auto: bool,
    verbose: bool,
) -> Result<(), String> {
    let mut session = GameSession::new(content, config).map_err(|e| format!("failed to start game: {e}"))?;
    println!(
        "  {} {} months (seed {})\n",
        "Simulating".bold(),
        months,
        session.meta().seed.map_or("random".to_string(), |s| s.to_string())
    );

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Date", "District", "Money", "Health", "Stress", "Open tasks", "Postings"]);

    for _ in 0..months {
        if auto {
            play_month(&mut session);
        }
        let before = session.state().log.len();
        session.dispatch(Action::AdvanceMonth);

        let state = session.state();
        if verbose {
            println!("  {}", session.date().to_string().cyan());
            for entry in &state.log[before..] {
                println!("    {}", entry.text);
            }
        }
        let district = state.current_district().map_or("-", |d| d.name.as_str());
        table.add_row(vec![
            session.date().to_string(),
            district.to_string(),
            format!("${}", state.player.vitals.money),
            state.player.vitals.health.to_string(),
            state.player.vitals.stress.to_string(),
            state.unresolved_tasks().count().to_string(),
            state.open_postings().count().to_string(),
        ]);
    }

    if verbose {
        println!();
    }
    println!("{table}");
    println!();
    println!(
        "  {} months, {} log entries",
        session.state().month,
        session.state().log.len()
    );
    Ok(())
}

/// Start every open story, take first choices until each ends, then close
/// out whatever is left.
fn play_month(session: &mut GameSession) {
    let stories: Vec<Action> = session
        .state()
        .unresolved_tasks()
        .filter_map(|t| {
            t.task_graph_id.clone().map(|graph| Action::StartTaskRun {
                task_id: t.id.clone(),
                task_graph_id: graph,
            })
        })
        .collect();
    session.dispatch_all(stories);

    let mut steps = 0;
    while let Some(choice_id) = first_choice(session) {
        if steps >= AUTO_STEP_LIMIT {
            tracing::warn!("story did not finish, abandoning it");
            break;
        }
        session.dispatch(Action::MakeTaskChoice { choice_id });
        steps += 1;
    }

    let leftovers: Vec<Action> = session
        .state()
        .unresolved_tasks()
        .map(|t| Action::ResolveTask { task_id: t.id.clone() })
        .collect();
    session.dispatch_all(leftovers);
}

fn first_choice(session: &GameSession) -> Option<String> {
    let run = session.state().active_task_run.as_ref()?;
    let graph = session.content().graph(&run.task_graph_id)?;
    let node = graph.node(&run.current_node_id)?;
    node.choices.first().map(|c| c.id.clone())
}
