use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use sw_core::ContentTables;
use sw_game::{GameConfig, GameSession};

/// Start a game, print its status and optionally save it.
pub fn run(content: Arc<ContentTables>, config: GameConfig, output: Option<&Path>) -> Result<(), String> {
    super::known_district(&content, &config.start_district)?;
    let mut session = GameSession::new(content, config).map_err(|e| format!("failed to start game: {e}"))?;

    println!("  {} {}", "New game:".bold(), session.state().player.name);
    if let Some(seed) = session.meta().seed {
        println!("  Seed: {seed}");
    }
    println!();
    for command in ["status", "tasks", "jobs"] {
        let text = session.process(command).map_err(|e| e.to_string())?;
        println!("{text}\n");
    }

    if let Some(path) = output {
        let json = session.to_json().map_err(|e| e.to_string())?;
        super::write_output(path, &json)?;
        println!("  Saved to {}", path.display());
    }
    Ok(())
}
