use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use colored::Colorize;
use sw_core::ContentTables;
use sw_game::{GameConfig, GameSession};
use sw_narrative::ScriptLibrary;

/// Run the interactive prompt until `quit` or end of input.
pub fn run(
    content: Arc<ContentTables>,
    config: GameConfig,
    load: Option<&Path>,
    stories: Option<&Path>,
) -> Result<(), String> {
    let mut session = match load {
        Some(path) => {
            let json = super::read_snapshot(path)?;
            GameSession::from_json(&json, content, config).map_err(|e| format!("{}: {e}", path.display()))?
        }
        None => GameSession::new(content, config).map_err(|e| format!("failed to start game: {e}"))?,
    };
    if let Some(dir) = stories {
        let library = ScriptLibrary::from_dir(dir).map_err(|e| format!("{}: {e}", dir.display()))?;
        tracing::info!(stories = library.len(), "loaded story scripts");
        session = session.with_stories(library);
    }

    println!("  {} Streetwise", "Starting".bold());
    println!("  {} | {}", session.date(), session.state().player.name);
    println!("  Type 'help' for commands, 'save <file>' to save, 'quit' to exit.\n");

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if let Some(path) = input.strip_prefix("save ") {
            match save(&session, Path::new(path.trim())) {
                Ok(()) => println!("  Saved to {}\n", path.trim()),
                Err(e) => println!("{}\n", e.yellow()),
            }
            continue;
        }

        match session.process(input) {
            Ok(output) => {
                if !output.is_empty() {
                    println!("{output}\n");
                }
                if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("q") {
                    break;
                }
            }
            Err(e) => {
                println!("{}\n", e.to_string().yellow());
            }
        }
    }

    Ok(())
}

fn save(session: &GameSession, path: &Path) -> Result<(), String> {
    let json = session.to_json().map_err(|e| e.to_string())?;
    super::write_output(path, &json)
}
