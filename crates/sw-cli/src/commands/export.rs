use std::path::Path;
use std::sync::Arc;

use sw_core::{Action, ContentTables};
use sw_game::{GameConfig, GameSession};

/// Export a game's journal as Markdown or text.
pub fn run(
    content: Arc<ContentTables>,
    config: GameConfig,
    format: &str,
    load: Option<&Path>,
    months: u32,
    output: Option<&Path>,
) -> Result<(), String> {
    let session = match load {
        Some(path) => {
            let json = super::read_snapshot(path)?;
            GameSession::from_json(&json, content, config).map_err(|e| format!("{}: {e}", path.display()))?
        }
        None => {
            let mut session = GameSession::new(content, config).map_err(|e| format!("failed to start game: {e}"))?;
            session.dispatch_all((0..months).map(|_| Action::AdvanceMonth));
            session
        }
    };

    let text = match format {
        "markdown" | "md" => session.export_markdown(),
        "text" | "txt" => session.export_text(),
        "json" => session.to_json().map_err(|e| e.to_string())?,
        _ => {
            return Err(format!(
                "unsupported format: \"{format}\". Use: markdown, text, json"
            ));
        }
    };

    if let Some(path) = output {
        super::write_output(path, &text)?;
        println!("  Exported to {}", path.display());
    } else {
        print!("{text}");
    }
    Ok(())
}
