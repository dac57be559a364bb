/// `sw export`: write the journal.
pub mod export;
/// `sw jobs`: roll a job board.
pub mod jobs;
/// `sw new`: start a game.
pub mod new;
/// `sw npc`: roll NPCs.
pub mod npc;
/// `sw play`: the interactive prompt.
pub mod play;
/// `sw route`: shortest district path.
pub mod route;
/// `sw simulate`: run months unattended.
pub mod simulate;
/// `sw story`: play a story script.
pub mod story;

use std::path::Path;
use std::sync::Arc;

use sw_core::ContentTables;
use sw_game::GameConfig;
use sw_mechanics::parse_seed;
use sw_narrative::closest_match;

/// Content from a JSON file, or the built-in tables.
pub fn load_content(path: Option<&Path>) -> Result<Arc<ContentTables>, String> {
    let Some(path) = path else {
        return Ok(Arc::new(ContentTables::builtin()));
    };
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let tables = ContentTables::from_json(&json).map_err(|e| format!("{}: {e}", path.display()))?;
    tracing::debug!(path = %path.display(), districts = tables.districts.len(), "loaded content");
    Ok(Arc::new(tables))
}

/// A game config from the common CLI flags.
pub fn game_config(seed: Option<&str>, name: &str) -> GameConfig {
    let config = GameConfig::default().with_player_name(name);
    match seed {
        Some(seed) => config.with_seed(parse_seed(seed)),
        None => config,
    }
}

/// Check a district id against the content, suggesting a near miss.
fn known_district(content: &ContentTables, id: &str) -> Result<(), String> {
    if content.district(id).is_some() {
        return Ok(());
    }
    let ids = content.districts.iter().map(|d| d.id.as_str());
    match closest_match(id, ids) {
        Some(suggestion) => Err(format!("unknown district \"{id}\" (did you mean \"{suggestion}\"?)")),
        None => Err(format!("unknown district \"{id}\"")),
    }
}

fn read_snapshot(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))
}

fn write_output(path: &Path, content: &str) -> Result<(), String> {
    std::fs::write(path, content).map_err(|e| format!("cannot write to {}: {e}", path.display()))
}
