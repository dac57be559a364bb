use std::path::Path;

use colored::Colorize;
use sw_core::{PlayerState, Skills};
use sw_mechanics::{make_rng, parse_seed};
use sw_narrative::{CompiledScript, NarrativeBridge, NarrativeFrame, ScriptLibrary};

/// Play a story script through the narrative bridge and print the actions it produced.
pub fn run(file: &Path, knot: Option<&str>, picks: &[usize], seed: Option<&str>) -> Result<(), String> {
    let json = std::fs::read_to_string(file).map_err(|e| format!("cannot read {}: {e}", file.display()))?;
    let script = CompiledScript::from_json(&json).map_err(|e| format!("{}: {e}", file.display()))?;
    let story_id = script.id.clone();

    let mut player = PlayerState::new("Rook");
    player.skills = Skills::uniform(3, 20);

    let library = ScriptLibrary::new().with_script(script);
    let mut bridge = NarrativeBridge::new(library, make_rng(seed.map(parse_seed)));
    bridge.subscribe(|event| {
        println!("  {} {} {}", "check:".dimmed(), event.stat, event.result);
    });

    let mut frames = bridge.begin("cli", &story_id, knot, &player);
    print_frames(&frames)?;

    for &pick in picks {
        let waiting = frames.last().is_some_and(|f| !f.choices.is_empty());
        if !waiting {
            break;
        }
        let index = pick
            .checked_sub(1)
            .ok_or_else(|| "choices are numbered from 1".to_string())?;
        println!("  {} {pick}", ">".bold());
        frames = bridge.choose(index).map_err(|e| e.to_string())?;
        print_frames(&frames)?;
    }

    if frames.last().is_some_and(|f| !f.choices.is_empty()) {
        println!("  (stopped at a choice)");
    }

    let actions = bridge.finish();
    if actions.is_empty() {
        return Ok(());
    }
    println!();
    println!("  {}", "Actions:".bold());
    for action in &actions {
        let json = serde_json::to_string(action).map_err(|e| format!("JSON serialization error: {e}"))?;
        println!("  {json}");
    }
    Ok(())
}

fn print_frames(frames: &[NarrativeFrame]) -> Result<(), String> {
    for frame in frames {
        if frame.error {
            return Err(frame.text.clone());
        }
        if !frame.text.is_empty() || !frame.choices.is_empty() || frame.finished {
            println!("{frame}");
        }
    }
    Ok(())
}
