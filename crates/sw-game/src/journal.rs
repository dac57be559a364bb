//! Export of the game log, grouped by in-game month.

use sw_core::GameState;
use sw_simulation::Calendar;

/// Render the log as markdown: one section per month, one bullet per line.
pub fn export_log_markdown(state: &GameState, calendar: &Calendar) -> String {
    let mut out = format!("# {}'s Journal\n", state.player.name);
    let mut month = None;
    for entry in &state.log {
        if month != Some(entry.month) {
            month = Some(entry.month);
            out.push_str(&format!("\n## {}\n\n", calendar.date(entry.month)));
        }
        out.push_str(&format!("- {}", entry.text));
        if let Some(deltas) = entry.deltas.as_ref().filter(|d| !d.is_empty()) {
            out.push_str(&format!(" *({deltas})*"));
        }
        out.push('\n');
    }
    out
}

/// Render the log as plain text.
pub fn export_log_text(state: &GameState, calendar: &Calendar) -> String {
    let title = format!("{}'s Journal", state.player.name);
    let mut out = format!("{title}\n{}\n", "=".repeat(title.chars().count()));
    let mut month = None;
    for entry in &state.log {
        if month != Some(entry.month) {
            month = Some(entry.month);
            out.push_str(&format!("\n--- {} ---\n", calendar.date(entry.month)));
        }
        out.push_str(&entry.text);
        if let Some(deltas) = entry.deltas.as_ref().filter(|d| !d.is_empty()) {
            out.push_str(&format!(" ({deltas})"));
        }
        out.push('\n');
    }
    out
}
