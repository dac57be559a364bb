//! Integration tests for the `sw` command-line interface.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const FENCE_STORY: &str = r#"{
  "id": "fence",
  "knots": {
    "start": [
      { "op": "text", "text": "A fence eyes your bag, {player_name}." },
      { "op": "choices", "options": [
        { "text": "Sell", "goto": "sold" },
        { "text": "Walk away", "goto": "leave" }
      ]}
    ],
    "sold": [
      { "op": "add", "var": "delta_money", "amount": 80 },
      { "op": "set", "var": "outcome", "value": "success" },
      { "op": "text", "text": "Cash changes hands." },
      { "op": "end" }
    ],
    "leave": [ { "op": "text", "text": "You keep walking." }, { "op": "end" } ]
  }
}"#;

fn story_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("fence.json"), FENCE_STORY).unwrap();
    dir
}

fn sw() -> Command {
    Command::cargo_bin("sw").unwrap()
}

// ---------------------------------------------------------------------------
// new
// ---------------------------------------------------------------------------

#[test]
fn new_game_shows_status() {
    sw().args(["new", "--name", "Vee", "--seed", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("New game:"))
        .stdout(predicate::str::contains("Jan 2077 | The Midlands | Vee, age 18"))
        .stdout(predicate::str::contains("Open postings"));
}

#[test]
fn new_game_saves_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("save.json");
    sw().args(["new", "--seed", "7", "-o"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved to"));
    let json = fs::read_to_string(&path).unwrap();
    assert!(json.contains("\"meta\""));
    assert!(json.contains("\"state\""));
}

#[test]
fn new_game_rejects_unknown_district() {
    sw().args(["new", "--district", "habor"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("did you mean \"harbor\""));
}

// ---------------------------------------------------------------------------
// simulate
// ---------------------------------------------------------------------------

#[test]
fn simulate_prints_a_row_per_month() {
    sw().args(["simulate", "--months", "3", "--seed", "11"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Feb 2077"))
        .stdout(predicate::str::contains("Apr 2077"))
        .stdout(predicate::str::contains("3 months"));
}

#[test]
fn simulate_is_deterministic() {
    let run = || {
        sw().args(["simulate", "--months", "4", "--seed", "night city", "--auto", "--verbose"])
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

// ---------------------------------------------------------------------------
// route
// ---------------------------------------------------------------------------

#[test]
fn route_between_districts() {
    sw().args(["route", "downtown", "harbor"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Downtown -> The Midlands -> Industrial Belt -> Harbor",
        ))
        .stdout(predicate::str::contains("3 hops"));
}

#[test]
fn route_unknown_district() {
    sw().args(["route", "downtown", "atlantis"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown district \"atlantis\""));
}

// ---------------------------------------------------------------------------
// npc / jobs
// ---------------------------------------------------------------------------

#[test]
fn npc_table() {
    sw().args(["npc", "-n", "3", "--seed", "5", "--template", "fixer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fixer"))
        .stdout(predicate::str::contains("3 NPCs"));
}

#[test]
fn npc_json_is_seeded() {
    let run = || {
        sw().args(["npc", "-n", "4", "--seed", "99", "--format", "json"])
            .output()
            .unwrap()
            .stdout
    };
    let first = run();
    assert_eq!(first, run());
    let npcs: serde_json::Value = serde_json::from_slice(&first).unwrap();
    assert_eq!(npcs.as_array().unwrap().len(), 4);
}

#[test]
fn npc_unknown_template() {
    sw().args(["npc", "--template", "fixxer"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("did you mean \"fixer\""));
}

#[test]
fn jobs_board() {
    sw().args(["jobs", "--seed", "3", "--max", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Salary"))
        .stdout(predicate::str::contains("4 postings"));
}

// ---------------------------------------------------------------------------
// story
// ---------------------------------------------------------------------------

#[test]
fn story_plays_picks_and_reports_actions() {
    let dir = story_dir();
    sw().arg("story")
        .arg(dir.path().join("fence.json"))
        .args(["--pick", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("A fence eyes your bag, Rook."))
        .stdout(predicate::str::contains("[1] Sell"))
        .stdout(predicate::str::contains("Cash changes hands."))
        .stdout(predicate::str::contains("APPLY_STATS_DELTA"))
        .stdout(predicate::str::contains("APPLY_OUTCOME"))
        .stdout(predicate::str::contains("RESOLVE_TASK"));
}

#[test]
fn story_stops_at_a_choice() {
    let dir = story_dir();
    sw().arg("story")
        .arg(dir.path().join("fence.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("(stopped at a choice)"));
}

#[test]
fn story_bad_knot_fails() {
    let dir = story_dir();
    sw().arg("story")
        .arg(dir.path().join("fence.json"))
        .args(["--knot", "nowhere"])
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// export
// ---------------------------------------------------------------------------

#[test]
fn export_markdown_journal() {
    sw().args(["export", "--months", "2", "--seed", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Rook's Journal"))
        .stdout(predicate::str::contains("## Mar 2077"));
}

#[test]
fn export_snapshot_as_text_to_file() {
    let dir = TempDir::new().unwrap();
    let save = dir.path().join("save.json");
    let out = dir.path().join("journal.txt");
    sw().args(["new", "--name", "Vee", "--seed", "8", "-o"])
        .arg(&save)
        .assert()
        .success();
    sw().args(["export", "text", "--load"])
        .arg(&save)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported to"));
    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("Vee arrives in The Midlands."));
}

#[test]
fn export_unknown_format() {
    sw().args(["export", "pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported format"));
}

// ---------------------------------------------------------------------------
// play / content
// ---------------------------------------------------------------------------

#[test]
fn play_reads_commands_from_stdin() {
    sw().args(["play", "--name", "Vee", "--seed", "2"])
        .write_stdin("status\ngo downtown\nadvance\nfly\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Vee, age 18"))
        .stdout(predicate::str::contains("You travel from The Midlands to Downtown."))
        .stdout(predicate::str::contains("unknown command: fly"))
        .stdout(predicate::str::contains("Goodbye!"));
}

#[test]
fn play_loads_story_scripts() {
    let dir = story_dir();
    sw().args(["play", "--seed", "2", "--stories"])
        .arg(dir.path())
        .write_stdin("pick 1\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("no story is running"));

    sw().args(["play", "--seed", "2"])
        .write_stdin("pick 1\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("no stories are loaded"));
}

#[test]
fn play_with_missing_story_dir_fails() {
    let dir = TempDir::new().unwrap();
    sw().args(["play", "--stories"])
        .arg(dir.path().join("nowhere"))
        .write_stdin("quit\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn bad_content_file_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("content.json");
    fs::write(&path, "{ not json").unwrap();
    sw().arg("--content")
        .arg(&path)
        .args(["route", "downtown", "midlands"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}
