//! Integration tests for the story bridge between game and narrative.
use sw_core::{Action, SubSkill, TaskKind, TaskState};
use sw_game::{GameConfig, GameError, GameSession};
use sw_mechanics::FixedRng;
use sw_narrative::{CompiledScript, NarrativeBridge, ScriptLibrary};

const FENCE: &str = r#"{
    "id": "fence",
    "knots": {
        "start": [
            { "op": "text", "text": "A fence eyes your bag, {player_name}." },
            { "op": "choices", "options": [
                { "text": "Sell", "goto": "sold" },
                { "text": "Walk away", "goto": "walked" }
            ]}
        ],
        "sold": [
            { "op": "text", "text": "Deal." },
            { "op": "add", "var": "delta_money", "amount": 80 },
            { "op": "add", "var": "delta_stress", "amount": 5 },
            { "op": "add", "var": "delta_persuasion", "amount": 2 },
            { "op": "set", "var": "outcome", "value": "success" }
        ],
        "walked": [
            { "op": "text", "text": "You keep your things." }
        ]
    }
}"#;

const SUCCESS_FLAVOR: [&str; 2] = ["You handle it. Not pretty, but done.", "A small win. You'll take it."];

fn library() -> ScriptLibrary {
    ScriptLibrary::new().with_script(CompiledScript::from_json(FENCE).unwrap())
}

/// A seeded session whose only task is a scripted fence story.
fn session_with_fence() -> GameSession {
    let mut session =
        GameSession::builtin(GameConfig::default().with_seed(8).with_player_name("Vee")).unwrap();
    session.dispatch(Action::SetTasks {
        tasks: vec![TaskState::new("t-fence", TaskKind::RandomEvent, "fence", "Fence").with_graph("fence")],
    });
    session
}

#[test]
fn finished_story_actions_land_in_the_session() {
    let mut session = session_with_fence();
    let before = session.state().player.clone();

    let mut bridge = NarrativeBridge::new(library(), FixedRng(0.5));
    let frames = bridge.begin("t-fence", "fence", None, &session.state().player);
    assert_eq!(frames.last().unwrap().choices.len(), 2);
    let frames = bridge.choose(0).unwrap();
    assert!(frames.last().unwrap().finished);

    let log_before = session.state().log.len();
    session.dispatch_all(bridge.finish());
    let state = session.state();

    // story deltas plus the default success outcome
    assert_eq!(state.player.vitals.money, before.vitals.money + 80 + 60);
    assert_eq!(state.player.vitals.stress, before.vitals.stress + 5);
    assert_eq!(
        state.player.skills.sub(SubSkill::Persuasion),
        before.skills.sub(SubSkill::Persuasion) + 2
    );

    let added = &state.log[log_before..];
    assert_eq!(added.len(), 1);
    assert!(SUCCESS_FLAVOR.contains(&added[0].text.as_str()));
    assert_eq!(added[0].deltas.as_ref().unwrap().to_string(), "money +60");

    assert!(state.task("t-fence").unwrap().resolved);
    assert!(state.active_task_run.is_none());
}

#[test]
fn story_without_an_outcome_only_resolves() {
    let mut session = session_with_fence();
    let before = session.state().player.vitals.clone();

    let mut bridge = NarrativeBridge::new(library(), FixedRng(0.5));
    bridge.begin("t-fence", "fence", None, &session.state().player);
    bridge.choose(1).unwrap();
    let actions = bridge.finish();
    assert_eq!(
        actions,
        vec![Action::ResolveTask {
            task_id: "t-fence".into()
        }]
    );

    session.dispatch_all(actions);
    assert_eq!(session.state().player.vitals, before);
    assert!(session.state().task("t-fence").unwrap().resolved);
}

#[test]
fn story_commands_play_and_dispatch() {
    let mut session = session_with_fence().with_stories(library());
    let money = session.state().player.vitals.money;

    let out = session.process("story t-fence").unwrap();
    assert!(out.starts_with("A fence eyes your bag, Vee."));
    assert!(out.contains("[1] Sell"));
    assert!(!session.state().task("t-fence").unwrap().resolved);

    let out = session.process("pick 1").unwrap();
    assert!(out.starts_with("Deal."));
    assert!(SUCCESS_FLAVOR.iter().any(|line| out.contains(line)));
    assert_eq!(session.state().player.vitals.money, money + 140);
    assert!(session.state().task("t-fence").unwrap().resolved);

    // the story is over
    assert!(matches!(session.process("pick 1"), Err(GameError::Narrative(_))));
    assert!(matches!(session.process("story t-fence"), Err(GameError::InvalidCommand(_))));
}

#[test]
fn story_command_errors() {
    let mut bare = session_with_fence();
    assert!(matches!(bare.process("story t-fence"), Err(GameError::NoStories)));

    let mut session = session_with_fence().with_stories(library());
    assert!(matches!(session.process("story nope"), Err(GameError::UnknownTask(_))));
    assert!(matches!(session.process("pick zero"), Err(GameError::InvalidCommand(_))));
    assert!(matches!(session.process("pick 1"), Err(GameError::Narrative(_))));

    session.process("story t-fence").unwrap();
    assert!(matches!(session.process("pick 9"), Err(GameError::Narrative(_))));
}
