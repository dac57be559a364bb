//! Plays a story for a task and turns what it left behind into actions.
//!
//! The bridge owns the running story, the RNG its checks roll on, and the
//! observers that watch those checks. A run goes `begin` -> `frames`/`choose`
//! -> `finish`; `finish` reads the story's `delta_*` variables and its
//! `outcome` tag and hands back the actions the game loop should dispatch.

use std::fmt;

use rand::RngCore;
use serde::Serialize;
use sw_core::{Action, MainStat, OutcomeTier, PlayerState, SkillDeltas, StatRef, StatsDelta, SubSkill};
use sw_mechanics::{GameRng, StatCheckRequest, perform_stat_check};

use crate::engine::{StoryChoice, StoryEngine, StoryHost, StoryLoader, StoryValue};
use crate::error::{NarrativeError, NarrativeResult};
use crate::observers::{CheckEvent, CheckObservers, Subscription};
use crate::resolve::{closest_match, stat_names};

/// Variable a story sets to pick an outcome tier.
pub const OUTCOME_VAR: &str = "outcome";

/// Prefix of variables read back as stat or skill deltas.
pub const DELTA_PREFIX: &str = "delta_";

/// One beat of story output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NarrativeFrame {
    /// The line, or the error message.
    pub text: String,
    /// Only the last frame of a batch carries choices.
    pub choices: Vec<StoryChoice>,
    /// The story has nothing more to say.
    pub finished: bool,
    /// This frame reports a failure instead of story text.
    pub error: bool,
}

impl NarrativeFrame {
    fn line(text: String) -> Self {
        Self {
            text,
            choices: Vec::new(),
            finished: false,
            error: false,
        }
    }

    fn error(err: &NarrativeError) -> Self {
        Self {
            text: err.to_string(),
            choices: Vec::new(),
            finished: true,
            error: true,
        }
    }
}

impl fmt::Display for NarrativeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.error {
            write!(f, "[error] ")?;
        }
        write!(f, "{}", self.text)?;
        for choice in &self.choices {
            write!(f, "\n  [{}] {}", choice.index + 1, choice.text)?;
        }
        if self.finished && !self.error {
            write!(f, "\n  (end)")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct PendingResolve {
    task_id: String,
    graph_id: String,
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

/// The external functions a story can call: `stat_check(name, dc)` and
/// `has_money(amount)`.
struct BridgeHost<'a, R: RngCore + ?Sized> {
    player: &'a PlayerState,
    rng: &'a mut R,
    observers: &'a mut CheckObservers,
}

impl<R: RngCore + ?Sized> BridgeHost<'_, R> {
    fn stat_check(&mut self, args: &[StoryValue]) -> bool {
        let (Some(name), Some(dc)) = (
            args.first().and_then(StoryValue::as_str),
            args.get(1).and_then(StoryValue::as_i64),
        ) else {
            tracing::warn!(?args, "stat_check expects (name, dc)");
            return false;
        };
        let stat = match StatRef::parse(name) {
            Ok(stat) => stat,
            Err(_) => {
                let suggestion = closest_match(name, stat_names());
                tracing::warn!(stat = name, ?suggestion, "story checked an unknown stat");
                return false;
            }
        };

        let skills = &self.player.skills;
        let mut request = StatCheckRequest::new(dc as i32, skills.main(stat.main_stat()));
        if let StatRef::Sub(skill) = stat {
            request = request.with_sub_skill(skills.sub(skill));
        }
        let result = perform_stat_check(&request, &mut *self.rng);
        tracing::debug!(%stat, %result, "story stat check");
        let success = result.success;
        self.observers.notify(&CheckEvent { stat, result });
        success
    }

    fn has_money(&self, args: &[StoryValue]) -> bool {
        match args.first().and_then(StoryValue::as_i64) {
            Some(amount) => self.player.vitals.money >= amount,
            None => {
                tracing::warn!(?args, "has_money expects (amount)");
                false
            }
        }
    }
}

impl<R: RngCore + ?Sized> StoryHost for BridgeHost<'_, R> {
    fn call(&mut self, name: &str, args: &[StoryValue]) -> StoryValue {
        match name {
            "stat_check" => StoryValue::Bool(self.stat_check(args)),
            "has_money" => StoryValue::Bool(self.has_money(args)),
            other => {
                tracing::warn!(function = other, "story called an unknown function");
                StoryValue::Null
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Bridge
// ---------------------------------------------------------------------------

/// Drives one story at a time on behalf of a task.
pub struct NarrativeBridge<L, R = GameRng> {
    loader: L,
    rng: R,
    observers: CheckObservers,
    story: Option<Box<dyn StoryEngine>>,
    player: PlayerState,
    pending: Option<PendingResolve>,
}

impl<L: StoryLoader, R: RngCore> NarrativeBridge<L, R> {
    /// A bridge loading stories from `loader` and rolling checks on `rng`.
    pub fn new(loader: L, rng: R) -> Self {
        Self {
            loader,
            rng,
            observers: CheckObservers::new(),
            story: None,
            player: PlayerState::default(),
            pending: None,
        }
    }

    /// Use an existing observer registry.
    pub fn with_observers(mut self, observers: CheckObservers) -> Self {
        self.observers = observers;
        self
    }

    /// Register a stat-check listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&CheckEvent) + 'static) -> Subscription {
        self.observers.subscribe(listener)
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.observers.unsubscribe(subscription)
    }

    /// The story source.
    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// True while a story is loaded.
    pub fn is_running(&self) -> bool {
        self.story.is_some()
    }

    /// The task that `finish` will resolve, if any.
    pub fn pending_task(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.task_id.as_str())
    }

    /// Refresh the player snapshot predicates read from.
    pub fn sync_player(&mut self, player: &PlayerState) {
        self.player = player.clone();
    }

    /// Load `graph_id` for `task_id` and play up to the first choice.
    ///
    /// A load failure comes back as a single error frame and leaves nothing
    /// pending.
    pub fn begin(
        &mut self,
        task_id: &str,
        graph_id: &str,
        knot: Option<&str>,
        player: &PlayerState,
    ) -> Vec<NarrativeFrame> {
        self.sync_player(player);
        match self.loader.load(graph_id, knot) {
            Ok(mut story) => {
                tracing::debug!(task_id, graph_id, ?knot, "story started");
                story.set_variable("player_name", StoryValue::Str(player.name.clone()));
                story.set_variable("player_money", StoryValue::Int(player.vitals.money));
                self.story = Some(story);
                self.pending = Some(PendingResolve {
                    task_id: task_id.to_string(),
                    graph_id: graph_id.to_string(),
                });
                self.frames()
            }
            Err(err) => {
                tracing::warn!(task_id, graph_id, error = %err, "story failed to load");
                self.story = None;
                self.pending = None;
                vec![NarrativeFrame::error(&err)]
            }
        }
    }

    /// Continue the story until it offers choices or ends.
    ///
    /// A runtime failure ends the run and reports itself as an error frame.
    pub fn frames(&mut self) -> Vec<NarrativeFrame> {
        let Some(story) = self.story.as_mut() else {
            return Vec::new();
        };
        let mut host = BridgeHost {
            player: &self.player,
            rng: &mut self.rng,
            observers: &mut self.observers,
        };

        let mut frames = Vec::new();
        loop {
            match story.continue_line(&mut host) {
                Ok(Some(line)) => frames.push(NarrativeFrame::line(line)),
                Ok(None) => break,
                Err(err) => {
                    tracing::warn!(error = %err, "story failed while running");
                    frames.push(NarrativeFrame::error(&err));
                    self.story = None;
                    self.pending = None;
                    return frames;
                }
            }
        }

        let choices = story.choices();
        let finished = choices.is_empty();
        match frames.last_mut() {
            Some(last) => {
                last.choices = choices;
                last.finished = finished;
            }
            None => frames.push(NarrativeFrame {
                text: String::new(),
                choices,
                finished,
                error: false,
            }),
        }
        frames
    }

    /// Pick a choice and play on.
    pub fn choose(&mut self, index: usize) -> NarrativeResult<Vec<NarrativeFrame>> {
        let story = self.story.as_mut().ok_or(NarrativeError::NoActiveStory)?;
        story.choose(index)?;
        Ok(self.frames())
    }

    /// Read a variable of the running story.
    pub fn variable(&self, name: &str) -> Option<StoryValue> {
        self.story.as_ref().and_then(|s| s.variable(name))
    }

    /// Close the run and return the actions it produced, in dispatch order:
    /// stat deltas, skill deltas, outcome, then resolving the task.
    pub fn finish(&mut self) -> Vec<Action> {
        let pending = self.pending.take();
        let Some(story) = self.story.take() else {
            return Vec::new();
        };
        let read = |name: &str| {
            story
                .variable(&format!("{DELTA_PREFIX}{name}"))
                .and_then(|v| v.as_i64())
                .unwrap_or(0)
        };
        let small = |v: i64| v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;

        let mut actions = Vec::new();

        let delta = StatsDelta {
            health: small(read("health")),
            humanity: small(read("humanity")),
            stress: small(read("stress")),
            money: read("money"),
            looks: small(read("looks")),
        };
        if !delta.is_empty() {
            actions.push(Action::ApplyStatsDelta { delta });
        }

        let mut skills = SkillDeltas::default();
        for stat in MainStat::ALL {
            let v = small(read(stat.as_str()));
            if v != 0 {
                skills.skills.insert(stat, v);
            }
        }
        for skill in SubSkill::ALL {
            let v = small(read(skill.as_str()));
            if v != 0 {
                skills.sub_skills.insert(skill, v);
            }
        }
        if !skills.is_empty() {
            actions.push(Action::skill_deltas(skills));
        }

        match story.variable(OUTCOME_VAR) {
            None | Some(StoryValue::Null) => {}
            Some(tag) => match tag.to_string().parse::<OutcomeTier>() {
                Ok(outcome) => actions.push(Action::ApplyOutcome {
                    outcome,
                    task_graph_id: pending.as_ref().map(|p| p.graph_id.clone()),
                }),
                Err(err) => tracing::warn!(error = %err, "story set an unknown outcome"),
            },
        }

        if let Some(pending) = pending {
            actions.push(Action::ResolveTask {
                task_id: pending.task_id,
            });
        }
        tracing::debug!(actions = actions.len(), "story finished");
        actions
    }
}

impl<L, R> fmt::Debug for NarrativeBridge<L, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NarrativeBridge")
            .field("running", &self.story.is_some())
            .field("pending", &self.pending)
            .field("observers", &self.observers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use sw_core::Skills;
    use sw_mechanics::FixedRng;

    use super::*;
    use crate::script::{CompiledScript, ScriptLibrary};

    const FENCE: &str = r#"{
        "id": "fence",
        "knots": {
            "start": [
                { "op": "text", "text": "A fence eyes your bag, {player_name}." },
                { "op": "choices", "options": [
                    { "text": "Haggle", "goto": "haggle" },
                    { "text": "Bribe", "goto": "bribe" },
                    { "text": "Mumble", "goto": "mumble" }
                ]}
            ],
            "haggle": [
                { "op": "branch", "call": "stat_check", "args": ["persuasion", 12],
                  "then": "sold", "else": "stiffed" }
            ],
            "bribe": [
                { "op": "branch", "call": "has_money", "args": [200],
                  "then": "sold", "else": "stiffed" }
            ],
            "mumble": [
                { "op": "branch", "call": "stat_check", "args": ["mumbling", 1],
                  "then": "sold", "else": "stiffed" }
            ],
            "sold": [
                { "op": "text", "text": "Deal." },
                { "op": "add", "var": "delta_money", "amount": 80 },
                { "op": "add", "var": "delta_persuasion", "amount": 2 },
                { "op": "set", "var": "outcome", "value": "success" }
            ],
            "stiffed": [
                { "op": "text", "text": "No deal." },
                { "op": "add", "var": "delta_stress", "amount": 5 },
                { "op": "set", "var": "outcome", "value": "failure" }
            ]
        }
    }"#;

    fn library() -> ScriptLibrary {
        ScriptLibrary::new().with_script(CompiledScript::from_json(FENCE).unwrap())
    }

    fn player() -> PlayerState {
        let mut player = PlayerState::new("Vee");
        player.skills = Skills::uniform(3, 40);
        player.vitals.money = 50;
        player
    }

    fn transcript(frames: &[NarrativeFrame]) -> String {
        frames.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn load_failure_is_a_single_error_frame() {
        let mut bridge = NarrativeBridge::new(library(), FixedRng(0.5));
        let frames = bridge.begin("t1", "missing", None, &player());
        assert_eq!(frames.len(), 1);
        assert!(frames[0].error);
        assert!(frames[0].finished);
        assert!(!bridge.is_running());
        assert_eq!(bridge.pending_task(), None);
        assert!(bridge.finish().is_empty());
    }

    #[test]
    fn successful_check_produces_actions() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bridge = NarrativeBridge::new(library(), FixedRng(0.99));
        let sink = Rc::clone(&seen);
        bridge.subscribe(move |e| sink.borrow_mut().push(e.result.d20));

        let frames = bridge.begin("t1", "fence", None, &player());
        insta::assert_snapshot!(transcript(&frames), @r"
        A fence eyes your bag, Vee.
          [1] Haggle
          [2] Bribe
          [3] Mumble
        ");
        assert_eq!(bridge.pending_task(), Some("t1"));

        let frames = bridge.choose(0).unwrap();
        insta::assert_snapshot!(transcript(&frames), @r"
        Deal.
          (end)
        ");
        assert_eq!(*seen.borrow(), vec![20]);

        let actions = bridge.finish();
        assert_eq!(
            actions,
            vec![
                Action::ApplyStatsDelta {
                    delta: StatsDelta::money(80)
                },
                Action::ApplySkillDeltas {
                    skill_deltas: Default::default(),
                    sub_skill_deltas: [(SubSkill::Persuasion, 2)].into_iter().collect(),
                },
                Action::ApplyOutcome {
                    outcome: OutcomeTier::Success,
                    task_graph_id: Some("fence".into()),
                },
                Action::ResolveTask {
                    task_id: "t1".into()
                },
            ]
        );
        assert!(!bridge.is_running());
    }

    #[test]
    fn has_money_reads_the_snapshot() {
        let mut bridge = NarrativeBridge::new(library(), FixedRng(0.99));
        bridge.begin("t1", "fence", None, &player());
        let frames = bridge.choose(1).unwrap();
        assert_eq!(frames[0].text, "No deal.");
        let actions = bridge.finish();
        assert!(actions.contains(&Action::ApplyOutcome {
            outcome: OutcomeTier::Failure,
            task_graph_id: Some("fence".into()),
        }));
    }

    #[test]
    fn unknown_stat_fails_the_check_without_rolling() {
        let seen = Rc::new(RefCell::new(0));
        let mut bridge = NarrativeBridge::new(library(), FixedRng(0.99));
        let sink = Rc::clone(&seen);
        bridge.subscribe(move |_| *sink.borrow_mut() += 1);
        bridge.begin("t1", "fence", None, &player());
        let frames = bridge.choose(2).unwrap();
        assert_eq!(frames[0].text, "No deal.");
        assert_eq!(*seen.borrow(), 0);
    }

    #[test]
    fn unsubscribed_observers_are_silent() {
        let seen = Rc::new(RefCell::new(0));
        let mut bridge = NarrativeBridge::new(library(), FixedRng(0.99));
        let sink = Rc::clone(&seen);
        let handle = bridge.subscribe(move |_| *sink.borrow_mut() += 1);
        assert!(bridge.unsubscribe(handle));
        bridge.begin("t1", "fence", None, &player());
        bridge.choose(0).unwrap();
        assert_eq!(*seen.borrow(), 0);
    }

    #[test]
    fn choose_without_a_story() {
        let mut bridge = NarrativeBridge::new(library(), FixedRng(0.5));
        assert!(matches!(bridge.choose(0), Err(NarrativeError::NoActiveStory)));
    }

    #[test]
    fn bad_choice_keeps_the_story() {
        let mut bridge = NarrativeBridge::new(library(), FixedRng(0.5));
        bridge.begin("t1", "fence", None, &player());
        assert!(matches!(bridge.choose(9), Err(NarrativeError::InvalidChoice(9))));
        assert!(bridge.is_running());
    }
}
