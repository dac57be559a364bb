//! A small JSON story format that plays through [`StoryEngine`].
//!
//! A script is a set of named knots, each a list of steps. Text steps emit a
//! line; `choices` pauses until the player picks; `branch` asks the host a
//! yes/no question and jumps on the answer. Text may interpolate variables
//! with `{name}`.
//!
//! ```json
//! {
//!   "id": "fence",
//!   "knots": {
//!     "start": [
//!       { "op": "text", "text": "A fence eyes your bag." },
//!       { "op": "choices", "options": [
//!         { "text": "Haggle", "goto": "haggle" },
//!         { "text": "Walk away", "goto": "leave" }
//!       ]}
//!     ],
//!     "haggle": [
//!       { "op": "branch", "call": "stat_check", "args": ["persuasion", 12],
//!         "then": "sold", "else": "leave" }
//!     ],
//!     "sold": [
//!       { "op": "add", "var": "delta_money", "amount": 80 },
//!       { "op": "set", "var": "outcome", "value": "success" },
//!       { "op": "end" }
//!     ],
//!     "leave": [ { "op": "end" } ]
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::{StoryChoice, StoryEngine, StoryHost, StoryLoader, StoryValue};
use crate::error::{NarrativeError, NarrativeResult};

/// Knot a story starts in when none is named.
pub const DEFAULT_KNOT: &str = "start";

/// Steps one `continue_line` call may run before giving up.
const STEP_LIMIT: usize = 10_000;

/// A compiled story: knots of steps plus initial variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledScript {
    /// Story id the loader finds it by.
    pub id: String,
    /// Named step lists.
    pub knots: BTreeMap<String, Vec<Step>>,
    /// Variables set before the first step.
    #[serde(default)]
    pub variables: BTreeMap<String, StoryValue>,
}

impl CompiledScript {
    /// Parse a script and check its jumps.
    pub fn from_json(json: &str) -> NarrativeResult<Self> {
        let script: Self = serde_json::from_str(json)?;
        script.validate()?;
        Ok(script)
    }

    /// Every jump target must name a knot.
    pub fn validate(&self) -> NarrativeResult<()> {
        for steps in self.knots.values() {
            for step in steps {
                for target in step.targets() {
                    if !self.knots.contains_key(target) {
                        return Err(NarrativeError::UnknownKnot(target.to_string()));
                    }
                }
            }
        }
        Ok(())
    }
}

/// One instruction in a knot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Emit a line of text.
    Text {
        /// The line; `{name}` is replaced by the variable's value.
        text: String,
    },
    /// Assign a variable.
    Set {
        /// Variable name.
        var: String,
        /// New value.
        value: StoryValue,
    },
    /// Add to a numeric variable, treating a missing one as zero.
    Add {
        /// Variable name.
        var: String,
        /// Amount to add.
        amount: i64,
    },
    /// Call out to the host and jump on the answer.
    Branch {
        /// Host function name.
        call: String,
        /// Arguments passed to the host.
        #[serde(default)]
        args: Vec<StoryValue>,
        /// Knot to jump to on a truthy answer.
        then: String,
        /// Knot to jump to otherwise; without one the story carries on.
        #[serde(rename = "else", default)]
        otherwise: Option<String>,
    },
    /// Offer choices and pause.
    Choices {
        /// The options, in display order.
        options: Vec<ScriptChoice>,
    },
    /// Jump to another knot.
    Goto {
        /// Target knot.
        knot: String,
    },
    /// Stop the story.
    End,
}

impl Step {
    fn targets(&self) -> Vec<&str> {
        match self {
            Self::Branch {
                then, otherwise, ..
            } => std::iter::once(then.as_str())
                .chain(otherwise.as_deref())
                .collect(),
            Self::Choices { options } => options.iter().map(|o| o.goto.as_str()).collect(),
            Self::Goto { knot } => vec![knot.as_str()],
            _ => Vec::new(),
        }
    }
}

/// A choice option inside a `choices` step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptChoice {
    /// Label shown to the player.
    pub text: String,
    /// Knot to jump to.
    pub goto: String,
}

// ---------------------------------------------------------------------------
// Runtime
// ---------------------------------------------------------------------------

/// A running [`CompiledScript`].
#[derive(Debug, Clone)]
pub struct ScriptStory {
    script: CompiledScript,
    variables: BTreeMap<String, StoryValue>,
    knot: String,
    pc: usize,
    pending: Option<Vec<ScriptChoice>>,
    ended: bool,
}

impl ScriptStory {
    /// Start `script` at `knot`, or at [`DEFAULT_KNOT`].
    pub fn start(script: CompiledScript, knot: Option<&str>) -> NarrativeResult<Self> {
        let knot = knot.unwrap_or(DEFAULT_KNOT);
        if !script.knots.contains_key(knot) {
            return Err(NarrativeError::UnknownKnot(knot.to_string()));
        }
        Ok(Self {
            variables: script.variables.clone(),
            knot: knot.to_string(),
            script,
            pc: 0,
            pending: None,
            ended: false,
        })
    }

    /// Id of the script being played.
    pub fn id(&self) -> &str {
        &self.script.id
    }

    /// True once the story reached an `end` step or ran out of steps.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    fn jump(&mut self, knot: &str) -> NarrativeResult<()> {
        if !self.script.knots.contains_key(knot) {
            return Err(NarrativeError::UnknownKnot(knot.to_string()));
        }
        self.knot = knot.to_string();
        self.pc = 0;
        Ok(())
    }

    fn interpolate(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) => {
                    let name = &after[..close];
                    match self.variables.get(name) {
                        Some(value) => out.push_str(&value.to_string()),
                        None => {
                            out.push('{');
                            out.push_str(name);
                            out.push('}');
                        }
                    }
                    rest = &after[close + 1..];
                }
                None => {
                    out.push_str(&rest[open..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}

impl StoryEngine for ScriptStory {
    fn continue_line(&mut self, host: &mut dyn StoryHost) -> NarrativeResult<Option<String>> {
        if self.ended || self.pending.is_some() {
            return Ok(None);
        }
        for _ in 0..STEP_LIMIT {
            let step = self
                .script
                .knots
                .get(&self.knot)
                .and_then(|steps| steps.get(self.pc))
                .cloned();
            let Some(step) = step else {
                // Falling off the end of a knot ends the story.
                self.ended = true;
                return Ok(None);
            };
            self.pc += 1;
            match step {
                Step::Text { text } => return Ok(Some(self.interpolate(&text))),
                Step::Set { var, value } => {
                    self.variables.insert(var, value);
                }
                Step::Add { var, amount } => {
                    let current = self.variables.get(&var).and_then(StoryValue::as_i64).unwrap_or(0);
                    self.variables.insert(var, StoryValue::Int(current.saturating_add(amount)));
                }
                Step::Branch {
                    call,
                    args,
                    then,
                    otherwise,
                } => {
                    if host.call(&call, &args).is_truthy() {
                        self.jump(&then)?;
                    } else if let Some(knot) = otherwise {
                        self.jump(&knot)?;
                    }
                }
                Step::Choices { options } => {
                    if options.is_empty() {
                        continue;
                    }
                    self.pending = Some(options);
                    return Ok(None);
                }
                Step::Goto { knot } => self.jump(&knot)?,
                Step::End => {
                    self.ended = true;
                    return Ok(None);
                }
            }
        }
        Err(NarrativeError::Runaway {
            knot: self.knot.clone(),
        })
    }

    fn choices(&self) -> Vec<StoryChoice> {
        self.pending
            .iter()
            .flatten()
            .enumerate()
            .map(|(index, option)| StoryChoice {
                index,
                text: self.interpolate(&option.text),
            })
            .collect()
    }

    fn choose(&mut self, index: usize) -> NarrativeResult<()> {
        let target = self
            .pending
            .as_ref()
            .and_then(|options| options.get(index))
            .map(|option| option.goto.clone())
            .ok_or(NarrativeError::InvalidChoice(index))?;
        self.pending = None;
        self.jump(&target)
    }

    fn variable(&self, name: &str) -> Option<StoryValue> {
        self.variables.get(name).cloned()
    }

    fn set_variable(&mut self, name: &str, value: StoryValue) {
        self.variables.insert(name.to_string(), value);
    }
}

// ---------------------------------------------------------------------------
// Library
// ---------------------------------------------------------------------------

/// Compiled scripts keyed by story id.
#[derive(Debug, Clone, Default)]
pub struct ScriptLibrary {
    scripts: BTreeMap<String, CompiledScript>,
}

impl ScriptLibrary {
    /// An empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a script under its id.
    pub fn insert(&mut self, script: CompiledScript) {
        self.scripts.insert(script.id.clone(), script);
    }

    /// Builder form of [`ScriptLibrary::insert`].
    pub fn with_script(mut self, script: CompiledScript) -> Self {
        self.insert(script);
        self
    }

    /// Load every `*.json` file in `dir` as a script.
    pub fn from_dir(dir: &Path) -> NarrativeResult<Self> {
        let mut library = Self::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let script = CompiledScript::from_json(&std::fs::read_to_string(&path)?)?;
            tracing::debug!(story = %script.id, path = %path.display(), "loaded story script");
            library.insert(script);
        }
        Ok(library)
    }

    /// Story ids, sorted.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.scripts.keys().map(String::as_str)
    }

    /// Number of scripts.
    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    /// True when no scripts are loaded.
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

impl StoryLoader for ScriptLibrary {
    fn load(&self, story_id: &str, knot: Option<&str>) -> NarrativeResult<Box<dyn StoryEngine>> {
        let script = self
            .scripts
            .get(story_id)
            .cloned()
            .ok_or_else(|| NarrativeError::UnknownStory(story_id.to_string()))?;
        Ok(Box::new(ScriptStory::start(script, knot)?))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::engine::NoHost;

    const FENCE: &str = r#"{
        "id": "fence",
        "variables": { "name": "Vee" },
        "knots": {
            "start": [
                { "op": "text", "text": "A fence eyes your bag, {name}." },
                { "op": "text", "text": "Second line." },
                { "op": "choices", "options": [
                    { "text": "Haggle", "goto": "haggle" },
                    { "text": "Walk away", "goto": "leave" }
                ]}
            ],
            "haggle": [
                { "op": "branch", "call": "stat_check", "args": ["persuasion", 12],
                  "then": "sold", "else": "leave" }
            ],
            "sold": [
                { "op": "text", "text": "Deal." },
                { "op": "add", "var": "delta_money", "amount": 80 },
                { "op": "add", "var": "delta_money", "amount": 20 },
                { "op": "set", "var": "outcome", "value": "success" },
                { "op": "end" }
            ],
            "leave": [ { "op": "text", "text": "You leave." } ]
        }
    }"#;

    struct Always(bool);

    impl StoryHost for Always {
        fn call(&mut self, _name: &str, _args: &[StoryValue]) -> StoryValue {
            StoryValue::Bool(self.0)
        }
    }

    fn drain(story: &mut ScriptStory, host: &mut dyn StoryHost) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(line) = story.continue_line(host).unwrap() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn plays_until_choices_then_branches() {
        let script = CompiledScript::from_json(FENCE).unwrap();
        let mut story = ScriptStory::start(script, None).unwrap();
        let lines = drain(&mut story, &mut NoHost);
        assert_eq!(lines, vec!["A fence eyes your bag, Vee.", "Second line."]);
        let choices = story.choices();
        assert_eq!(choices.len(), 2);
        assert_eq!(choices[1].text, "Walk away");

        story.choose(0).unwrap();
        let lines = drain(&mut story, &mut Always(true));
        assert_eq!(lines, vec!["Deal."]);
        assert!(story.is_ended());
        assert!(story.choices().is_empty());
        assert_eq!(story.variable("delta_money"), Some(StoryValue::Int(100)));
        assert_eq!(story.variable("outcome"), Some(StoryValue::from("success")));
    }

    #[test]
    fn failed_branch_takes_else() {
        let script = CompiledScript::from_json(FENCE).unwrap();
        let mut story = ScriptStory::start(script, Some("haggle")).unwrap();
        let lines = drain(&mut story, &mut Always(false));
        assert_eq!(lines, vec!["You leave."]);
        assert!(story.is_ended());
        assert_eq!(story.variable("delta_money"), None);
    }

    #[test]
    fn invalid_choice_is_rejected() {
        let script = CompiledScript::from_json(FENCE).unwrap();
        let mut story = ScriptStory::start(script, None).unwrap();
        drain(&mut story, &mut NoHost);
        assert!(matches!(story.choose(5), Err(NarrativeError::InvalidChoice(5))));
        // still waiting on the same choices
        assert_eq!(story.choices().len(), 2);
    }

    #[test]
    fn unknown_entry_knot() {
        let script = CompiledScript::from_json(FENCE).unwrap();
        let err = ScriptStory::start(script, Some("nowhere")).unwrap_err();
        assert!(matches!(err, NarrativeError::UnknownKnot(k) if k == "nowhere"));
    }

    #[test]
    fn dangling_jump_fails_validation() {
        let json = r#"{ "id": "bad", "knots": { "start": [ { "op": "goto", "knot": "void" } ] } }"#;
        assert!(matches!(
            CompiledScript::from_json(json),
            Err(NarrativeError::UnknownKnot(_))
        ));
    }

    #[test]
    fn endless_loop_is_stopped() {
        let json = r#"{ "id": "loop", "knots": { "start": [ { "op": "goto", "knot": "start" } ] } }"#;
        let script = CompiledScript::from_json(json).unwrap();
        let mut story = ScriptStory::start(script, None).unwrap();
        assert!(matches!(
            story.continue_line(&mut NoHost),
            Err(NarrativeError::Runaway { .. })
        ));
    }

    #[test]
    fn unknown_placeholders_are_left_alone() {
        let json = r#"{ "id": "p", "knots": { "start": [ { "op": "text", "text": "{missing} and {" } ] } }"#;
        let script = CompiledScript::from_json(json).unwrap();
        let mut story = ScriptStory::start(script, None).unwrap();
        assert_eq!(
            story.continue_line(&mut NoHost).unwrap().as_deref(),
            Some("{missing} and {")
        );
    }

    #[test]
    fn library_loads_by_id() {
        let library = ScriptLibrary::new().with_script(CompiledScript::from_json(FENCE).unwrap());
        assert!(library.load("fence", None).is_ok());
        assert!(matches!(
            library.load("ghost", None).err(),
            Some(NarrativeError::UnknownStory(_))
        ));
    }

    #[test]
    fn library_reads_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("fence.json"), FENCE).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let library = ScriptLibrary::from_dir(dir.path()).unwrap();
        assert_eq!(library.ids().collect::<Vec<_>>(), vec!["fence"]);
    }

    proptest! {
        #[test]
        fn text_without_known_placeholders_passes_through(text in "[a-z {}]{0,40}") {
            let script = CompiledScript {
                id: "p".into(),
                knots: [("start".to_string(), vec![Step::Text { text: text.clone() }])]
                    .into_iter()
                    .collect(),
                variables: BTreeMap::new(),
            };
            let mut story = ScriptStory::start(script, None).unwrap();
            prop_assert_eq!(story.continue_line(&mut NoHost).unwrap(), Some(text));
        }

        #[test]
        fn adds_accumulate(amounts in proptest::collection::vec(-100i64..100, 0..10)) {
            let steps = amounts
                .iter()
                .map(|amount| Step::Add { var: "n".into(), amount: *amount })
                .collect();
            let script = CompiledScript {
                id: "sum".into(),
                knots: [("start".to_string(), steps)].into_iter().collect(),
                variables: BTreeMap::new(),
            };
            let mut story = ScriptStory::start(script, None).unwrap();
            prop_assert_eq!(story.continue_line(&mut NoHost).unwrap(), None);
            let expected = if amounts.is_empty() { None } else { Some(StoryValue::Int(amounts.iter().sum())) };
            prop_assert_eq!(story.variable("n"), expected);
        }
    }
}
