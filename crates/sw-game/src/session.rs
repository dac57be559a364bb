//! Game session management.
//!
//! `GameSession` owns the one [`GameState`] of a playthrough together with
//! the content it reads, its config and its RNG. Every change goes through
//! [`GameSession::dispatch`]. A small text command interface on top drives
//! the session from a prompt, and an attached [`ScriptLibrary`] lets it play
//! scripted stories whose results come back as actions.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sw_core::{Action, ContentTables, GameState, PlayerState, Skills};
use sw_mechanics::{GameRng, make_rng, pick, resume_rng};
use sw_narrative::{NarrativeBridge, NarrativeFrame, ScriptLibrary, closest_match};
use sw_simulation::{GameDate, NpcGenOptions, TaskGenContext, generate_monthly_tasks, generate_npc_batch};

use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::journal::{export_log_markdown, export_log_text};
use crate::membership::rebuild_memberships;
use crate::reducer::{ReduceEnv, reduce, refresh_postings, seed_npc};

/// Bookkeeping about the session itself, not the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMeta {
    /// When the session was created.
    pub started_at: DateTime<Utc>,
    /// Seed of the reducer RNG, if reproducible.
    pub seed: Option<u32>,
    /// Actions run through [`GameSession::dispatch`].
    pub actions_dispatched: u64,
    /// Wire name of the last action.
    pub last_action: Option<String>,
    /// When the last action ran.
    pub last_action_at: Option<DateTime<Utc>>,
}

impl SessionMeta {
    fn new(seed: Option<u32>) -> Self {
        Self {
            started_at: Utc::now(),
            seed,
            actions_dispatched: 0,
            last_action: None,
            last_action_at: None,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    meta: SessionMeta,
    /// Older snapshots lack this; their RNG restarts from the seed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rng_position: Option<u32>,
    state: GameState,
}

/// Stories roll on their own stream so playing one does not shift the
/// reducer's rolls.
fn story_seed(seed: u32) -> u32 {
    seed.rotate_left(16) ^ 0x5bd1_e995
}

/// Build the month-zero state: the player placed in the start district,
/// a handful of NPCs, a job board, the first month's tasks and a headline.
pub fn create_initial_game_state<R: RngCore + ?Sized>(
    content: &ContentTables,
    config: &GameConfig,
    rng: &mut R,
) -> GameResult<GameState> {
    let districts = content.district_map();
    let start_name = districts
        .get(&config.start_district)
        .map(|d| d.name.clone())
        .ok_or_else(|| GameError::UnknownDistrict(config.start_district.clone()))?;

    let mut player = PlayerState::new(config.player_name.clone());
    player.vitals.money = config.start_money;
    player.skills = Skills::uniform(config.start_skills.0, config.start_skills.1);
    player.current_district = Some(config.start_district.clone());
    let player_id = player.id.clone();

    let mut state = GameState {
        player,
        districts,
        ..GameState::default()
    };
    rebuild_memberships(&mut state, content, &player_id);

    let gen_config = &config.generators;
    if !content.npc_templates.is_empty() {
        let opts = NpcGenOptions::default().with_uniques(gen_config.unique_chance);
        for npc in generate_npc_batch(content, gen_config.initial_npcs, &opts, rng)? {
            seed_npc(&mut state, npc);
        }
    }

    refresh_postings(&mut state, &ReduceEnv::new(content, gen_config), rng);
    let ctx = TaskGenContext::from_state(&state);
    state.tasks = generate_monthly_tasks(content, &ctx, gen_config, rng);

    state.push_log(format!("{} arrives in {start_name}.", state.player.name), None);
    if let Some(headline) = pick(rng, &content.headlines) {
        state.push_log(headline.clone(), None);
    }
    tracing::info!(
        player = %state.player.name,
        district = %config.start_district,
        npcs = state.npcs.len(),
        postings = state.job_postings.len(),
        "new game"
    );
    Ok(state)
}

/// An interactive game session.
pub struct GameSession {
    state: GameState,
    content: Arc<ContentTables>,
    config: GameConfig,
    rng: GameRng,
    meta: SessionMeta,
    stories: Option<NarrativeBridge<ScriptLibrary>>,
}

impl GameSession {
    /// Start a new game.
    pub fn new(content: Arc<ContentTables>, config: GameConfig) -> GameResult<Self> {
        let mut rng = make_rng(config.seed);
        let state = create_initial_game_state(&content, &config, &mut rng)?;
        Ok(Self {
            state,
            content,
            meta: SessionMeta::new(config.seed),
            config,
            rng,
            stories: None,
        })
    }

    /// Start a new game on the built-in content.
    pub fn builtin(config: GameConfig) -> GameResult<Self> {
        Self::new(Arc::new(ContentTables::builtin()), config)
    }

    /// Resume from a [`GameSession::to_json`] snapshot. A seeded RNG picks
    /// up where it was saved. Stories must be attached again.
    pub fn from_json(json: &str, content: Arc<ContentTables>, config: GameConfig) -> GameResult<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        Ok(Self {
            rng: resume_rng(snapshot.meta.seed, snapshot.rng_position),
            stories: None,
            state: snapshot.state,
            meta: snapshot.meta,
            content,
            config,
        })
    }

    /// Snapshot the session as JSON.
    pub fn to_json(&self) -> GameResult<String> {
        let snapshot = Snapshot {
            meta: self.meta.clone(),
            rng_position: self.rng.position(),
            state: self.state.clone(),
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    /// Attach scripted stories, enabling the `story` and `pick` commands.
    pub fn with_stories(mut self, library: ScriptLibrary) -> Self {
        let rng = make_rng(self.meta.seed.map(story_seed));
        self.stories = Some(NarrativeBridge::new(library, rng));
        self
    }

    /// The current game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// The content tables this session reads.
    pub fn content(&self) -> &ContentTables {
        &self.content
    }

    /// The settings the session was started with.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Session bookkeeping.
    pub fn meta(&self) -> &SessionMeta {
        &self.meta
    }

    /// Calendar date of the current month.
    pub fn date(&self) -> GameDate {
        self.config.calendar.date(self.state.month)
    }

    /// Run one action through the reducer.
    pub fn dispatch(&mut self, action: Action) -> &GameState {
        let span = tracing::debug_span!("dispatch", action = action.name(), month = self.state.month);
        let _guard = span.enter();

        let env = ReduceEnv::new(&self.content, &self.config.generators);
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, &action, &env, &mut self.rng);

        self.meta.actions_dispatched += 1;
        self.meta.last_action = Some(action.name().to_string());
        self.meta.last_action_at = Some(Utc::now());
        &self.state
    }

    /// Run several actions in order.
    pub fn dispatch_all(&mut self, actions: impl IntoIterator<Item = Action>) -> &GameState {
        for action in actions {
            self.dispatch(action);
        }
        &self.state
    }

    /// Close the running story and dispatch what it produced. Returns the
    /// log lines the actions added.
    pub fn finish_story(&mut self) -> String {
        let actions = self
            .stories
            .as_mut()
            .map(NarrativeBridge::finish)
            .unwrap_or_default();
        self.report_all(actions)
    }

    /// The whole journal as Markdown.
    pub fn export_markdown(&self) -> String {
        export_log_markdown(&self.state, &self.config.calendar)
    }

    /// The whole journal as plain text.
    pub fn export_text(&self) -> String {
        export_log_text(&self.state, &self.config.calendar)
    }

    // -----------------------------------------------------------------------
    // Text commands
    // -----------------------------------------------------------------------

    /// Process a line of user input and return a response.
    pub fn process(&mut self, input: &str) -> GameResult<String> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(String::new());
        }
        let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
        let cmd = parts[0].to_lowercase();
        let rest = parts.get(1).map(|s| s.trim()).unwrap_or("");

        match cmd.as_str() {
            "status" => Ok(self.do_status()),
            "tasks" => Ok(self.do_tasks()),
            "jobs" => Ok(self.do_jobs()),
            "take" => self.do_take(rest),
            "resign" => self.do_resign(rest),
            "go" | "travel" => self.do_go(rest),
            "start" => self.do_start(rest),
            "choose" => self.do_choose(rest),
            "run" => Ok(self
                .describe_run()
                .unwrap_or_else(|| "No task run is active.".to_string())),
            "resolve" => self.do_resolve(rest),
            "story" => self.do_story(rest),
            "pick" => self.do_pick(rest),
            "advance" | "next" => Ok(self.report(Action::AdvanceMonth)),
            "log" => Ok(self.do_log()),
            "export" => self.do_export(rest),
            "help" => Ok(HELP.to_string()),
            "quit" | "q" => Ok("Goodbye!".to_string()),
            other => Err(GameError::InvalidCommand(format!(
                "unknown command: {other} (try 'help')"
            ))),
        }
    }

    /// Dispatch and describe what changed: new log lines, then the active
    /// run if there is one.
    fn report(&mut self, action: Action) -> String {
        self.report_all([action])
    }

    fn report_all(&mut self, actions: impl IntoIterator<Item = Action>) -> String {
        let before = self.state.log.len();
        self.dispatch_all(actions);
        let mut lines: Vec<String> = self.state.log[before..]
            .iter()
            .map(|e| match &e.deltas {
                Some(d) if !d.is_empty() => format!("{} ({d})", e.text),
                _ => e.text.clone(),
            })
            .collect();
        if let Some(run) = self.describe_run() {
            lines.push(run);
        }
        if lines.is_empty() {
            "Nothing happens.".to_string()
        } else {
            lines.join("\n")
        }
    }

    /// The active run's current node and its choices.
    pub fn describe_run(&self) -> Option<String> {
        let run = self.state.active_task_run.as_ref()?;
        let graph = self.content.graph(&run.task_graph_id)?;
        let node = graph.node(&run.current_node_id)?;
        let mut out = format!("[{}] {}", graph.title, node.text);
        for choice in &node.choices {
            out.push_str(&format!("\n  {}: {}", choice.id, choice.text));
        }
        Some(out)
    }

    fn do_status(&self) -> String {
        let player = &self.state.player;
        let v = &player.vitals;
        let district = self
            .state
            .current_district()
            .map_or("nowhere", |d| d.name.as_str());
        let jobs: Vec<String> = self
            .state
            .player_job_ids()
            .iter()
            .map(|id| self.content.job(id).map_or(id.clone(), |j| j.title.clone()))
            .collect();
        format!(
            "{} | {} | {}, age {}\nHealth {}  Humanity {}  Stress {}  Looks {}  Money ${}\nJobs: {}",
            self.date(),
            district,
            player.name,
            player.age_years(),
            v.health,
            v.humanity,
            v.stress,
            v.looks,
            v.money,
            if jobs.is_empty() { "none".to_string() } else { jobs.join(", ") }
        )
    }

    fn do_tasks(&self) -> String {
        let open: Vec<String> = self
            .state
            .unresolved_tasks()
            .map(|t| {
                let story = if t.task_graph_id.is_some() { " (story)" } else { "" };
                format!("  {}  [{}] {}{story}", t.id, t.kind, t.title)
            })
            .collect();
        if open.is_empty() {
            "No open tasks.".to_string()
        } else {
            format!("Open tasks ({}):\n{}", open.len(), open.join("\n"))
        }
    }

    fn do_jobs(&self) -> String {
        let open: Vec<String> = self
            .state
            .open_postings()
            .map(|p| {
                let employer = p
                    .affiliation_id
                    .as_deref()
                    .map_or("independent", |a| self.content.affiliation_name(a));
                format!("  {}  {} @ {}  ${}", p.id, p.title, employer, p.salary)
            })
            .collect();
        if open.is_empty() {
            "No open postings.".to_string()
        } else {
            format!("Open postings ({}):\n{}", open.len(), open.join("\n"))
        }
    }

    fn do_take(&mut self, rest: &str) -> GameResult<String> {
        let mut words = rest.split_whitespace();
        let Some(instance_id) = words.next() else {
            return Err(usage("take <posting id> [replace]"));
        };
        if !self.state.job_postings.contains_key(instance_id) {
            return Err(GameError::InvalidCommand(format!("no posting \"{instance_id}\"")));
        }
        let replace_career = words.next().is_some_and(|w| w.eq_ignore_ascii_case("replace"));
        Ok(self.report(Action::TakeJobInstance {
            instance_id: instance_id.to_string(),
            replace_career,
        }))
    }

    fn do_resign(&mut self, rest: &str) -> GameResult<String> {
        if rest.is_empty() {
            return Err(usage("resign <job id>"));
        }
        Ok(self.report(Action::RemoveJobAssignment {
            job_id: rest.to_string(),
        }))
    }

    fn do_go(&mut self, rest: &str) -> GameResult<String> {
        if rest.is_empty() {
            return Err(usage("go <district>"));
        }
        let district_id = self.find_district(rest)?;
        Ok(self.report(Action::SetPlayerDistrict { district_id }))
    }

    /// Match a district by id or name, case-insensitively.
    fn find_district(&self, input: &str) -> GameResult<String> {
        let found = self
            .state
            .districts
            .values()
            .find(|d| d.id.eq_ignore_ascii_case(input) || d.name.eq_ignore_ascii_case(input));
        if let Some(district) = found {
            return Ok(district.id.clone());
        }
        let names = self.state.districts.keys().map(String::as_str);
        match closest_match(input, names) {
            Some(suggestion) => Err(GameError::InvalidCommand(format!(
                "unknown district \"{input}\" (did you mean \"{suggestion}\"?)"
            ))),
            None => Err(GameError::UnknownDistrict(input.to_string())),
        }
    }

    fn do_start(&mut self, rest: &str) -> GameResult<String> {
        let task = self
            .state
            .task(rest)
            .ok_or_else(|| GameError::UnknownTask(rest.to_string()))?;
        let Some(graph_id) = task.task_graph_id.clone() else {
            return Err(GameError::InvalidCommand(format!("task \"{rest}\" has no story")));
        };
        Ok(self.report(Action::StartTaskRun {
            task_id: rest.to_string(),
            task_graph_id: graph_id,
        }))
    }

    fn do_choose(&mut self, rest: &str) -> GameResult<String> {
        if self.state.active_task_run.is_none() {
            return Err(GameError::NoActiveRun);
        }
        if rest.is_empty() {
            return Err(usage("choose <choice id>"));
        }
        Ok(self.report(Action::MakeTaskChoice {
            choice_id: rest.to_string(),
        }))
    }

    fn do_resolve(&mut self, rest: &str) -> GameResult<String> {
        if self.state.task(rest).is_none() {
            return Err(GameError::UnknownTask(rest.to_string()));
        }
        Ok(self.report(Action::ResolveTask {
            task_id: rest.to_string(),
        }))
    }

    fn do_story(&mut self, rest: &str) -> GameResult<String> {
        let task = self
            .state
            .task(rest)
            .ok_or_else(|| GameError::UnknownTask(rest.to_string()))?;
        if task.resolved {
            return Err(GameError::InvalidCommand(format!("task \"{rest}\" is already resolved")));
        }
        let Some(graph_id) = task.task_graph_id.clone() else {
            return Err(GameError::InvalidCommand(format!("task \"{rest}\" has no story")));
        };
        let bridge = self.stories.as_mut().ok_or(GameError::NoStories)?;
        let frames = bridge.begin(rest, &graph_id, None, &self.state.player);
        Ok(self.play_frames(&frames))
    }

    fn do_pick(&mut self, rest: &str) -> GameResult<String> {
        let index = rest
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| usage("pick <number>"))?;
        let bridge = self.stories.as_mut().ok_or(GameError::NoStories)?;
        let frames = bridge.choose(index - 1)?;
        Ok(self.play_frames(&frames))
    }

    /// Show story frames; once the story ends, dispatch its results too.
    fn play_frames(&mut self, frames: &[NarrativeFrame]) -> String {
        let mut lines: Vec<String> = frames.iter().map(ToString::to_string).collect();
        let ended = frames.last().is_some_and(|f| f.finished);
        let running = self.stories.as_ref().is_some_and(NarrativeBridge::is_running);
        if ended && running {
            lines.push(self.finish_story());
        }
        lines.join("\n")
    }

    fn do_log(&self) -> String {
        let lines: Vec<&str> = self
            .state
            .log_for_month(self.state.month)
            .map(|e| e.text.as_str())
            .collect();
        if lines.is_empty() {
            "Nothing logged this month.".to_string()
        } else {
            lines.join("\n")
        }
    }

    fn do_export(&self, rest: &str) -> GameResult<String> {
        match rest.to_lowercase().as_str() {
            "" | "markdown" | "md" => Ok(self.export_markdown()),
            "text" | "txt" => Ok(self.export_text()),
            other => Err(GameError::InvalidCommand(format!(
                "unknown export format: {other} (markdown, text)"
            ))),
        }
    }
}

fn usage(text: &str) -> GameError {
    GameError::InvalidCommand(format!("usage: {text}"))
}

const HELP: &str = "\
Commands:
  status                 where you are and how you're doing
  tasks                  open tasks this month
  jobs                   open job postings
  take <posting> [replace]  take a posting (replace: leave your other jobs in that career)
  resign <job>           quit a job
  go <district>          travel (encounters may happen on the way)
  start <task>           play a task's story
  choose <choice>        pick a choice in the active story
  run                    show the active story
  resolve <task>         mark a task done
  story <task>           play a task's scripted story
  pick <n>               pick a numbered option in the scripted story
  advance                end the month
  log                    this month's log
  export [markdown|text] the whole journal
  quit                   leave";
