//! In-engine narrative graphs walked by the reducer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::outcome::{OutcomeDefinition, OutcomeTier};
use crate::stats::StatRef;

/// A branching encounter made of nodes and choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskGraph {
    /// Unique identifier for this graph.
    pub id: String,
    /// Title shown when the encounter opens.
    pub title: String,
    /// Node the encounter starts at.
    pub entry_node_id: String,
    /// All nodes, keyed by id.
    pub nodes: BTreeMap<String, TaskNode>,
    /// Per-graph replacements for the global outcome table.
    #[serde(default)]
    pub outcome_overrides: BTreeMap<OutcomeTier, OutcomeDefinition>,
}

impl TaskGraph {
    /// Create an empty graph starting at `entry_node_id`.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        entry_node_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            entry_node_id: entry_node_id.into(),
            nodes: BTreeMap::new(),
            outcome_overrides: BTreeMap::new(),
        }
    }

    /// Add a node.
    pub fn with_node(mut self, node: TaskNode) -> Self {
        self.nodes.insert(node.id.clone(), node);
        self
    }

    /// Override what an outcome tier does inside this graph.
    pub fn with_override(mut self, tier: OutcomeTier, definition: OutcomeDefinition) -> Self {
        self.outcome_overrides.insert(tier, definition);
        self
    }

    /// Look up a node by id.
    pub fn node(&self, id: &str) -> Option<&TaskNode> {
        self.nodes.get(id)
    }

    /// The entry node, if it exists.
    pub fn entry(&self) -> Option<&TaskNode> {
        self.node(&self.entry_node_id)
    }

    /// Check that the entry node and every `next_node_id` resolve, and that
    /// every choice leads somewhere.
    pub fn validate(&self) -> CoreResult<()> {
        if self.entry().is_none() {
            return Err(CoreError::InvalidContent(format!(
                "graph \"{}\" has no entry node \"{}\"",
                self.id, self.entry_node_id
            )));
        }
        for node in self.nodes.values() {
            for choice in &node.choices {
                if let Some(next) = &choice.next_node_id {
                    if !self.nodes.contains_key(next) {
                        return Err(CoreError::InvalidContent(format!(
                            "graph \"{}\": choice \"{}\" points at missing node \"{next}\"",
                            self.id, choice.id
                        )));
                    }
                } else if choice.outcome.is_none() && choice.check.is_none() {
                    return Err(CoreError::InvalidContent(format!(
                        "graph \"{}\": choice \"{}\" leads nowhere",
                        self.id, choice.id
                    )));
                }
            }
        }
        Ok(())
    }
}

/// One beat of an encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskNode {
    /// Unique within the graph.
    pub id: String,
    /// Narration shown at this node.
    pub text: String,
    /// Choices offered at this node.
    #[serde(default)]
    pub choices: Vec<TaskChoice>,
}

impl TaskNode {
    /// Create a node with no choices.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            choices: Vec::new(),
        }
    }

    /// Add a choice.
    pub fn with_choice(mut self, choice: TaskChoice) -> Self {
        self.choices.push(choice);
        self
    }

    /// Look up a choice by id.
    pub fn choice(&self, id: &str) -> Option<&TaskChoice> {
        self.choices.iter().find(|c| c.id == id)
    }
}

/// A d20 check gating a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceCheck {
    /// Stat the check rolls against.
    pub stat: StatRef,
    /// Difficulty class.
    pub dc: i32,
}

/// A choice offered at a node. It either moves to another node, lands an
/// outcome, or rolls a check that picks the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskChoice {
    /// Id, unique within its node.
    pub id: String,
    /// Label shown to the player.
    pub text: String,
    /// Node to move to.
    #[serde(default)]
    pub next_node_id: Option<String>,
    /// Tier this choice lands directly.
    #[serde(default)]
    pub outcome: Option<OutcomeTier>,
    /// Check whose roll picks the tier.
    #[serde(default)]
    pub check: Option<ChoiceCheck>,
}

impl TaskChoice {
    /// A choice that does nothing until one of the builders below sets an effect.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            next_node_id: None,
            outcome: None,
            check: None,
        }
    }

    /// Move to `node_id`.
    pub fn goto(mut self, node_id: impl Into<String>) -> Self {
        self.next_node_id = Some(node_id.into());
        self
    }

    /// Land `tier`.
    pub fn outcome(mut self, tier: OutcomeTier) -> Self {
        self.outcome = Some(tier);
        self
    }

    /// Roll `stat` against `dc`.
    pub fn check(mut self, stat: StatRef, dc: i32) -> Self {
        self.check = Some(ChoiceCheck { stat, dc });
        self
    }
}
