//! Outcome tiers and the effects they carry.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::stats::{SkillDeltas, StatsDelta};

/// How well a narrative encounter went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeTier {
    /// A natural 20 or a scripted best case.
    GreatSuccess,
    /// The check passed.
    Success,
    /// The check missed.
    Failure,
    /// A natural 1 or a scripted worst case.
    GreatFailure,
}

impl OutcomeTier {
    /// All tiers, best first.
    pub const ALL: [OutcomeTier; 4] = [
        Self::GreatSuccess,
        Self::Success,
        Self::Failure,
        Self::GreatFailure,
    ];

    /// The snake_case tag used by stories and content.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GreatSuccess => "great_success",
            Self::Success => "success",
            Self::Failure => "failure",
            Self::GreatFailure => "great_failure",
        }
    }

    /// Returns true for the two success tiers.
    pub fn is_success(self) -> bool {
        matches!(self, Self::GreatSuccess | Self::Success)
    }
}

impl fmt::Display for OutcomeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OutcomeTier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|tier| tier.as_str() == needle)
            .ok_or_else(|| CoreError::UnknownOutcome(s.to_string()))
    }
}

/// A single state change carried by an outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Adjust the player's vitals.
    Stats {
        /// Added to the vitals, then clamped.
        delta: StatsDelta,
    },
    /// Adjust the player's stats and subskills.
    Skills {
        /// Added to the skills, then clamped.
        deltas: SkillDeltas,
    },
    /// Mark the world with a tag.
    AddWorldTag {
        /// The tag to add.
        tag: String,
    },
    /// Clear a world tag.
    RemoveWorldTag {
        /// The tag to remove.
        tag: String,
    },
    /// Mark the player with a tag.
    AddPlayerTag {
        /// The tag to add.
        tag: String,
    },
    /// Shift the player's reputation with an affiliation they belong to.
    Reputation {
        /// The affiliation.
        affiliation_id: String,
        /// Reputation change, clamped to the range afterwards.
        delta: i32,
    },
    /// Shift the strength of the player's tie to an NPC.
    Relationship {
        /// The other end of the tie.
        npc_id: String,
        /// Strength change, clamped to 0..=100 afterwards.
        delta: i32,
    },
}

/// What an outcome tier does and how the log describes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeDefinition {
    /// Applied in order.
    #[serde(default)]
    pub effects: Vec<Effect>,
    /// One of these lines is logged when the outcome lands.
    #[serde(default)]
    pub flavor: Vec<String>,
}

impl OutcomeDefinition {
    /// An outcome with no effects or flavor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an effect.
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Append a flavor line.
    pub fn with_flavor(mut self, line: impl Into<String>) -> Self {
        self.flavor.push(line.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_parses_loosely() {
        assert_eq!(
            "Great Success".parse::<OutcomeTier>().unwrap(),
            OutcomeTier::GreatSuccess
        );
        assert_eq!(
            "great-failure".parse::<OutcomeTier>().unwrap(),
            OutcomeTier::GreatFailure
        );
        assert!("meh".parse::<OutcomeTier>().is_err());
    }

    #[test]
    fn effect_json_shape() {
        let effect = Effect::Reputation {
            affiliation_id: "iron_union".into(),
            delta: 5,
        };
        let json = serde_json::to_string(&effect).unwrap();
        assert_eq!(
            json,
            r#"{"type":"reputation","affiliation_id":"iron_union","delta":5}"#
        );
    }
}
