use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::stats::{Skills, Vitals};

/// The id the player character always carries.
pub const PLAYER_ID: &str = "player";

/// The player character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Always [`PLAYER_ID`].
    pub id: String,
    /// Display name.
    pub name: String,
    /// Age in months; a year passes every twelve turns.
    pub age_months: u32,
    /// Health, humanity, stress, money and looks.
    pub vitals: Vitals,
    /// Main stats and subskills.
    pub skills: Skills,
    /// `None` until the player has been placed on the map.
    pub current_district: Option<String>,
    /// Free-form markers outcomes can set.
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new("Nobody")
    }
}

impl PlayerState {
    /// A fresh adult player with default vitals and untrained skills.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: PLAYER_ID.to_string(),
            name: name.into(),
            age_months: 18 * 12,
            vitals: Vitals::default(),
            skills: Skills::default(),
            current_district: None,
            tags: BTreeSet::new(),
        }
    }

    /// Age in whole years.
    pub fn age_years(&self) -> u32 {
        self.age_months / 12
    }
}

/// How an NPC came to exist, kept so it can be regenerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NpcOrigin {
    /// Rolled from a template.
    Template {
        /// The template rolled.
        template_id: String,
        /// Seed of the roll, when it was reproducible.
        seed: Option<u32>,
    },
    /// A hand-authored profile.
    Unique {
        /// The profile used.
        profile_id: String,
    },
}

/// A non-player character living in the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpcState {
    /// Unique id, `npc-` prefixed for rolled NPCs.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Portrait reference, if the template has one.
    #[serde(default)]
    pub avatar: Option<String>,
    /// Age in months.
    pub age_months: u32,
    /// Vitals rolled from the template.
    pub vitals: Vitals,
    /// Skills rolled from the template.
    pub skills: Skills,
    /// Home district id.
    #[serde(default)]
    pub district: Option<String>,
    /// Template and profile tags.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Affiliation ids this NPC belongs to.
    #[serde(default)]
    pub affiliations: Vec<String>,
    /// Where the NPC came from.
    pub origin: NpcOrigin,
}

impl NpcState {
    /// Returns the template id if this NPC was rolled from one.
    pub fn template_id(&self) -> Option<&str> {
        match &self.origin {
            NpcOrigin::Template { template_id, .. } => Some(template_id),
            NpcOrigin::Unique { .. } => None,
        }
    }

    /// Returns true if this NPC comes from a hand-authored profile.
    pub fn is_unique(&self) -> bool {
        matches!(self.origin, NpcOrigin::Unique { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_defaults() {
        let player = PlayerState::new("Vex");
        assert_eq!(player.id, PLAYER_ID);
        assert_eq!(player.age_years(), 18);
        assert!(player.current_district.is_none());
    }

    #[test]
    fn origin_serializes_with_kind_tag() {
        let origin = NpcOrigin::Unique {
            profile_id: "mama_rosa".into(),
        };
        let json = serde_json::to_string(&origin).unwrap();
        assert_eq!(json, r#"{"kind":"unique","profile_id":"mama_rosa"}"#);
    }
}
