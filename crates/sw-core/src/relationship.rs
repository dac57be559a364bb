use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Sentinel affiliation for members who work for nobody.
pub const NO_AFFILIATION: &str = "no_affiliation";

/// Strength of a freshly made connection.
pub const DEFAULT_RELATIONSHIP_STRENGTH: i32 = 30;

/// Key of the relationship between `a` and `b`.
pub fn relationship_id(a: &str, b: &str) -> String {
    format!("{a}__{b}")
}

/// Key of the membership of `member_id` in `affiliation_id`.
pub fn membership_id(affiliation_id: &str, member_id: &str) -> String {
    format!("{affiliation_id}__{member_id}")
}

/// A social tie between two characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Row key, see [`relationship_id`].
    pub id: String,
    /// One end.
    pub a: String,
    /// The other end.
    pub b: String,
    /// 0..=100.
    pub strength: i32,
    /// Descriptive tags.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// When false, only `a` to `b` counts.
    pub bidirectional: bool,
}

impl Relationship {
    /// A bidirectional tie from `a` to `b`.
    pub fn new(a: impl Into<String>, b: impl Into<String>, strength: i32) -> Self {
        let a = a.into();
        let b = b.into();
        Self {
            id: relationship_id(&a, &b),
            a,
            b,
            strength: strength.clamp(0, 100),
            tags: BTreeSet::new(),
            bidirectional: true,
        }
    }

    /// Returns true if this tie connects `x` and `y`, honouring direction.
    pub fn connects(&self, x: &str, y: &str) -> bool {
        (self.a == x && self.b == y) || (self.bidirectional && self.a == y && self.b == x)
    }

    /// Returns the other end of the tie, if `id` is one end of it.
    pub fn other(&self, id: &str) -> Option<&str> {
        if self.a == id {
            Some(&self.b)
        } else if self.b == id {
            Some(&self.a)
        } else {
            None
        }
    }
}

/// A member's standing with an affiliation. Derived from job assignments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    /// Row key, see [`membership_id`].
    pub id: String,
    /// The affiliation.
    pub affiliation_id: String,
    /// Player or NPC id.
    pub member_id: String,
    /// Standing, -100..=100.
    pub reputation: i32,
}

impl Membership {
    /// A membership row keyed by [`membership_id`].
    pub fn new(
        affiliation_id: impl Into<String>,
        member_id: impl Into<String>,
        reputation: i32,
    ) -> Self {
        let affiliation_id = affiliation_id.into();
        let member_id = member_id.into();
        Self {
            id: membership_id(&affiliation_id, &member_id),
            affiliation_id,
            member_id,
            reputation,
        }
    }

    /// Returns true for the sentinel "works for nobody" row.
    pub fn is_sentinel(&self) -> bool {
        self.affiliation_id == NO_AFFILIATION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bidirectional_tie_connects_both_ways() {
        let tie = Relationship::new("player", "npc-1", 30);
        assert_eq!(tie.id, "player__npc-1");
        assert!(tie.connects("player", "npc-1"));
        assert!(tie.connects("npc-1", "player"));
        assert_eq!(tie.other("npc-1"), Some("player"));
        assert_eq!(tie.other("stranger"), None);
    }

    #[test]
    fn one_way_tie() {
        let mut tie = Relationship::new("player", "npc-1", 30);
        tie.bidirectional = false;
        assert!(!tie.connects("npc-1", "player"));
    }

    #[test]
    fn strength_is_clamped() {
        assert_eq!(Relationship::new("a", "b", 140).strength, 100);
    }

    #[test]
    fn membership_key_and_sentinel() {
        let row = Membership::new(NO_AFFILIATION, "player", 0);
        assert_eq!(row.id, "no_affiliation__player");
        assert!(row.is_sentinel());
    }
}
