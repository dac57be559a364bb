use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A city district: a node in the travel graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictState {
    /// Stable id, e.g. `midlands`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// 0..=100, higher is safer.
    pub security: i32,
    /// 0..=100, higher is rowdier.
    pub unrest: i32,
    /// 0..=100, higher is wealthier.
    pub economy: i32,
    /// Descriptive tags used for weighting generators.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Ids of districts reachable in one hop.
    #[serde(default)]
    pub adjacent: Vec<String>,
}

impl DistrictState {
    /// A district with middling scalars and no tags or neighbors.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            security: 50,
            unrest: 50,
            economy: 50,
            tags: BTreeSet::new(),
            adjacent: Vec::new(),
        }
    }

    /// Set security, unrest and economy.
    pub fn with_scalars(mut self, security: i32, unrest: i32, economy: i32) -> Self {
        self.security = security;
        self.unrest = unrest;
        self.economy = economy;
        self
    }

    /// Replace the tag set.
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Replace the neighbor list.
    pub fn with_adjacent(mut self, ids: &[&str]) -> Self {
        self.adjacent = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    /// Number of tags shared with `other`.
    pub fn shared_tags(&self, other: &BTreeSet<String>) -> usize {
        self.tags.intersection(other).count()
    }
}
