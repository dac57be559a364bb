//! Static definitions the generators and reducer read by id.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::stats::{MainStat, Skills, SubSkill, Vitals};
use crate::task::TaskKind;

/// A job as authored, before a posting is rolled from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobTemplate {
    /// Stable id, unique across careers.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Monthly pay before jitter.
    pub base_salary: i64,
    /// Tags copied onto rolled postings.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Board blurb.
    #[serde(default)]
    pub description: String,
}

impl JobTemplate {
    /// A template with no tags or description.
    pub fn new(id: &str, title: &str, base_salary: i64) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            base_salary,
            tags: BTreeSet::new(),
            description: String::new(),
        }
    }

    /// Replace the tag set.
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Set the board blurb.
    pub fn with_description(mut self, text: &str) -> Self {
        self.description = text.to_string();
        self
    }
}

/// A career tree: related jobs sharing a set of employers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Career {
    /// Stable id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Affiliations that hire for this career. Empty means freelance.
    #[serde(default)]
    pub affiliation_ids: Vec<String>,
    /// Job ladder, lowest rung first.
    pub jobs: Vec<JobTemplate>,
}

/// An organization characters can belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affiliation {
    /// Stable id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Descriptive tags.
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl Affiliation {
    /// An affiliation with the given tags.
    pub fn new(id: &str, name: &str, tags: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Inclusive ranges vitals are rolled from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VitalRanges {
    /// Health range.
    pub health: (i32, i32),
    /// Humanity range.
    pub humanity: (i32, i32),
    /// Stress range.
    pub stress: (i32, i32),
    /// Starting money range.
    pub money: (i64, i64),
    /// Looks range.
    pub looks: (i32, i32),
}

impl Default for VitalRanges {
    fn default() -> Self {
        Self {
            health: (70, 100),
            humanity: (60, 100),
            stress: (0, 40),
            money: (0, 500),
            looks: (20, 80),
        }
    }
}

/// Recipe for rolling a family of NPCs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcTemplate {
    /// Stable id.
    pub id: String,
    /// Human label, e.g. "Street Doc".
    pub label: String,
    /// Range each main stat's priority weight is sampled from.
    pub stat_weights: BTreeMap<MainStat, (f64, f64)>,
    /// Percent jitter range per subskill, replacing the default.
    #[serde(default)]
    pub sub_skill_jitter: BTreeMap<SubSkill, (f64, f64)>,
    /// Fraction of the parent ceiling a subskill starts at.
    #[serde(default = "default_fraction")]
    pub sub_skill_fraction: (f64, f64),
    /// Name pool.
    pub names: Vec<String>,
    /// Portrait pool.
    #[serde(default)]
    pub avatars: Vec<String>,
    /// Inclusive age range in years.
    #[serde(default = "default_age")]
    pub age_years: (u32, u32),
    /// Home district pool; empty means anywhere.
    #[serde(default)]
    pub districts: Vec<String>,
    /// Tag pool.
    #[serde(default)]
    pub tags: Vec<String>,
    /// How many tags to draw.
    #[serde(default = "default_tag_count")]
    pub tag_count: usize,
    /// Affiliations every rolled NPC joins.
    #[serde(default)]
    pub affiliations: Vec<String>,
    /// Vital ranges.
    #[serde(default)]
    pub vitals: VitalRanges,
}

fn default_fraction() -> (f64, f64) {
    (0.4, 0.9)
}

fn default_age() -> (u32, u32) {
    (18, 60)
}

fn default_tag_count() -> usize {
    2
}

impl NpcTemplate {
    /// A template with flat weights and default pools.
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            stat_weights: MainStat::ALL.into_iter().map(|s| (s, (1.0, 1.0))).collect(),
            sub_skill_jitter: BTreeMap::new(),
            sub_skill_fraction: default_fraction(),
            names: Vec::new(),
            avatars: Vec::new(),
            age_years: default_age(),
            districts: Vec::new(),
            tags: Vec::new(),
            tag_count: default_tag_count(),
            affiliations: Vec::new(),
            vitals: VitalRanges::default(),
        }
    }

    /// Sample `stat`'s priority weight from `low..high`.
    pub fn with_weight(mut self, stat: MainStat, low: f64, high: f64) -> Self {
        self.stat_weights.insert(stat, (low, high));
        self
    }

    /// Use `low..high` percent jitter for `skill`.
    pub fn with_jitter(mut self, skill: SubSkill, low: f64, high: f64) -> Self {
        self.sub_skill_jitter.insert(skill, (low, high));
        self
    }

    /// Replace the name pool.
    pub fn with_names(mut self, names: &[&str]) -> Self {
        self.names = to_strings(names);
        self
    }

    /// Replace the portrait pool.
    pub fn with_avatars(mut self, avatars: &[&str]) -> Self {
        self.avatars = to_strings(avatars);
        self
    }

    /// Set the age range in years.
    pub fn with_ages(mut self, low: u32, high: u32) -> Self {
        self.age_years = (low, high);
        self
    }

    /// Replace the home district pool.
    pub fn with_districts(mut self, districts: &[&str]) -> Self {
        self.districts = to_strings(districts);
        self
    }

    /// Replace the tag pool.
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = to_strings(tags);
        self
    }

    /// Replace the fixed affiliations.
    pub fn with_affiliations(mut self, affiliations: &[&str]) -> Self {
        self.affiliations = to_strings(affiliations);
        self
    }

    /// Replace the vital ranges.
    pub fn with_vitals(mut self, vitals: VitalRanges) -> Self {
        self.vitals = vitals;
        self
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// A hand-authored NPC that batch generation can drop in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueProfile {
    /// Stable id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Portrait reference.
    #[serde(default)]
    pub avatar: Option<String>,
    /// Age in whole years.
    pub age_years: u32,
    /// Fixed vitals.
    pub vitals: Vitals,
    /// Fixed skills.
    pub skills: Skills,
    /// Home district id.
    #[serde(default)]
    pub district: Option<String>,
    /// Descriptive tags.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Affiliation ids.
    #[serde(default)]
    pub affiliations: Vec<String>,
}

/// Something that can happen to the player: an errand offered during the
/// month or an encounter rolled while travelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTemplate {
    /// Stable id.
    pub id: String,
    /// Title the task is shown with.
    pub title: String,
    /// Board category.
    #[serde(default)]
    pub kind: TaskKind,
    /// Relative selection weight.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Empty means it can happen anywhere.
    #[serde(default)]
    pub district_tags: BTreeSet<String>,
    /// Tags copied onto the task.
    #[serde(default)]
    pub context_tags: BTreeSet<String>,
    /// Graph played when the task runs.
    #[serde(default)]
    pub task_graph_id: Option<String>,
}

fn default_weight() -> f64 {
    1.0
}

impl EventTemplate {
    /// An event with weight 1 that can happen anywhere.
    pub fn new(id: &str, title: &str, kind: TaskKind) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            kind,
            weight: default_weight(),
            district_tags: BTreeSet::new(),
            context_tags: BTreeSet::new(),
            task_graph_id: None,
        }
    }

    /// Set the selection weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Restrict to districts carrying one of `tags`.
    pub fn in_districts(mut self, tags: &[&str]) -> Self {
        self.district_tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Set the context tags.
    pub fn with_context(mut self, tags: &[&str]) -> Self {
        self.context_tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Attach a task graph.
    pub fn with_graph(mut self, graph_id: &str) -> Self {
        self.task_graph_id = Some(graph_id.to_string());
        self
    }
}
