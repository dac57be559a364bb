//! Read-only content tables: careers, affiliations, districts, NPC templates,
//! events, outcomes and the task graph registry.
//!
//! Tables ship built in ([`ContentTables::builtin`]) or load from JSON
//! ([`ContentTables::from_json`]). Lookups return `Option` and never panic.

mod builtin;
mod types;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::district::DistrictState;
use crate::error::{CoreError, CoreResult};
use crate::graph::TaskGraph;
use crate::outcome::{OutcomeDefinition, OutcomeTier};
use crate::relationship::NO_AFFILIATION;
use crate::task::TaskKind;

pub use types::{
    Affiliation, Career, EventTemplate, JobTemplate, NpcTemplate, UniqueProfile, VitalRanges,
};

/// Everything the generators and reducer look up by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentTables {
    /// Careers and the job ladders inside them.
    pub careers: Vec<Career>,
    /// Factions a character can belong to.
    pub affiliations: Vec<Affiliation>,
    /// The city map.
    pub districts: Vec<DistrictState>,
    /// Templates NPCs are rolled from.
    pub npc_templates: Vec<NpcTemplate>,
    /// Hand-authored NPCs.
    pub unique_profiles: Vec<UniqueProfile>,
    /// Monthly event templates.
    pub events: Vec<EventTemplate>,
    /// Flavor lines logged at month start.
    pub headlines: Vec<String>,
    /// Default outcome per tier.
    pub outcomes: BTreeMap<OutcomeTier, OutcomeDefinition>,
    /// Task graphs keyed by id.
    pub graphs: BTreeMap<String, TaskGraph>,
}

impl ContentTables {
    /// The tables the game ships with.
    pub fn builtin() -> Self {
        builtin::tables()
    }

    /// Parse tables from JSON and validate them.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let tables: Self = serde_json::from_str(json)?;
        tables.validate()?;
        Ok(tables)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // -----------------------------------------------------------------------
    // Lookups
    // -----------------------------------------------------------------------

    /// A career by id.
    pub fn career(&self, id: &str) -> Option<&Career> {
        self.careers.iter().find(|c| c.id == id)
    }

    /// A job template by id, searching every career.
    pub fn job(&self, job_id: &str) -> Option<&JobTemplate> {
        self.careers
            .iter()
            .flat_map(|c| c.jobs.iter())
            .find(|j| j.id == job_id)
    }

    /// The career a job belongs to.
    pub fn career_of_job(&self, job_id: &str) -> Option<&Career> {
        self.careers
            .iter()
            .find(|c| c.jobs.iter().any(|j| j.id == job_id))
    }

    /// Every job template id in career order.
    pub fn job_ids(&self) -> Vec<String> {
        self.careers
            .iter()
            .flat_map(|c| c.jobs.iter().map(|j| j.id.clone()))
            .collect()
    }

    /// An affiliation by id.
    pub fn affiliation(&self, id: &str) -> Option<&Affiliation> {
        self.affiliations.iter().find(|a| a.id == id)
    }

    /// Display name for an affiliation id, falling back to the id itself.
    pub fn affiliation_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.affiliation(id).map_or(id, |a| a.name.as_str())
    }

    /// A district by id.
    pub fn district(&self, id: &str) -> Option<&DistrictState> {
        self.districts.iter().find(|d| d.id == id)
    }

    /// Districts keyed by id, ready to seed a game state.
    pub fn district_map(&self) -> BTreeMap<String, DistrictState> {
        self.districts
            .iter()
            .map(|d| (d.id.clone(), d.clone()))
            .collect()
    }

    /// An NPC template by id.
    pub fn npc_template(&self, id: &str) -> Option<&NpcTemplate> {
        self.npc_templates.iter().find(|t| t.id == id)
    }

    /// A unique profile by id.
    pub fn unique_profile(&self, id: &str) -> Option<&UniqueProfile> {
        self.unique_profiles.iter().find(|p| p.id == id)
    }

    /// An event template by id.
    pub fn event(&self, id: &str) -> Option<&EventTemplate> {
        self.events.iter().find(|e| e.id == id)
    }

    /// Event templates of one kind.
    pub fn events_of_kind(&self, kind: TaskKind) -> impl Iterator<Item = &EventTemplate> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    /// A task graph by id.
    pub fn graph(&self, id: &str) -> Option<&TaskGraph> {
        self.graphs.get(id)
    }

    /// The definition of `tier`, preferring the graph's override.
    pub fn outcome(&self, tier: OutcomeTier, graph_id: Option<&str>) -> Option<&OutcomeDefinition> {
        graph_id
            .and_then(|id| self.graphs.get(id))
            .and_then(|g| g.outcome_overrides.get(&tier))
            .or_else(|| self.outcomes.get(&tier))
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Report the first dangling reference between tables.
    pub fn validate(&self) -> CoreResult<()> {
        let affiliation_ids: BTreeSet<&str> =
            self.affiliations.iter().map(|a| a.id.as_str()).collect();
        let district_ids: BTreeSet<&str> = self.districts.iter().map(|d| d.id.as_str()).collect();

        let mut job_ids = BTreeSet::new();
        for career in &self.careers {
            for aff in &career.affiliation_ids {
                if !affiliation_ids.contains(aff.as_str()) {
                    return Err(invalid(format!(
                        "career \"{}\" names unknown affiliation \"{aff}\"",
                        career.id
                    )));
                }
            }
            for job in &career.jobs {
                if !job_ids.insert(job.id.as_str()) {
                    return Err(invalid(format!("duplicate job id \"{}\"", job.id)));
                }
            }
        }

        for district in &self.districts {
            for next in &district.adjacent {
                if !district_ids.contains(next.as_str()) {
                    return Err(invalid(format!(
                        "district \"{}\" is adjacent to unknown \"{next}\"",
                        district.id
                    )));
                }
            }
        }

        for template in &self.npc_templates {
            if template.names.is_empty() {
                return Err(invalid(format!("npc template \"{}\" has no names", template.id)));
            }
            for aff in &template.affiliations {
                if aff != NO_AFFILIATION && !affiliation_ids.contains(aff.as_str()) {
                    return Err(invalid(format!(
                        "npc template \"{}\" names unknown affiliation \"{aff}\"",
                        template.id
                    )));
                }
            }
        }

        for event in &self.events {
            let dangling = event
                .task_graph_id
                .as_ref()
                .filter(|id| !self.graphs.contains_key(id.as_str()));
            if let Some(graph_id) = dangling {
                return Err(invalid(format!(
                    "event \"{}\" names unknown graph \"{graph_id}\"",
                    event.id
                )));
            }
        }

        for (id, graph) in &self.graphs {
            if id != &graph.id {
                return Err(invalid(format!("graph registered as \"{id}\" is named \"{}\"", graph.id)));
            }
            graph.validate()?;
        }
        Ok(())
    }
}

fn invalid(msg: String) -> CoreError {
    CoreError::InvalidContent(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_are_valid() {
        let tables = ContentTables::builtin();
        tables.validate().unwrap();
        assert!(tables.affiliation(NO_AFFILIATION).is_some());
        assert_eq!(tables.outcomes.len(), 4);
        assert!(!tables.headlines.is_empty());
    }

    #[test]
    fn job_lookup_finds_career() {
        let tables = ContentTables::builtin();
        let job = tables.job("courier").unwrap();
        assert_eq!(job.title, "Courier");
        assert_eq!(tables.career_of_job("courier").unwrap().id, "trade");
        assert!(tables.job("astronaut").is_none());
    }

    #[test]
    fn outcome_prefers_graph_override() {
        let tables = ContentTables::builtin();
        let global = tables.outcome(OutcomeTier::Success, None).unwrap();
        let overridden = tables
            .outcome(OutcomeTier::Success, Some("lost_courier_package"))
            .unwrap();
        assert_ne!(global, overridden);
        // graphs without overrides fall through
        assert_eq!(
            tables.outcome(OutcomeTier::Success, Some("alley_mugging")),
            Some(global)
        );
    }

    #[test]
    fn json_round_trip() {
        let tables = ContentTables::builtin();
        let json = tables.to_json().unwrap();
        let back = ContentTables::from_json(&json).unwrap();
        assert_eq!(back.careers, tables.careers);
        assert_eq!(back.graphs, tables.graphs);
    }

    #[test]
    fn dangling_adjacency_is_reported() {
        let mut tables = ContentTables::builtin();
        tables.districts[0].adjacent.push("atlantis".into());
        let err = tables.validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidContent(_)));
        assert!(err.to_string().contains("atlantis"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = ContentTables::from_json("{ not json").unwrap_err();
        assert!(matches!(err, CoreError::Parse(_)));
    }
}
