use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Performance a fresh hire starts with.
pub const DEFAULT_PERFORMANCE: i32 = 50;

/// Key of the assignment row linking `member_id` to `job_id`.
pub fn assignment_id(job_id: &str, member_id: &str) -> String {
    format!("{job_id}__{member_id}")
}

/// A member holding a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobAssignment {
    /// Row key, see [`assignment_id`].
    pub id: String,
    /// The job template held.
    pub job_id: String,
    /// Player or NPC id.
    pub member_id: String,
    /// Standing on the job, 0..=100.
    pub performance: i32,
}

impl JobAssignment {
    /// A fresh hire at [`DEFAULT_PERFORMANCE`].
    pub fn new(job_id: impl Into<String>, member_id: impl Into<String>) -> Self {
        let job_id = job_id.into();
        let member_id = member_id.into();
        Self {
            id: assignment_id(&job_id, &member_id),
            job_id,
            member_id,
            performance: DEFAULT_PERFORMANCE,
        }
    }
}

/// How a posting was rolled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobGeneration {
    /// Month the posting was rolled in.
    pub month: u32,
    /// Template salary before jitter.
    pub base_salary: i64,
    /// Signed fraction applied to the base salary, e.g. `-0.12`.
    pub jitter_pct: f64,
}

/// A fillable job listing rolled from a job template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobInstance {
    /// Posting id, `job-` prefixed.
    pub id: String,
    /// The job template this lists.
    pub template_id: String,
    /// Employer, if any.
    pub affiliation_id: Option<String>,
    /// Display title.
    pub title: String,
    /// Monthly pay after jitter.
    pub salary: i64,
    /// Member holding the posting.
    pub filled_by: Option<String>,
    /// Tags copied from the template.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Short blurb for the board.
    #[serde(default)]
    pub description: String,
    /// Roll details.
    #[serde(default)]
    pub generation: JobGeneration,
}

impl JobInstance {
    /// Returns true if nobody holds this posting.
    pub fn is_open(&self) -> bool {
        self.filled_by.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_key_joins_job_and_member() {
        let row = JobAssignment::new("courier", "player");
        assert_eq!(row.id, "courier__player");
        assert_eq!(row.performance, DEFAULT_PERFORMANCE);
    }
}
