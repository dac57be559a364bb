//! Memberships are derived, never authored: a member belongs to exactly the
//! affiliations their jobs resolve to, or to the sentinel when they have none.

use std::collections::{BTreeMap, BTreeSet};

use sw_core::{ContentTables, GameState, JobAssignment, JobInstance, Membership, NO_AFFILIATION};

/// Reputation a brand-new membership starts at.
pub const DEFAULT_REPUTATION: i32 = 0;

/// The affiliation a member works for through `job_id`.
///
/// A posting the member fills wins over the career's first affiliation.
fn job_affiliation(
    member_id: &str,
    job_id: &str,
    postings: &BTreeMap<String, JobInstance>,
    content: &ContentTables,
) -> Option<String> {
    let from_posting = postings
        .values()
        .find(|p| p.template_id == job_id && p.filled_by.as_deref() == Some(member_id))
        .and_then(|p| p.affiliation_id.clone());
    from_posting.or_else(|| {
        content
            .career_of_job(job_id)
            .and_then(|c| c.affiliation_ids.first().cloned())
    })
}

/// Compute `member_id`'s membership rows from scratch.
///
/// Reputation carries over from `previous` when the same row existed.
pub fn derive_memberships(
    member_id: &str,
    assignments: &BTreeMap<String, JobAssignment>,
    postings: &BTreeMap<String, JobInstance>,
    content: &ContentTables,
    previous: &BTreeMap<String, Membership>,
) -> BTreeMap<String, Membership> {
    let mut affiliations: BTreeSet<String> = assignments
        .values()
        .filter(|a| a.member_id == member_id)
        .filter_map(|a| job_affiliation(member_id, &a.job_id, postings, content))
        .collect();
    if affiliations.is_empty() {
        affiliations.insert(NO_AFFILIATION.to_string());
    }
    memberships_for(member_id, affiliations, previous)
}

/// Rows for an explicit affiliation list (the sentinel when empty).
pub fn memberships_for(
    member_id: &str,
    affiliations: impl IntoIterator<Item = String>,
    previous: &BTreeMap<String, Membership>,
) -> BTreeMap<String, Membership> {
    let mut rows: BTreeMap<String, Membership> = affiliations
        .into_iter()
        .map(|aff| {
            let mut row = Membership::new(aff, member_id, DEFAULT_REPUTATION);
            if let Some(old) = previous.get(&row.id) {
                row.reputation = old.reputation;
            }
            (row.id.clone(), row)
        })
        .collect();
    if rows.is_empty() {
        let row = Membership::new(NO_AFFILIATION, member_id, DEFAULT_REPUTATION);
        rows.insert(row.id.clone(), row);
    }
    rows
}

/// Swap `member_id`'s rows in `state` for freshly derived ones. Other
/// members are untouched.
pub fn rebuild_memberships(state: &mut GameState, content: &ContentTables, member_id: &str) {
    let fresh = derive_memberships(
        member_id,
        &state.job_assignments,
        &state.job_postings,
        content,
        &state.memberships,
    );
    replace_memberships(state, member_id, fresh);
}

/// Drop `member_id`'s rows and insert `rows`.
pub fn replace_memberships(state: &mut GameState, member_id: &str, rows: BTreeMap<String, Membership>) {
    state.memberships.retain(|_, m| m.member_id != member_id);
    state.memberships.extend(rows);
}
