//! Fuzzy name matching for "did you mean" hints.

use strsim::jaro_winkler;

/// Minimum similarity score for a suggestion (0.0-1.0).
const FUZZY_THRESHOLD: f64 = 0.8;

/// The candidate closest to `input`, if any is close enough.
pub fn closest_match<'a>(input: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let input_lower = input.to_lowercase();
    candidates
        .into_iter()
        .map(|candidate| (candidate, jaro_winkler(&input_lower, &candidate.to_lowercase())))
        .filter(|(_, score)| *score >= FUZZY_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(candidate, _)| candidate)
}

/// Names of every stat and subskill a story may check.
pub fn stat_names() -> impl Iterator<Item = &'static str> {
    sw_core::MainStat::ALL
        .iter()
        .map(|s| s.as_str())
        .chain(sw_core::SubSkill::ALL.iter().map(|s| s.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_near_misses() {
        assert_eq!(closest_match("persuasoin", stat_names()), Some("persuasion"));
        assert_eq!(closest_match("STEALTH", stat_names()), Some("stealth"));
    }

    #[test]
    fn nothing_for_garbage() {
        assert_eq!(closest_match("qqqqqq", stat_names()), None);
    }
}
