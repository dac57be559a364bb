//! The d20 stat check.
//!
//! `total = d20 + main stat + subskill bonus`, success when `total >= dc`.
//! With criticals on, a natural 20 always succeeds and a natural 1 always
//! fails, whatever the total says.

use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::dice::roll_d20;
use crate::error::MechError;

/// Highest bonus a subskill can grant.
pub const MAX_SUB_SKILL_BONUS: i32 = 4;

/// Subskill bonus from fixed bins: `<25 -> 0, <50 -> 1, <75 -> 2, <95 -> 3`,
/// otherwise 4.
pub fn sub_skill_to_bonus(value: i32) -> i32 {
    match value {
        v if v < 25 => 0,
        v if v < 50 => 1,
        v if v < 75 => 2,
        v if v < 95 => 3,
        _ => 4,
    }
}

/// Linear bonus: `floor(v / 25)`, kept within `0..=4`.
pub fn scaled_bonus(value: i32) -> i32 {
    value.div_euclid(25).clamp(0, MAX_SUB_SKILL_BONUS)
}

/// How a 0..=100 subskill turns into a flat bonus.
#[derive(Debug, Clone, Copy, Default)]
pub enum BonusMapping {
    /// The fixed bins of [`sub_skill_to_bonus`].
    #[default]
    Quintile,
    /// [`scaled_bonus`].
    Scaled,
    /// Caller-supplied mapping.
    Custom(fn(i32) -> i32),
}

impl BonusMapping {
    /// Bonus for a subskill value.
    pub fn bonus(self, value: i32) -> i32 {
        match self {
            Self::Quintile => sub_skill_to_bonus(value),
            Self::Scaled => scaled_bonus(value),
            Self::Custom(f) => f(value),
        }
    }
}

impl FromStr for BonusMapping {
    type Err = MechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quintile" => Ok(Self::Quintile),
            "scaled" => Ok(Self::Scaled),
            _ => Err(MechError::UnknownMapping(s.to_string())),
        }
    }
}

/// Which way a natural roll overrode the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Critical {
    /// A natural 20 forced a success.
    Success,
    /// A natural 1 forced a failure.
    Failure,
}

/// Inputs to [`perform_stat_check`].
#[derive(Debug, Clone, Copy)]
pub struct StatCheckRequest {
    /// Difficulty class to meet or beat.
    pub dc: i32,
    /// Main stat level, 0..=10.
    pub main_stat: i32,
    /// Subskill percentage, if the check uses one.
    pub sub_skill: Option<i32>,
    /// How the subskill becomes a bonus.
    pub mapping: BonusMapping,
    /// Whether natural 1 and 20 override the total.
    pub allow_critical: bool,
}

impl StatCheckRequest {
    /// A check against `dc` with quintile bonuses and criticals on.
    pub fn new(dc: i32, main_stat: i32) -> Self {
        Self {
            dc,
            main_stat,
            sub_skill: None,
            mapping: BonusMapping::default(),
            allow_critical: true,
        }
    }

    /// Add a subskill percentage.
    pub fn with_sub_skill(mut self, value: i32) -> Self {
        self.sub_skill = Some(value);
        self
    }

    /// Use another bonus mapping.
    pub fn with_mapping(mut self, mapping: BonusMapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// Let the total alone decide.
    pub fn without_criticals(mut self) -> Self {
        self.allow_critical = false;
        self
    }
}

/// Everything about a finished check, for logs and observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatCheckResult {
    /// The natural roll.
    pub d20: u32,
    /// Main stat added.
    pub main_stat: i32,
    /// Bonus the subskill granted.
    pub sub_skill_bonus: i32,
    /// Roll plus modifiers.
    pub total: i32,
    /// Difficulty class.
    pub dc: i32,
    /// Whether the check passed.
    pub success: bool,
    /// `total - dc`, adjusted on criticals.
    pub margin: i32,
    /// Set when a natural roll decided the check.
    pub critical: Option<Critical>,
}

impl fmt::Display for StatCheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "d20 {} + {} + {} = {} vs DC {}: {}",
            self.d20,
            self.main_stat,
            self.sub_skill_bonus,
            self.total,
            self.dc,
            if self.success { "success" } else { "failure" }
        )?;
        match self.critical {
            Some(Critical::Success) => write!(f, " (natural 20)"),
            Some(Critical::Failure) => write!(f, " (natural 1)"),
            None => Ok(()),
        }
    }
}

/// Roll one d20 and resolve it against `request.dc`.
pub fn perform_stat_check<R: RngCore + ?Sized>(
    request: &StatCheckRequest,
    rng: &mut R,
) -> StatCheckResult {
    let d20 = roll_d20(rng);
    let sub_skill_bonus = request
        .sub_skill
        .map_or(0, |value| request.mapping.bonus(value));
    let total = d20 as i32 + request.main_stat + sub_skill_bonus;
    let mut success = total >= request.dc;
    let mut margin = total - request.dc;
    let mut critical = None;

    if request.allow_critical {
        if d20 == 20 {
            success = true;
            margin = margin.max(1);
            critical = Some(Critical::Success);
        } else if d20 == 1 {
            success = false;
            margin = margin.min(-1);
            critical = Some(Critical::Failure);
        }
    }

    StatCheckResult {
        d20,
        main_stat: request.main_stat,
        sub_skill_bonus,
        total,
        dc: request.dc,
        success,
        margin,
        critical,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::rng::{FixedRng, make_rng};

    #[test]
    fn quintile_breakpoints() {
        assert_eq!(sub_skill_to_bonus(0), 0);
        assert_eq!(sub_skill_to_bonus(24), 0);
        assert_eq!(sub_skill_to_bonus(25), 1);
        assert_eq!(sub_skill_to_bonus(49), 1);
        assert_eq!(sub_skill_to_bonus(50), 2);
        assert_eq!(sub_skill_to_bonus(74), 2);
        assert_eq!(sub_skill_to_bonus(75), 3);
        assert_eq!(sub_skill_to_bonus(94), 3);
        assert_eq!(sub_skill_to_bonus(95), 4);
        assert_eq!(sub_skill_to_bonus(100), 4);
    }

    #[test]
    fn scaled_and_custom_mappings() {
        assert_eq!(BonusMapping::Scaled.bonus(99), 3);
        assert_eq!(BonusMapping::Scaled.bonus(100), 4);
        assert_eq!(BonusMapping::Scaled.bonus(-10), 0);
        assert_eq!(BonusMapping::Custom(|v| v / 10).bonus(80), 8);
        assert!(matches!("scaled".parse::<BonusMapping>(), Ok(BonusMapping::Scaled)));
        assert!("cubic".parse::<BonusMapping>().is_err());
    }

    #[test]
    fn worked_example() {
        let request = StatCheckRequest::new(15, 5).with_sub_skill(80);
        let result = perform_stat_check(&request, &mut FixedRng(0.95));
        assert_eq!(result.d20, 19);
        assert_eq!(result.sub_skill_bonus, 3);
        assert_eq!(result.total, 27);
        assert!(result.success);
        assert_eq!(result.margin, 12);
        assert_eq!(result.critical, None);
    }

    #[test]
    fn natural_one_fails_even_when_total_clears() {
        let request = StatCheckRequest::new(5, 10).with_sub_skill(100);
        let result = perform_stat_check(&request, &mut FixedRng(0.0));
        assert_eq!(result.d20, 1);
        assert_eq!(result.total, 15);
        assert!(!result.success);
        assert_eq!(result.margin, -1);
        assert_eq!(result.critical, Some(Critical::Failure));
    }

    #[test]
    fn natural_twenty_succeeds_against_impossible_dc() {
        let request = StatCheckRequest::new(40, 0);
        let result = perform_stat_check(&request, &mut FixedRng(0.999_999));
        assert_eq!(result.d20, 20);
        assert!(result.success);
        assert_eq!(result.margin, 1);
        assert_eq!(result.critical, Some(Critical::Success));
    }

    #[test]
    fn criticals_can_be_disabled() {
        let request = StatCheckRequest::new(40, 0).without_criticals();
        let result = perform_stat_check(&request, &mut FixedRng(0.999_999));
        assert!(!result.success);
        assert_eq!(result.critical, None);
        assert_eq!(result.margin, -20);
    }

    #[test]
    fn result_display() {
        let request = StatCheckRequest::new(15, 5).with_sub_skill(80);
        let result = perform_stat_check(&request, &mut FixedRng(0.95));
        insta::assert_snapshot!(result.to_string(), @"d20 19 + 5 + 3 = 27 vs DC 15: success");
    }

    proptest! {
        #[test]
        fn bonus_is_monotonic(a in 0i32..=100, b in 0i32..=100) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(sub_skill_to_bonus(lo) <= sub_skill_to_bonus(hi));
        }

        #[test]
        fn bonus_changes_only_at_breakpoints(v in 1i32..=100) {
            let changed = sub_skill_to_bonus(v) != sub_skill_to_bonus(v - 1);
            prop_assert_eq!(changed, [25, 50, 75, 95].contains(&v));
        }

        #[test]
        fn criticals_override_totals(
            seed in any::<u32>(),
            dc in -10i32..40,
            main in 0i32..=10,
            sub in 0i32..=100,
        ) {
            let request = StatCheckRequest::new(dc, main).with_sub_skill(sub);
            let result = perform_stat_check(&request, &mut make_rng(Some(seed)));
            match result.d20 {
                20 => prop_assert!(result.success && result.margin >= 1),
                1 => prop_assert!(!result.success && result.margin <= -1),
                _ => prop_assert_eq!(result.success, result.total >= dc),
            }
        }
    }
}
