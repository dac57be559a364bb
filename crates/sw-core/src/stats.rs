use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Upper bound for health, humanity, stress and looks.
pub const VITAL_MAX: i32 = 100;
/// Upper bound for a main stat level.
pub const MAIN_STAT_MAX: i32 = 10;
/// Upper bound for a subskill percentage.
pub const SUB_SKILL_MAX: i32 = 100;

/// One of the four main stats every character carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MainStat {
    /// Strength, toughness and raw physical ability.
    Physique,
    /// Speed, coordination and hand-eye precision.
    Reflexes,
    /// Reasoning, technical knowledge and memory.
    Intellect,
    /// Presence, charm and social leverage.
    Charisma,
}

impl MainStat {
    /// All main stats in canonical order.
    pub const ALL: [MainStat; 4] = [
        Self::Physique,
        Self::Reflexes,
        Self::Intellect,
        Self::Charisma,
    ];

    /// The snake_case name used in content and story scripts.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Physique => "physique",
            Self::Reflexes => "reflexes",
            Self::Intellect => "intellect",
            Self::Charisma => "charisma",
        }
    }

    /// The three subskills governed by this stat.
    pub fn sub_skills(self) -> [SubSkill; 3] {
        match self {
            Self::Physique => [SubSkill::Athletics, SubSkill::Brawling, SubSkill::Endurance],
            Self::Reflexes => [SubSkill::Firearms, SubSkill::Stealth, SubSkill::Driving],
            Self::Intellect => [SubSkill::Hacking, SubSkill::Engineering, SubSkill::Medicine],
            Self::Charisma => [
                SubSkill::Persuasion,
                SubSkill::Streetwise,
                SubSkill::Deception,
            ],
        }
    }

    /// Parse a stat name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|stat| stat.as_str() == s)
    }
}

impl fmt::Display for MainStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A trained subskill, always governed by exactly one [`MainStat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubSkill {
    /// Running, climbing, jumping.
    Athletics,
    /// Unarmed and melee fighting.
    Brawling,
    /// Shrugging off pain, drink and long shifts.
    Endurance,
    /// Handling guns.
    Firearms,
    /// Moving unseen.
    Stealth,
    /// Cars, bikes and anything with a motor.
    Driving,
    /// Breaking into systems.
    Hacking,
    /// Building and fixing machines.
    Engineering,
    /// Patching people up.
    Medicine,
    /// Talking people into things.
    Persuasion,
    /// Knowing how the street works.
    Streetwise,
    /// Lying convincingly.
    Deception,
}

impl SubSkill {
    /// All subskills, grouped by parent stat.
    pub const ALL: [SubSkill; 12] = [
        Self::Athletics,
        Self::Brawling,
        Self::Endurance,
        Self::Firearms,
        Self::Stealth,
        Self::Driving,
        Self::Hacking,
        Self::Engineering,
        Self::Medicine,
        Self::Persuasion,
        Self::Streetwise,
        Self::Deception,
    ];

    /// The main stat this subskill derives from.
    pub fn parent(self) -> MainStat {
        match self {
            Self::Athletics | Self::Brawling | Self::Endurance => MainStat::Physique,
            Self::Firearms | Self::Stealth | Self::Driving => MainStat::Reflexes,
            Self::Hacking | Self::Engineering | Self::Medicine => MainStat::Intellect,
            Self::Persuasion | Self::Streetwise | Self::Deception => MainStat::Charisma,
        }
    }

    /// The snake_case name used in content and story scripts.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Athletics => "athletics",
            Self::Brawling => "brawling",
            Self::Endurance => "endurance",
            Self::Firearms => "firearms",
            Self::Stealth => "stealth",
            Self::Driving => "driving",
            Self::Hacking => "hacking",
            Self::Engineering => "engineering",
            Self::Medicine => "medicine",
            Self::Persuasion => "persuasion",
            Self::Streetwise => "streetwise",
            Self::Deception => "deception",
        }
    }

    /// Parse a subskill name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|skill| skill.as_str() == s)
    }
}

impl fmt::Display for SubSkill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A reference to either a main stat or a subskill, as named in content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatRef {
    /// A main stat.
    Main(MainStat),
    /// A subskill (checked with its parent stat).
    Sub(SubSkill),
}

impl StatRef {
    /// Resolve a stat or subskill by name.
    pub fn parse(s: &str) -> CoreResult<Self> {
        if let Some(stat) = MainStat::parse(s) {
            return Ok(Self::Main(stat));
        }
        SubSkill::parse(s)
            .map(Self::Sub)
            .ok_or_else(|| CoreError::UnknownStat(s.to_string()))
    }

    /// The main stat that governs this reference.
    pub fn main_stat(self) -> MainStat {
        match self {
            Self::Main(stat) => stat,
            Self::Sub(skill) => skill.parent(),
        }
    }
}

impl TryFrom<String> for StatRef {
    type Error = CoreError;

    fn try_from(value: String) -> CoreResult<Self> {
        Self::parse(&value)
    }
}

impl From<StatRef> for String {
    fn from(value: StatRef) -> Self {
        value.to_string()
    }
}

impl fmt::Display for StatRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main(stat) => write!(f, "{stat}"),
            Self::Sub(skill) => write!(f, "{skill}"),
        }
    }
}

/// Health, humanity, stress, money and looks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vitals {
    /// 0..=100.
    pub health: i32,
    /// 0..=100.
    pub humanity: i32,
    /// 0..=100.
    pub stress: i32,
    /// Unclamped; debt is allowed.
    pub money: i64,
    /// 0..=100.
    pub looks: i32,
}

impl Default for Vitals {
    fn default() -> Self {
        Self {
            health: VITAL_MAX,
            humanity: VITAL_MAX,
            stress: 0,
            money: 0,
            looks: 50,
        }
    }
}

impl Vitals {
    /// Apply an additive delta. Everything but money is clamped to 0..=100.
    pub fn apply(&mut self, delta: &StatsDelta) {
        self.health = self.health.saturating_add(delta.health).clamp(0, VITAL_MAX);
        self.humanity = self.humanity.saturating_add(delta.humanity).clamp(0, VITAL_MAX);
        self.stress = self.stress.saturating_add(delta.stress).clamp(0, VITAL_MAX);
        self.looks = self.looks.saturating_add(delta.looks).clamp(0, VITAL_MAX);
        self.money = self.money.saturating_add(delta.money);
    }
}

/// An additive change to [`Vitals`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsDelta {
    /// Change to health.
    pub health: i32,
    /// Change to humanity.
    pub humanity: i32,
    /// Change to stress.
    pub stress: i32,
    /// Change to money.
    pub money: i64,
    /// Change to looks.
    pub looks: i32,
}

impl StatsDelta {
    /// A delta that only touches money.
    pub fn money(amount: i64) -> Self {
        Self {
            money: amount,
            ..Self::default()
        }
    }

    /// Returns true if every component is zero.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Component-wise sum of two deltas.
    pub fn merge(&self, other: &StatsDelta) -> StatsDelta {
        StatsDelta {
            health: self.health.saturating_add(other.health),
            humanity: self.humanity.saturating_add(other.humanity),
            stress: self.stress.saturating_add(other.stress),
            money: self.money.saturating_add(other.money),
            looks: self.looks.saturating_add(other.looks),
        }
    }
}

impl fmt::Display for StatsDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = [
            ("health", i64::from(self.health)),
            ("humanity", i64::from(self.humanity)),
            ("stress", i64::from(self.stress)),
            ("money", self.money),
            ("looks", i64::from(self.looks)),
        ]
        .into_iter()
        .filter(|(_, v)| *v != 0)
        .map(|(name, v)| format!("{name} {v:+}"))
        .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Main stat levels (0..=10) and subskill percentages (0..=100).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skills {
    /// Main stat levels.
    pub main: BTreeMap<MainStat, i32>,
    /// Subskill percentages.
    pub sub: BTreeMap<SubSkill, i32>,
}

impl Skills {
    /// Every main stat at `main` and every subskill at `sub`.
    pub fn uniform(main: i32, sub: i32) -> Self {
        Self {
            main: MainStat::ALL.into_iter().map(|s| (s, main)).collect(),
            sub: SubSkill::ALL.into_iter().map(|s| (s, sub)).collect(),
        }
    }

    /// Level of a main stat (0 when unset).
    pub fn main(&self, stat: MainStat) -> i32 {
        self.main.get(&stat).copied().unwrap_or(0)
    }

    /// Percentage of a subskill (0 when unset).
    pub fn sub(&self, skill: SubSkill) -> i32 {
        self.sub.get(&skill).copied().unwrap_or(0)
    }

    /// Apply additive deltas, keeping every value inside its range.
    pub fn apply(&mut self, deltas: &SkillDeltas) {
        for (stat, delta) in &deltas.skills {
            let value = self.main(*stat).saturating_add(*delta).clamp(0, MAIN_STAT_MAX);
            self.main.insert(*stat, value);
        }
        for (skill, delta) in &deltas.sub_skills {
            let value = self.sub(*skill).saturating_add(*delta).clamp(0, SUB_SKILL_MAX);
            self.sub.insert(*skill, value);
        }
    }
}

/// Additive changes to main stats and subskills.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillDeltas {
    /// Per main stat.
    pub skills: BTreeMap<MainStat, i32>,
    /// Per subskill.
    pub sub_skills: BTreeMap<SubSkill, i32>,
}

impl SkillDeltas {
    /// Returns true if no stat or subskill changes.
    pub fn is_empty(&self) -> bool {
        self.skills.values().all(|v| *v == 0) && self.sub_skills.values().all(|v| *v == 0)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn every_sub_skill_belongs_to_its_parent() {
        for stat in MainStat::ALL {
            for skill in stat.sub_skills() {
                assert_eq!(skill.parent(), stat);
            }
        }
    }

    #[test]
    fn stat_ref_parses_both_kinds() {
        assert_eq!(
            StatRef::parse("Physique").unwrap(),
            StatRef::Main(MainStat::Physique)
        );
        assert_eq!(
            StatRef::parse("hacking").unwrap(),
            StatRef::Sub(SubSkill::Hacking)
        );
        assert_eq!(
            StatRef::parse("hacking").unwrap().main_stat(),
            MainStat::Intellect
        );
        assert!(StatRef::parse("luck").is_err());
    }

    #[test]
    fn stat_ref_serializes_as_name() {
        let json = serde_json::to_string(&StatRef::Sub(SubSkill::Stealth)).unwrap();
        assert_eq!(json, "\"stealth\"");
        let back: StatRef = serde_json::from_str("\"charisma\"").unwrap();
        assert_eq!(back, StatRef::Main(MainStat::Charisma));
    }

    #[test]
    fn vitals_clamp_except_money() {
        let mut vitals = Vitals::default();
        vitals.apply(&StatsDelta {
            health: 40,
            stress: -10,
            money: -250,
            ..StatsDelta::default()
        });
        assert_eq!(vitals.health, 100);
        assert_eq!(vitals.stress, 0);
        assert_eq!(vitals.money, -250);
    }

    #[test]
    fn skills_floor_at_zero() {
        let mut skills = Skills::uniform(2, 10);
        let mut deltas = SkillDeltas::default();
        deltas.skills.insert(MainStat::Reflexes, -5);
        deltas.sub_skills.insert(SubSkill::Driving, -30);
        deltas.sub_skills.insert(SubSkill::Hacking, 15);
        skills.apply(&deltas);
        assert_eq!(skills.main(MainStat::Reflexes), 0);
        assert_eq!(skills.sub(SubSkill::Driving), 0);
        assert_eq!(skills.sub(SubSkill::Hacking), 25);
    }

    #[test]
    fn extreme_deltas_saturate() {
        let mut vitals = Vitals::default();
        vitals.apply(&StatsDelta {
            health: i32::MAX,
            stress: i32::MIN,
            money: i64::MAX,
            ..StatsDelta::default()
        });
        vitals.apply(&StatsDelta::money(1));
        assert_eq!(vitals.health, 100);
        assert_eq!(vitals.stress, 0);
        assert_eq!(vitals.money, i64::MAX);

        let mut skills = Skills::uniform(5, 50);
        let mut deltas = SkillDeltas::default();
        deltas.skills.insert(MainStat::Charisma, i32::MAX);
        deltas.sub_skills.insert(SubSkill::Stealth, i32::MIN);
        skills.apply(&deltas);
        assert_eq!(skills.main(MainStat::Charisma), 10);
        assert_eq!(skills.sub(SubSkill::Stealth), 0);

        let merged = StatsDelta::money(i64::MAX).merge(&StatsDelta::money(5));
        assert_eq!(merged.money, i64::MAX);
    }

    #[test]
    fn delta_display_skips_zeroes() {
        let delta = StatsDelta {
            health: -5,
            money: 120,
            ..StatsDelta::default()
        };
        insta::assert_snapshot!(delta.to_string(), @"health -5, money +120");
    }

    proptest! {
        #[test]
        fn vitals_stay_in_range(
            health in -300i32..300,
            humanity in -300i32..300,
            stress in -300i32..300,
            looks in -300i32..300,
        ) {
            let mut vitals = Vitals::default();
            vitals.apply(&StatsDelta { health, humanity, stress, money: 0, looks });
            for v in [vitals.health, vitals.humanity, vitals.stress, vitals.looks] {
                prop_assert!((0..=VITAL_MAX).contains(&v));
            }
        }
    }
}
