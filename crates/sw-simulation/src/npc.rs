//! Template-driven NPC generation.
//!
//! Main stats are apportioned from a fixed point pool by priority weights
//! (sampled per template, then sharpened by [`WEIGHT_EXPONENT`]), so a
//! template's favourite stat dominates superlinearly. Subskills are rolled
//! under their parent stat's ceiling. Every draw comes from the supplied RNG,
//! so a fixed seed reproduces the same NPC.

use std::collections::BTreeSet;

use rand::RngCore;
use sw_core::content::{NpcTemplate, UniqueProfile};
use sw_core::{
    ContentTables, MainStat, NO_AFFILIATION, NpcOrigin, NpcState, Skills, SubSkill, Vitals,
};
use sw_mechanics::{make_rng, pick, range_f64, range_int, shuffle, weighted_index};

use crate::error::{SimError, SimResult};

/// Points shared out across the four main stats.
pub const STAT_POOL: u32 = 12;
/// Exponent applied to sampled weights before apportioning.
pub const WEIGHT_EXPONENT: f64 = 1.6;
/// Default subskill jitter range, in percent.
pub const DEFAULT_JITTER_PCT: (f64, f64) = (-25.0, 25.0);

/// Options shared by the NPC generators.
#[derive(Debug, Clone, PartialEq)]
pub struct NpcGenOptions {
    /// Seed for the `*_seeded` wrappers; also recorded on the NPC.
    pub seed: Option<u32>,
    /// Restrict random picks to these templates. Empty means all.
    pub template_ids: Vec<String>,
    /// Place the NPC here instead of drawing from the template.
    pub district: Option<String>,
    /// Let batches substitute hand-authored profiles.
    pub allow_unique: bool,
    /// Chance per NPC that a unique profile is used instead.
    pub unique_chance: f64,
    /// Profiles that must not be drawn (already in play).
    pub used_profiles: BTreeSet<String>,
}

impl Default for NpcGenOptions {
    fn default() -> Self {
        Self {
            seed: None,
            template_ids: Vec::new(),
            district: None,
            allow_unique: false,
            unique_chance: 0.1,
            used_profiles: BTreeSet::new(),
        }
    }
}

impl NpcGenOptions {
    /// Seed the `*_seeded` wrappers.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Only roll from these templates.
    pub fn with_templates(mut self, ids: &[&str]) -> Self {
        self.template_ids = ids.iter().map(|id| id.to_string()).collect();
        self
    }

    /// Place every NPC in `district`.
    pub fn in_district(mut self, district: impl Into<String>) -> Self {
        self.district = Some(district.into());
        self
    }

    /// Allow unique profiles at `chance` per NPC.
    pub fn with_uniques(mut self, chance: f64) -> Self {
        self.allow_unique = true;
        self.unique_chance = chance;
        self
    }
}

// ---------------------------------------------------------------------------
// Stat allocation
// ---------------------------------------------------------------------------

/// Split `pool` points across `weights`: floors first, then the remainder
/// one point at a time, drawn by fractional part without replacement.
///
/// The result always sums to `pool`. Non-positive weight totals are
/// treated as equal weights.
pub fn apportion<R: RngCore + ?Sized>(weights: &[f64], pool: u32, rng: &mut R) -> Vec<u32> {
    if weights.is_empty() {
        return Vec::new();
    }
    let total: f64 = weights.iter().map(|w| w.max(0.0)).sum();
    let shares: Vec<f64> = if total > 0.0 {
        weights
            .iter()
            .map(|w| w.max(0.0) / total * f64::from(pool))
            .collect()
    } else {
        vec![f64::from(pool) / weights.len() as f64; weights.len()]
    };

    let mut points: Vec<u32> = shares.iter().map(|s| s.floor() as u32).collect();
    let mut fractions: Vec<f64> = shares.iter().map(|s| s - s.floor()).collect();
    let mut remaining = pool.saturating_sub(points.iter().sum());

    while remaining > 0 {
        let idx = weighted_index(rng, &fractions).unwrap_or_else(|| largest(&shares));
        points[idx] += 1;
        fractions[idx] = 0.0;
        remaining -= 1;
    }
    points
}

fn largest(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold(0, |best, (i, v)| if *v > values[best] { i } else { best })
}

/// Level for an allocation: `1 + round(points / pool * 9)`.
pub fn points_to_level(points: u32, pool: u32) -> i32 {
    if pool == 0 {
        return 1;
    }
    1 + (f64::from(points) / f64::from(pool) * 9.0).round() as i32
}

fn roll_skills<R: RngCore + ?Sized>(template: &NpcTemplate, rng: &mut R) -> Skills {
    let weights: Vec<f64> = MainStat::ALL
        .iter()
        .map(|stat| {
            let (lo, hi) = template.stat_weights.get(stat).copied().unwrap_or((1.0, 1.0));
            range_f64(rng, lo, hi).max(0.0).powf(WEIGHT_EXPONENT)
        })
        .collect();
    let points = apportion(&weights, STAT_POOL, rng);

    let mut skills = Skills::default();
    for (stat, p) in MainStat::ALL.iter().zip(&points) {
        skills.main.insert(*stat, points_to_level(*p, STAT_POOL));
    }

    let (frac_lo, frac_hi) = template.sub_skill_fraction;
    for skill in SubSkill::ALL {
        let ceiling = skills.main(skill.parent()) * 10;
        let base = f64::from(ceiling) * range_f64(rng, frac_lo, frac_hi);
        let (j_lo, j_hi) = template
            .sub_skill_jitter
            .get(&skill)
            .copied()
            .unwrap_or(DEFAULT_JITTER_PCT);
        let jittered = base * (1.0 + range_f64(rng, j_lo, j_hi) / 100.0);
        let value = (jittered.round() as i32).clamp(0, ceiling);
        skills.sub.insert(skill, value);
    }
    skills
}

fn roll_vitals<R: RngCore + ?Sized>(template: &NpcTemplate, rng: &mut R) -> Vitals {
    let v = &template.vitals;
    Vitals {
        health: vital_in(rng, v.health),
        humanity: vital_in(rng, v.humanity),
        stress: vital_in(rng, v.stress),
        money: range_int(rng, v.money.0, v.money.1),
        looks: vital_in(rng, v.looks),
    }
}

fn vital_in<R: RngCore + ?Sized>(rng: &mut R, (lo, hi): (i32, i32)) -> i32 {
    range_int(rng, i64::from(lo), i64::from(hi)) as i32
}

fn npc_id<R: RngCore + ?Sized>(rng: &mut R) -> String {
    let mut bytes = [0u8; 16];
    rng.fill_bytes(&mut bytes);
    uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .to_string()
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Roll one NPC from a named template.
pub fn generate_npc_from_template<R: RngCore + ?Sized>(
    tables: &ContentTables,
    template_id: &str,
    opts: &NpcGenOptions,
    rng: &mut R,
) -> SimResult<NpcState> {
    let template = tables
        .npc_template(template_id)
        .ok_or_else(|| SimError::UnknownTemplate(template_id.to_string()))?;

    let id = npc_id(rng);
    let skills = roll_skills(template, rng);
    let vitals = roll_vitals(template, rng);
    let name = pick(rng, &template.names)
        .cloned()
        .unwrap_or_else(|| template.label.clone());
    let avatar = pick(rng, &template.avatars).cloned();
    let (age_lo, age_hi) = template.age_years;
    let age_years = range_int(rng, i64::from(age_lo), i64::from(age_hi)) as u32;
    let age_months = age_years * 12 + range_int(rng, 0, 11) as u32;
    let district = match &opts.district {
        Some(d) => Some(d.clone()),
        None => pick(rng, &template.districts).cloned(),
    };

    let mut tag_pool = template.tags.clone();
    shuffle(rng, &mut tag_pool);
    let tags: BTreeSet<String> = tag_pool.into_iter().take(template.tag_count).collect();

    let affiliations = pick(rng, &template.affiliations)
        .filter(|a| a.as_str() != NO_AFFILIATION)
        .cloned()
        .into_iter()
        .collect();

    tracing::debug!(template = template_id, %name, "rolled npc");

    Ok(NpcState {
        id,
        name,
        avatar,
        age_months,
        vitals,
        skills,
        district,
        tags,
        affiliations,
        origin: NpcOrigin::Template {
            template_id: template_id.to_string(),
            seed: opts.seed,
        },
    })
}

/// Roll one NPC from a template chosen uniformly (from `opts.template_ids`
/// when given, otherwise from every template).
pub fn generate_random_npc<R: RngCore + ?Sized>(
    tables: &ContentTables,
    opts: &NpcGenOptions,
    rng: &mut R,
) -> SimResult<NpcState> {
    let ids: Vec<&str> = if opts.template_ids.is_empty() {
        tables.npc_templates.iter().map(|t| t.id.as_str()).collect()
    } else {
        opts.template_ids.iter().map(String::as_str).collect()
    };
    let template_id = *pick(rng, &ids).ok_or(SimError::NoTemplates)?;
    generate_npc_from_template(tables, template_id, opts, rng)
}

/// Turn a hand-authored profile into an NPC. Its id is the profile id.
pub fn npc_from_profile(profile: &UniqueProfile, opts: &NpcGenOptions) -> NpcState {
    NpcState {
        id: profile.id.clone(),
        name: profile.name.clone(),
        avatar: profile.avatar.clone(),
        age_months: profile.age_years * 12,
        vitals: profile.vitals.clone(),
        skills: profile.skills.clone(),
        district: opts.district.clone().or_else(|| profile.district.clone()),
        tags: profile.tags.clone(),
        affiliations: profile.affiliations.clone(),
        origin: NpcOrigin::Unique {
            profile_id: profile.id.clone(),
        },
    }
}

/// Roll `n` NPCs. With `allow_unique`, each slot has `unique_chance` of being
/// an unused hand-authored profile instead.
pub fn generate_npc_batch<R: RngCore + ?Sized>(
    tables: &ContentTables,
    n: usize,
    opts: &NpcGenOptions,
    rng: &mut R,
) -> SimResult<Vec<NpcState>> {
    let mut used = opts.used_profiles.clone();
    let mut batch = Vec::with_capacity(n);
    for _ in 0..n {
        if opts.allow_unique && sw_mechanics::chance(rng, opts.unique_chance) {
            let free: Vec<&UniqueProfile> = tables
                .unique_profiles
                .iter()
                .filter(|p| !used.contains(&p.id))
                .collect();
            if let Some(profile) = pick(rng, &free) {
                used.insert(profile.id.clone());
                batch.push(npc_from_profile(profile, opts));
                continue;
            }
        }
        batch.push(generate_random_npc(tables, opts, rng)?);
    }
    Ok(batch)
}

/// [`generate_npc_from_template`] with an RNG built from `opts.seed`.
pub fn generate_npc_from_template_seeded(
    tables: &ContentTables,
    template_id: &str,
    opts: &NpcGenOptions,
) -> SimResult<NpcState> {
    generate_npc_from_template(tables, template_id, opts, &mut make_rng(opts.seed))
}

/// [`generate_random_npc`] with an RNG built from `opts.seed`.
pub fn generate_random_npc_seeded(
    tables: &ContentTables,
    opts: &NpcGenOptions,
) -> SimResult<NpcState> {
    generate_random_npc(tables, opts, &mut make_rng(opts.seed))
}

/// [`generate_npc_batch`] with an RNG built from `opts.seed`.
pub fn generate_npc_batch_seeded(
    tables: &ContentTables,
    n: usize,
    opts: &NpcGenOptions,
) -> SimResult<Vec<NpcState>> {
    generate_npc_batch(tables, n, opts, &mut make_rng(opts.seed))
}
