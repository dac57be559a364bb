//! Dice and stat checks for Streetwise.
//!
//! Provides a seedable generator ([`Mulberry32`] behind [`GameRng`]),
//! unit-float sampling helpers, and the d20 stat check that
//! maps a 0..=100 subskill onto a small flat bonus.

/// The d20 stat check.
pub mod check;
/// The d20 roll.
pub mod dice;
/// Error types.
pub mod error;
/// Seedable generators and sampling helpers.
pub mod rng;

pub use check::{
    BonusMapping, Critical, StatCheckRequest, StatCheckResult, perform_stat_check, scaled_bonus,
    sub_skill_to_bonus,
};
pub use dice::{D20_SIDES, roll_d20};
pub use error::{MechError, MechResult};
pub use rng::{
    FixedRng, GameRng, Mulberry32, UnitRng, chance, hash_seed, make_rng, parse_seed, pick,
    range_f64, range_int, resume_rng, shuffle, weighted_index,
};
