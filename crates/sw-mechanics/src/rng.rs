//! Seedable randomness.
//!
//! Every sampler in the workspace reads a unit float through [`UnitRng`],
//! so a seeded [`Mulberry32`] replays identically and a [`FixedRng`] can
//! script exact rolls.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Mulberry32: a tiny 32-bit hash-based generator.
///
/// Same seed, same sequence, on every platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mulberry32 {
    seed: u32,
    state: u32,
}

impl Mulberry32 {
    /// A generator starting at `seed`.
    pub fn new(seed: u32) -> Self {
        Self { seed, state: seed }
    }

    /// Pick up a stream where [`Mulberry32::position`] left it.
    pub fn resume(seed: u32, position: u32) -> Self {
        Self {
            seed,
            state: position,
        }
    }

    /// The seed this generator started from.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Where the stream currently is.
    pub fn position(&self) -> u32 {
        self.state
    }

    fn step(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let a = self.state;
        let mut t = (a ^ (a >> 15)).wrapping_mul(a | 1);
        t = t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61)) ^ t;
        t ^ (t >> 14)
    }
}

impl RngCore for Mulberry32 {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        let lo = u64::from(self.step());
        let hi = u64::from(self.step());
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(4) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl SeedableRng for Mulberry32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}

/// The generator a game session carries: deterministic when seeded,
/// OS-seeded otherwise.
#[derive(Debug, Clone)]
pub enum GameRng {
    /// Replays from a seed.
    Seeded(Mulberry32),
    /// Seeded by the OS.
    Entropy(StdRng),
}

impl GameRng {
    /// The seed, if this generator is reproducible.
    pub fn seed(&self) -> Option<u32> {
        match self {
            Self::Seeded(rng) => Some(rng.seed()),
            Self::Entropy(_) => None,
        }
    }

    /// The stream position, if this generator is reproducible.
    pub fn position(&self) -> Option<u32> {
        match self {
            Self::Seeded(rng) => Some(rng.position()),
            Self::Entropy(_) => None,
        }
    }
}

impl RngCore for GameRng {
    fn next_u32(&mut self) -> u32 {
        match self {
            Self::Seeded(rng) => rng.next_u32(),
            Self::Entropy(rng) => rng.next_u32(),
        }
    }

    fn next_u64(&mut self) -> u64 {
        match self {
            Self::Seeded(rng) => rng.next_u64(),
            Self::Entropy(rng) => rng.next_u64(),
        }
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        match self {
            Self::Seeded(rng) => rng.fill_bytes(dst),
            Self::Entropy(rng) => rng.fill_bytes(dst),
        }
    }
}

/// Build a generator: `Some(seed)` replays, `None` draws from the OS.
pub fn make_rng(seed: Option<u32>) -> GameRng {
    match seed {
        Some(seed) => GameRng::Seeded(Mulberry32::new(seed)),
        None => GameRng::Entropy(StdRng::from_os_rng()),
    }
}

/// Rebuild a generator from a recorded seed and stream position. Without a
/// position the stream restarts from the seed.
pub fn resume_rng(seed: Option<u32>, position: Option<u32>) -> GameRng {
    match (seed, position) {
        (Some(seed), Some(position)) => GameRng::Seeded(Mulberry32::resume(seed, position)),
        _ => make_rng(seed),
    }
}

/// A generator that always yields the same unit value. For scripted rolls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRng(pub f64);

impl RngCore for FixedRng {
    fn next_u32(&mut self) -> u32 {
        (self.0.clamp(0.0, 1.0) * 4_294_967_296.0).min(4_294_967_295.0) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let v = u64::from(self.next_u32());
        (v << 32) | v
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        let bytes = self.next_u32().to_le_bytes();
        for chunk in dst.chunks_mut(4) {
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

/// Hash a textual seed to a numeric one (FNV-1a, 32 bit).
pub fn hash_seed(text: &str) -> u32 {
    const FNV_OFFSET: u32 = 0x811c_9dc5;
    const FNV_PRIME: u32 = 0x0100_0193;
    text.bytes().fold(FNV_OFFSET, |hash, b| {
        (hash ^ u32::from(b)).wrapping_mul(FNV_PRIME)
    })
}

/// Parse a seed given on a command line or in config: digits are used as is,
/// anything else is hashed.
pub fn parse_seed(text: &str) -> u32 {
    text.trim()
        .parse::<u32>()
        .unwrap_or_else(|_| hash_seed(text.trim()))
}

/// Unit-interval sampling on top of any [`RngCore`].
pub trait UnitRng {
    /// A float in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

impl<R: RngCore + ?Sized> UnitRng for R {
    fn next_unit(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }
}

// ---------------------------------------------------------------------------
// Sampling helpers
// ---------------------------------------------------------------------------

/// Uniform integer in `low..=high`. Bounds may be given in either order.
pub fn range_int<R: RngCore + ?Sized>(rng: &mut R, low: i64, high: i64) -> i64 {
    let (low, high) = if low <= high { (low, high) } else { (high, low) };
    let span = (high - low + 1) as f64;
    let offset = (rng.next_unit() * span).floor() as i64;
    low + offset.min(high - low)
}

/// Uniform float in `[low, high)`.
pub fn range_f64<R: RngCore + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    low + rng.next_unit() * (high - low)
}

/// A uniformly chosen element, `None` for an empty slice.
pub fn pick<'a, T, R: RngCore + ?Sized>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let idx = (rng.next_unit() * items.len() as f64).floor() as usize;
    items.get(idx.min(items.len() - 1))
}

/// An index drawn proportionally to `weights`. Negative weights count as
/// zero; `None` when nothing has positive weight.
pub fn weighted_index<R: RngCore + ?Sized>(rng: &mut R, weights: &[f64]) -> Option<usize> {
    let total: f64 = weights.iter().map(|w| w.max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }
    let mut target = rng.next_unit() * total;
    let mut last_positive = None;
    for (i, w) in weights.iter().enumerate() {
        let w = w.max(0.0);
        if w <= 0.0 {
            continue;
        }
        if target < w {
            return Some(i);
        }
        target -= w;
        last_positive = Some(i);
    }
    last_positive
}

/// Fisher-Yates shuffle in place.
pub fn shuffle<T, R: RngCore + ?Sized>(rng: &mut R, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = (rng.next_unit() * (i + 1) as f64).floor() as usize;
        items.swap(i, j.min(i));
    }
}

/// True with probability `p`.
pub fn chance<R: RngCore + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.next_unit() < p
}
