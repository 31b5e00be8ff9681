//! RNG oracle and per-match roll sources.
//!
//! Randomness enters combat only through [`CombatRng::sample`], tagged with the
//! [`RollKind`] that the sample controls. Production matches use
//! [`SeededRolls`], which derives every sample from the match seed and a
//! monotonically increasing nonce so that a match replays byte-for-byte from
//! its seed. Tests inject [`FixedRolls`] to pin individual roll kinds.
//!
//! # Determinism
//!
//! All oracle implementations must be deterministic: given the same seed,
//! they must produce the same value.

use strum::{EnumCount, IntoStaticStr};

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Generate a value in `[0, 1)` from a seed.
    fn unit(&self, seed: u64) -> f64 {
        f64::from(self.next_u32(seed)) / 4_294_967_296.0
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR variant: 32-bit output from 64-bit state. Same seed always
/// produces the same output.
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Advance the PCG state by one step.
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// PCG output function using XSH-RR (xorshift high, random rotate).
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        let state = Self::pcg_step(seed);
        Self::pcg_output(state)
    }
}

/// What a random sample controls.
///
/// The discriminant is mixed into the seed so that, for the same nonce,
/// different kinds never share a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumCount, IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RollKind {
    /// Hit check against the clamped hit chance.
    Hit,
    /// Crit check against attacker crit chance.
    Crit,
    /// Symmetric damage variance.
    Variance,
    /// Block check against defender block chance.
    Block,
    /// Chance gate of an on-hit effect.
    Effect,
    /// Stat variance for generated creatures.
    Creature,
}

/// Source of random samples for one match.
///
/// Every sample is a value in `[0, 1)`. A check succeeds when the sample is
/// strictly below the chance being tested.
pub trait CombatRng {
    fn sample(&mut self, kind: RollKind) -> f64;

    /// Returns true when a fresh sample of `kind` falls below `chance`.
    fn check(&mut self, kind: RollKind, chance: f64) -> bool {
        self.sample(kind) < chance
    }

    /// Returns a multiplier in `[1 - spread, 1 + spread]`.
    fn variance(&mut self, spread: f64) -> f64 {
        1.0 - spread + self.sample(RollKind::Variance) * 2.0 * spread
    }
}

impl<R: CombatRng + ?Sized> CombatRng for &mut R {
    fn sample(&mut self, kind: RollKind) -> f64 {
        (**self).sample(kind)
    }
}

/// Seeded roll source threading the match seed through an [`RngOracle`].
#[derive(Clone, Debug)]
pub struct SeededRolls<R: RngOracle = PcgRng> {
    oracle: R,
    match_seed: u64,
    nonce: u64,
}

impl SeededRolls<PcgRng> {
    pub fn new(match_seed: u64) -> Self {
        Self::with_oracle(PcgRng, match_seed)
    }
}

impl<R: RngOracle> SeededRolls<R> {
    pub fn with_oracle(oracle: R, match_seed: u64) -> Self {
        Self {
            oracle,
            match_seed,
            nonce: 0,
        }
    }

    pub fn match_seed(&self) -> u64 {
        self.match_seed
    }

    /// Number of samples drawn so far.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }
}

impl<R: RngOracle> CombatRng for SeededRolls<R> {
    fn sample(&mut self, kind: RollKind) -> f64 {
        let seed = compute_seed(self.match_seed, self.nonce, kind as u32);
        self.nonce += 1;
        self.oracle.unit(seed)
    }
}

/// Roll source returning a fixed value per [`RollKind`].
///
/// Useful for pinning outcomes: `0.0` passes every check, values at or above
/// `1.0` fail every check, `0.5` yields a neutral variance roll.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedRolls {
    values: [f64; RollKind::COUNT],
}

impl FixedRolls {
    /// Every kind returns `value`.
    pub fn uniform(value: f64) -> Self {
        Self {
            values: [value; RollKind::COUNT],
        }
    }

    /// Every check passes and variance is neutral.
    pub fn always() -> Self {
        Self::uniform(0.0).with(RollKind::Variance, 0.5)
    }

    /// Every check fails and variance is neutral.
    pub fn never() -> Self {
        Self::uniform(1.0).with(RollKind::Variance, 0.5)
    }

    /// Overrides the value returned for `kind` (builder pattern).
    #[must_use]
    pub fn with(mut self, kind: RollKind, value: f64) -> Self {
        self.values[kind as usize] = value;
        self
    }
}

impl CombatRng for FixedRolls {
    fn sample(&mut self, kind: RollKind) -> f64 {
        self.values[kind as usize]
    }
}

/// Compute deterministic seed from match components.
///
/// # Arguments
///
/// * `match_seed` - Seed assigned to the match (for replay/determinism)
/// * `nonce` - Sample sequence number within the match, or match index in a batch
/// * `context` - Distinguishes independent rolls sharing a nonce
pub fn compute_seed(match_seed: u64, nonce: u64, context: u32) -> u64 {
    // SplitMix64 / FxHash style combiners
    let mut hash = match_seed;

    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    // Final avalanche step
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}
