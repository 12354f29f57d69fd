//! Deterministic per-driver RNG.
//!
//! # Determinism strategy
//!
//! Each bot driver gets its own independent `SmallRng` seeded by:
//!
//!   seed = global_seed XOR mix(scenario_id) XOR mix(agent_id)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive IDs uniformly across the seed space.  This
//! means:
//!
//! - Drivers never share RNG state (no contention, no ordering dependency).
//! - Replaying a scenario with the same global seed reproduces every
//!   planner choice, regardless of how submissions interleaved.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{AgentId, ScenarioId};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-driver deterministic RNG.
///
/// Create one per bot poller at dispatch time.  The type is `!Sync` to
/// prevent accidental sharing across tasks — each poller owns its RNG.
pub struct DriverRng(SmallRng);

impl DriverRng {
    /// Seed deterministically from the deployment's global seed, the
    /// scenario, and the agent slot.
    pub fn new(global_seed: u64, scenario: ScenarioId, agent: AgentId) -> Self {
        let seed = global_seed
            ^ scenario.0.wrapping_mul(MIXING_CONSTANT)
            ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT).rotate_left(32);
        DriverRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
