//! Scenario time model.
//!
//! # Design
//!
//! Time within a scenario is a monotonically increasing `Tick` counter.  A
//! scenario's configured duration may be fractional seconds; it is quantized
//! to an integer tick count once, at configuration time:
//!
//!   final_tick = ceil(duration_secs / tick_duration_secs)
//!
//! Using an integer tick as the canonical time unit means the barrier and
//! closure arithmetic is exact (no floating-point drift) and comparisons are
//! O(1).  The wall-clock side of the duration (the expiry deadline for
//! scenarios whose agents stop submitting) is exposed as a
//! `std::time::Duration` and consumed by the scenario supervisor, never by
//! the commit path itself.

use std::fmt;
use std::time::Duration;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter within one scenario.
///
/// Stored as `u64`: scenarios are short-lived (seconds to minutes of
/// sub-second ticks), so this never comes close to wrapping.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// The tick immediately after `self`.
    #[inline]
    pub fn next(self) -> Tick {
        Tick(self.0 + 1)
    }

    /// Ticks elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── ScenarioTiming ────────────────────────────────────────────────────────────

/// A scenario's time configuration: tick resolution and total duration.
///
/// Typically loaded from a TOML/JSON scenario template by the application
/// layer and passed to the engine at scenario creation.  Cheap to copy,
/// holds no heap data.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioTiming {
    /// How many real seconds one tick represents (e.g. 0.5).  Must be > 0.
    pub tick_duration_secs: f64,

    /// Total scenario duration in seconds.  May be fractional; quantized to
    /// ticks by [`final_tick`](Self::final_tick).  Must be > 0.
    pub duration_secs: f64,
}

impl ScenarioTiming {
    pub fn new(tick_duration_secs: f64, duration_secs: f64) -> Self {
        Self { tick_duration_secs, duration_secs }
    }

    /// `true` iff both fields are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.tick_duration_secs.is_finite()
            && self.tick_duration_secs > 0.0
            && self.duration_secs.is_finite()
            && self.duration_secs > 0.0
    }

    /// The last tick index that may ever commit (rounds up — a partial final
    /// step still counts as a full tick).  Always ≥ 1 for valid timing.
    pub fn final_tick(&self) -> Tick {
        let ticks = (self.duration_secs / self.tick_duration_secs).ceil();
        Tick((ticks as u64).max(1))
    }

    /// The wall-clock duration after which a still-open scenario expires.
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration_secs)
    }

    /// The wall-clock length of one tick.
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(self.tick_duration_secs)
    }
}

impl fmt::Display for ScenarioTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}s @ {}s/tick (final {})",
            self.duration_secs,
            self.tick_duration_secs,
            self.final_tick()
        )
    }
}
