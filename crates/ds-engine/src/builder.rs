//! Fluent builder for `ScenarioSpec`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ds_core::{OrientedRect, Pose, ScenarioTiming};
//! use ds_engine::ScenarioBuilder;
//! use ds_timeline::Candidate;
//!
//! let spec = ScenarioBuilder::new(ScenarioTiming::new(0.5, 60.0))
//!     .human(Candidate::stationary(start_a), goal_a)
//!     .bot(Candidate::stationary(start_b), goal_b)
//!     .build();
//! let id = engine.create_scenario(spec)?;
//! ```

use ds_core::{IdentityId, OrientedRect, ScenarioTiming};
use ds_timeline::Candidate;

use crate::agent::AgentSpec;
use crate::scenario::ScenarioSpec;

/// Fluent builder for [`ScenarioSpec`].
///
/// Slots are assigned `AgentId`s in call order.  Validation (non-empty
/// slots, positive timing) happens at
/// [`CommitEngine::create_scenario`][crate::CommitEngine::create_scenario],
/// not here.
pub struct ScenarioBuilder {
    timing: ScenarioTiming,
    slots: Vec<AgentSpec>,
}

impl ScenarioBuilder {
    pub fn new(timing: ScenarioTiming) -> Self {
        Self { timing, slots: Vec::new() }
    }

    /// Add an unbound human slot; the scenario will park in WAITING until
    /// an identity is bound to it.
    pub fn human(mut self, initial: Candidate, goal: OrientedRect) -> Self {
        self.slots.push(AgentSpec::human(initial, goal));
        self
    }

    /// Add a human slot with its identity already known.
    pub fn bound_human(
        mut self,
        identity: IdentityId,
        initial: Candidate,
        goal: OrientedRect,
    ) -> Self {
        let mut slot = AgentSpec::human(initial, goal);
        slot.identity = Some(identity);
        self.slots.push(slot);
        self
    }

    /// Add a bot slot.  Bots are system-driven and never block activation.
    pub fn bot(mut self, initial: Candidate, goal: OrientedRect) -> Self {
        self.slots.push(AgentSpec::bot(initial, goal));
        self
    }

    pub fn build(self) -> ScenarioSpec {
        ScenarioSpec { timing: self.timing, slots: self.slots }
    }
}
