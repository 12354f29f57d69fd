//! Per-tick agent state: status tags, committed values, and candidates.

use ds_core::{Pose, Tick};

// ── StateStatus ───────────────────────────────────────────────────────────────

/// Lifecycle tag of one agent state at one tick.
///
/// A state is born PENDING (the tick-0 placeholder) or WAITING (a submitted
/// candidate), and is mutated exactly once — by the commit engine — into one
/// of the three committed statuses.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateStatus {
    /// Placeholder created with the agent; only ever exists at tick 0.
    Pending,
    /// Submitted candidate, not yet reconciled by the barrier.
    Waiting,
    /// Committed: the agent is still driving.
    Active,
    /// Committed terminal: the agent was in a collision at this tick.
    Crashed,
    /// Committed terminal: the agent's footprint reached its goal region.
    GoalReached,
}

impl StateStatus {
    /// CRASHED or GOAL_REACHED — sticky, no further states follow.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, StateStatus::Crashed | StateStatus::GoalReached)
    }

    /// ACTIVE, CRASHED, or GOAL_REACHED — finalized by the commit engine.
    #[inline]
    pub fn is_committed(self) -> bool {
        matches!(
            self,
            StateStatus::Active | StateStatus::Crashed | StateStatus::GoalReached
        )
    }

    /// Stable lowercase name for logs and recorded output.
    pub fn as_str(self) -> &'static str {
        match self {
            StateStatus::Pending => "pending",
            StateStatus::Waiting => "waiting",
            StateStatus::Active => "active",
            StateStatus::Crashed => "crashed",
            StateStatus::GoalReached => "goal_reached",
        }
    }
}

impl std::fmt::Display for StateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Candidate ─────────────────────────────────────────────────────────────────

/// One submitted per-tick state: pose plus kinematics.
///
/// Opaque to the coordinator — how a driver computed it is the external
/// planning collaborator's business.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Candidate {
    pub pose: Pose,
    pub speed_mps: f64,
    pub accel_mps2: f64,
}

impl Candidate {
    pub fn new(pose: Pose, speed_mps: f64, accel_mps2: f64) -> Self {
        Self { pose, speed_mps, accel_mps2 }
    }

    /// A standing-still candidate, used for agents spawned without motion.
    pub fn stationary(pose: Pose) -> Self {
        Self { pose, speed_mps: 0.0, accel_mps2: 0.0 }
    }
}

// ── AgentState ────────────────────────────────────────────────────────────────

/// The state of one agent at one tick.
///
/// Pose and kinematics are optional until committed: the tick-0 PENDING
/// placeholder carries none, a WAITING state carries the submitted
/// candidate's values, and a committed state's values are frozen forever.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentState {
    pub tick: Tick,
    pub status: StateStatus,
    pub pose: Option<Pose>,
    pub speed_mps: Option<f64>,
    pub accel_mps2: Option<f64>,
}

impl AgentState {
    /// The PENDING placeholder created alongside the agent (tick 0 only).
    pub fn placeholder() -> Self {
        Self {
            tick: Tick::ZERO,
            status: StateStatus::Pending,
            pose: None,
            speed_mps: None,
            accel_mps2: None,
        }
    }

    /// A WAITING state carrying a submitted candidate.
    pub fn waiting(tick: Tick, candidate: Candidate) -> Self {
        Self {
            tick,
            status: StateStatus::Waiting,
            pose: Some(candidate.pose),
            speed_mps: Some(candidate.speed_mps),
            accel_mps2: Some(candidate.accel_mps2),
        }
    }

    /// The candidate values held by a WAITING state, if any.
    pub fn candidate(&self) -> Option<Candidate> {
        match (self.pose, self.speed_mps, self.accel_mps2) {
            (Some(pose), Some(speed), Some(accel)) => Some(Candidate::new(pose, speed, accel)),
            _ => None,
        }
    }
}
