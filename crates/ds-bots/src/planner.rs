//! Trajectory planners — the candidate source behind every bot submission.

use ds_core::{AgentId, DriverRng, OrientedRect, Pose, ScenarioId, Tick};
use ds_timeline::Candidate;

/// Everything a planner may look at when proposing the next state.
#[derive(Clone, Debug)]
pub struct PlannerInput {
    pub scenario: ScenarioId,
    pub agent: AgentId,
    /// The tick the proposed candidate will be submitted for.
    pub tick: Tick,
    /// The agent's most recent known pose (committed or queued).
    pub pose: Pose,
    pub speed_mps: f64,
    pub goal: OrientedRect,
    pub tick_duration_secs: f64,
}

/// A black-box source of per-tick candidates.
///
/// How a planner computes geometry is outside the coordinator's scope; it
/// may be as simple as [`GreedyPlanner`] or wrap a full road-network
/// planning stack.  Implementations may be non-deterministic — the engine
/// never assumes otherwise.  All randomness must come from the supplied
/// [`DriverRng`] so a run can be replayed from its seed.
pub trait TrajectoryPlanner: Send + Sync + 'static {
    fn propose(&self, input: &PlannerInput, rng: &mut DriverRng) -> Candidate;
}

// ── GreedyPlanner ─────────────────────────────────────────────────────────────

/// Reference planner: drive straight at the goal center at cruise speed.
///
/// The heading gets a uniform random offset of up to
/// `heading_jitter_rad` each tick.  This is the explicitly non-deterministic
/// choice at the planning boundary — a stand-in for "pick any admissible
/// road segment" in a real planner.  Set it to `0.0` for reproducible
/// reference runs.
#[derive(Clone, Debug)]
pub struct GreedyPlanner {
    pub cruise_speed_mps: f64,
    pub heading_jitter_rad: f64,
}

impl Default for GreedyPlanner {
    fn default() -> Self {
        Self { cruise_speed_mps: 8.0, heading_jitter_rad: 0.05 }
    }
}

impl TrajectoryPlanner for GreedyPlanner {
    fn propose(&self, input: &PlannerInput, rng: &mut DriverRng) -> Candidate {
        let dx = input.goal.center_x - input.pose.x;
        let dy = input.goal.center_y - input.pose.y;
        let distance = (dx * dx + dy * dy).sqrt();
        let step = self.cruise_speed_mps * input.tick_duration_secs;

        if distance <= step {
            // Close enough to park on the goal center this tick.
            let arrival_speed = distance / input.tick_duration_secs;
            let pose = Pose::new(
                input.goal.center_x,
                input.goal.center_y,
                input.goal.rotation_rad,
            );
            let accel = (arrival_speed - input.speed_mps) / input.tick_duration_secs;
            return Candidate::new(pose, arrival_speed, accel);
        }

        let mut heading = dy.atan2(dx);
        if self.heading_jitter_rad > 0.0 {
            heading += rng.gen_range(-self.heading_jitter_rad..self.heading_jitter_rad);
        }
        let (sin, cos) = heading.sin_cos();
        let pose = Pose::new(input.pose.x + step * cos, input.pose.y + step * sin, heading);
        let accel = (self.cruise_speed_mps - input.speed_mps) / input.tick_duration_secs;
        Candidate::new(pose, self.cruise_speed_mps, accel)
    }
}
