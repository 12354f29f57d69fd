//! Read-only query surface.
//!
//! Queries are a separate interface from `submit`: they take the scenario
//! lock only long enough to copy the requested slice out, and slightly
//! stale reads are acceptable to callers (pollers re-query on their next
//! interval anyway).  Uncommitted states are included — "my state is
//! WAITING" is exactly what a submitter sees while the barrier waits on a
//! sibling.

use ds_core::{AgentId, IdentityId, OrientedRect, Pose, ScenarioId, ScenarioTiming, Tick};
use ds_timeline::{AgentState, Candidate, StateStatus};

use crate::engine::CommitEngine;
use crate::error::EngineResult;
use crate::scenario::ScenarioStatus;

// ── Views ─────────────────────────────────────────────────────────────────────

/// A copied-out snapshot of one agent state at one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct StateView {
    pub agent: AgentId,
    pub tick: Tick,
    pub status: StateStatus,
    pub pose: Option<Pose>,
    pub speed_mps: Option<f64>,
    pub accel_mps2: Option<f64>,
}

impl StateView {
    fn from_state(agent: AgentId, state: &AgentState) -> Self {
        Self {
            agent,
            tick: state.tick,
            status: state.status,
            pose: state.pose,
            speed_mps: state.speed_mps,
            accel_mps2: state.accel_mps2,
        }
    }
}

/// A copied-out snapshot of one agent's static slot data.
#[derive(Clone, Debug)]
pub struct AgentView {
    pub agent: AgentId,
    pub identity: Option<IdentityId>,
    pub is_bot: bool,
    pub initial: Candidate,
    pub goal: OrientedRect,
}

// ── Query methods ─────────────────────────────────────────────────────────────

impl CommitEngine {
    pub fn scenario_status(&self, scenario: ScenarioId) -> EngineResult<ScenarioStatus> {
        self.read(scenario, |s| Ok(s.status()))
    }

    pub fn timing(&self, scenario: ScenarioId) -> EngineResult<ScenarioTiming> {
        self.read(scenario, |s| Ok(s.timing()))
    }

    /// The scenario's committed frontier (`None` before activation).
    pub fn committed_tick(&self, scenario: ScenarioId) -> EngineResult<Option<Tick>> {
        self.read(scenario, |s| Ok(s.committed_tick()))
    }

    /// Slot data for every agent, in `AgentId` order.
    pub fn agents(&self, scenario: ScenarioId) -> EngineResult<Vec<AgentView>> {
        self.read(scenario, |s| {
            Ok(s.agents()
                .iter()
                .map(|a| AgentView {
                    agent: a.id,
                    identity: a.identity,
                    is_bot: a.is_bot,
                    initial: a.initial,
                    goal: a.goal,
                })
                .collect())
        })
    }

    pub fn agent_view(&self, scenario: ScenarioId, agent: AgentId) -> EngineResult<AgentView> {
        self.read(scenario, |s| {
            let a = s.agent(agent)?;
            Ok(AgentView {
                agent: a.id,
                identity: a.identity,
                is_bot: a.is_bot,
                initial: a.initial,
                goal: a.goal,
            })
        })
    }

    /// Every known state for every agent with `from <= tick <= to`, ordered
    /// by `(tick, agent)`.  Agents with no state at a tick are absent, not
    /// defaulted.
    pub fn states(
        &self,
        scenario: ScenarioId,
        from: Tick,
        to: Tick,
    ) -> EngineResult<Vec<StateView>> {
        self.read(scenario, |s| {
            let mut out = Vec::new();
            let mut tick = from;
            while tick <= to {
                for agent in s.agents() {
                    if let Some(state) = s.timeline(agent.id)?.state_at(tick) {
                        out.push(StateView::from_state(agent.id, state));
                    }
                }
                tick = tick.next();
            }
            Ok(out)
        })
    }

    /// One agent's known states with `from <= tick <= to`, in tick order.
    pub fn agent_states(
        &self,
        scenario: ScenarioId,
        agent: AgentId,
        from: Tick,
        to: Tick,
    ) -> EngineResult<Vec<StateView>> {
        self.read(scenario, |s| {
            let timeline = s.timeline(agent)?;
            Ok(timeline
                .states()
                .iter()
                .filter(|st| st.tick >= from && st.tick <= to)
                .map(|st| StateView::from_state(agent, st))
                .collect())
        })
    }

    /// The agent's most recent committed state.  For a terminal agent this
    /// repeats the terminal state however late the query — terminal states
    /// end the sequence.  `None` before the tick-0 commit.
    pub fn latest_committed(
        &self,
        scenario: ScenarioId,
        agent: AgentId,
    ) -> EngineResult<Option<StateView>> {
        self.read(scenario, |s| {
            Ok(s.timeline(agent)?
                .latest_committed()
                .map(|st| StateView::from_state(agent, st)))
        })
    }

    /// The tick the agent's next candidate must target.
    pub fn next_expected_tick(&self, scenario: ScenarioId, agent: AgentId) -> EngineResult<Tick> {
        self.read(scenario, |s| Ok(s.timeline(agent)?.next_expected_tick()))
    }

    /// Convenience existence check used by admin surfaces.
    pub fn contains(&self, scenario: ScenarioId) -> bool {
        self.scenario_status(scenario).is_ok()
    }
}
