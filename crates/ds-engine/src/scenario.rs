//! The per-scenario state machine and barrier-commit logic.
//!
//! Everything in this module runs inside the owning scenario's critical
//! section — `Scenario` methods assume exclusive access and communicate
//! outward only through the event buffer their callers hand in.  The
//! [`CommitEngine`][crate::CommitEngine] owns locking and event publishing.

use ds_core::{AgentId, ScenarioId, ScenarioTiming, Tick};
use ds_detect::VehicleSpec;
use ds_timeline::{Candidate, StateStatus, Timeline};

use crate::agent::{Agent, AgentSpec};
use crate::engine::SubmitReceipt;
use crate::error::{EngineError, EngineResult};
use crate::events::{CloseReason, CommittedState, EngineEvent};

// ── ScenarioStatus ────────────────────────────────────────────────────────────

/// Scenario lifecycle.  Monotonically non-decreasing — a scenario never
/// moves backwards, and every write goes through
/// [`Scenario::set_status`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScenarioStatus {
    /// Created; slot binding has not been examined yet.
    Pending,
    /// At least one human slot is still unbound.
    Waiting,
    /// All slots bound, tick 0 committed, submissions open.
    Active,
    /// Closed by the termination policy.  Terminal.
    Done,
}

impl ScenarioStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ScenarioStatus::Pending => "pending",
            ScenarioStatus::Waiting => "waiting",
            ScenarioStatus::Active => "active",
            ScenarioStatus::Done => "done",
        }
    }
}

impl std::fmt::Display for ScenarioStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── ScenarioSpec ──────────────────────────────────────────────────────────────

/// Creation-time description of a scenario: timing plus agent slots.
///
/// Built by hand or through [`ScenarioBuilder`][crate::ScenarioBuilder].
#[derive(Clone, Debug)]
pub struct ScenarioSpec {
    pub timing: ScenarioTiming,
    pub slots: Vec<AgentSpec>,
}

// ── Scenario ──────────────────────────────────────────────────────────────────

/// One scenario's complete mutable state: status, agents, and timelines.
///
/// `agents` and `timelines` are parallel `Vec`s indexed by `AgentId`.
pub(crate) struct Scenario {
    id: ScenarioId,
    timing: ScenarioTiming,
    vehicle: VehicleSpec,
    status: ScenarioStatus,
    agents: Vec<Agent>,
    timelines: Vec<Timeline>,
    /// The global clock: the last tick committed for the lock-step group.
    committed_tick: Option<Tick>,
}

impl Scenario {
    pub(crate) fn new(
        id: ScenarioId,
        spec: ScenarioSpec,
        vehicle: VehicleSpec,
    ) -> EngineResult<Self> {
        if spec.slots.is_empty() {
            return Err(EngineError::InvalidScenario(
                "scenario needs at least one agent slot".into(),
            ));
        }
        if !spec.timing.is_valid() {
            return Err(EngineError::InvalidScenario(format!(
                "timing must be finite and positive (got {})",
                spec.timing
            )));
        }

        let agents: Vec<Agent> = spec
            .slots
            .into_iter()
            .enumerate()
            .map(|(i, slot)| Agent::from_spec(AgentId(i as u32), slot))
            .collect();
        let timelines = agents.iter().map(|_| Timeline::new()).collect();

        Ok(Self {
            id,
            timing: spec.timing,
            vehicle,
            status: ScenarioStatus::Pending,
            agents,
            timelines,
            committed_tick: None,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub(crate) fn status(&self) -> ScenarioStatus {
        self.status
    }

    pub(crate) fn timing(&self) -> ScenarioTiming {
        self.timing
    }

    pub(crate) fn committed_tick(&self) -> Option<Tick> {
        self.committed_tick
    }

    pub(crate) fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub(crate) fn agent(&self, agent: AgentId) -> EngineResult<&Agent> {
        self.agents
            .get(agent.index())
            .ok_or(EngineError::AgentNotFound { scenario: self.id, agent })
    }

    pub(crate) fn timeline(&self, agent: AgentId) -> EngineResult<&Timeline> {
        self.timelines
            .get(agent.index())
            .ok_or(EngineError::AgentNotFound { scenario: self.id, agent })
    }

    // ── Binding and activation ────────────────────────────────────────────

    /// Bind `identity` to an agent slot.  Identities are immutable once set,
    /// and binding only makes sense before activation (afterwards every slot
    /// is bound by definition).
    pub(crate) fn bind(&mut self, agent: AgentId, identity: ds_core::IdentityId) -> EngineResult<()> {
        if self.status == ScenarioStatus::Done {
            return Err(EngineError::ScenarioClosed(self.id));
        }
        let id = self.id;
        let slot = self
            .agents
            .get_mut(agent.index())
            .ok_or(EngineError::AgentNotFound { scenario: id, agent })?;
        if slot.identity.is_some() {
            return Err(EngineError::SlotAlreadyBound { scenario: id, agent });
        }
        slot.identity = Some(identity);
        Ok(())
    }

    /// Activate if every slot is bound; otherwise record WAITING and return
    /// [`EngineError::SlotUnbound`] naming the first offender.
    ///
    /// Activation commits every agent's tick-0 state through the detector
    /// pipeline — agents whose initial footprints already overlap crash at
    /// tick 0 — and announces bot dispatch.  Idempotent on an ACTIVE
    /// scenario.
    pub(crate) fn try_activate(&mut self, events: &mut Vec<EngineEvent>) -> EngineResult<()> {
        match self.status {
            ScenarioStatus::Done => return Err(EngineError::ScenarioClosed(self.id)),
            ScenarioStatus::Active => return Ok(()),
            ScenarioStatus::Pending | ScenarioStatus::Waiting => {}
        }

        if let Some(unbound) = self.agents.iter().find(|a| !a.is_bound()) {
            let agent = unbound.id;
            self.set_status(ScenarioStatus::Waiting);
            return Err(EngineError::SlotUnbound { scenario: self.id, agent });
        }

        self.set_status(ScenarioStatus::Active);
        events.push(EngineEvent::ScenarioActivated {
            scenario: self.id,
            bots: self
                .agents
                .iter()
                .filter(|a| a.is_bot)
                .map(|a| a.id)
                .collect(),
        });

        let initial: Vec<(AgentId, Candidate)> =
            self.agents.iter().map(|a| (a.id, a.initial)).collect();
        self.commit_step(Tick::ZERO, initial, events)?;
        self.evaluate_closure(events);
        Ok(())
    }

    // ── Submission ────────────────────────────────────────────────────────

    /// Append candidates for `agent` starting at `from_tick`, then advance
    /// the barrier as far as it will go.
    ///
    /// A multi-tick batch is normalized into sequential single-tick appends.
    /// The first rejection aborts the remainder of the batch but keeps the
    /// ticks already accepted — and the barrier still advances for them
    /// before the rejection is returned, so a bad tail can never stall a
    /// tick its head just satisfied.
    pub(crate) fn submit(
        &mut self,
        agent: AgentId,
        from_tick: Tick,
        candidates: &[Candidate],
        events: &mut Vec<EngineEvent>,
    ) -> EngineResult<SubmitReceipt> {
        match self.status {
            ScenarioStatus::Done => return Err(EngineError::ScenarioClosed(self.id)),
            ScenarioStatus::Pending | ScenarioStatus::Waiting => {
                return Err(EngineError::ScenarioNotStarted(self.id));
            }
            ScenarioStatus::Active => {}
        }
        let id = self.id;
        let timeline = self
            .timelines
            .get_mut(agent.index())
            .ok_or(EngineError::AgentNotFound { scenario: id, agent })?;

        let mut accepted = 0u32;
        let mut rejection = None;
        for (i, candidate) in candidates.iter().enumerate() {
            match timeline.append_candidate(from_tick + i as u64, *candidate) {
                Ok(()) => accepted += 1,
                Err(e) => {
                    rejection = Some(e);
                    break;
                }
            }
        }

        if accepted > 0 {
            self.advance(events)?;
        }
        match rejection {
            Some(e) => Err(e.into()),
            None => Ok(SubmitReceipt {
                accepted,
                committed_through: self.committed_tick,
            }),
        }
    }

    // ── Barrier ───────────────────────────────────────────────────────────

    /// Commit every tick whose barrier is satisfied.  One submission can
    /// cascade several commits when it was the last input needed for ticks
    /// its siblings had already queued.
    fn advance(&mut self, events: &mut Vec<EngineEvent>) -> EngineResult<()> {
        while self.status == ScenarioStatus::Active {
            let Some(next) = self.next_barrier_tick() else { break };
            let Some(participants) = self.barrier_candidates(next) else { break };
            self.commit_step(next, participants, events)?;
            self.evaluate_closure(events);
        }
        Ok(())
    }

    /// The earliest tick at which some non-terminal agent is still behind:
    /// one past the minimum committed frontier.  `None` once every agent is
    /// terminal.
    fn next_barrier_tick(&self) -> Option<Tick> {
        self.timelines
            .iter()
            .filter(|t| !t.is_terminal())
            .map(|t| t.committed_frontier().map_or(Tick::ZERO, Tick::next))
            .min()
    }

    /// The complete set of candidates for `tick`, or `None` while any
    /// non-terminal agent has not queued one (barrier unsatisfied).
    /// Terminal agents are exempt.
    fn barrier_candidates(&self, tick: Tick) -> Option<Vec<(AgentId, Candidate)>> {
        let mut participants = Vec::with_capacity(self.agents.len());
        for agent in &self.agents {
            let timeline = &self.timelines[agent.id.index()];
            if timeline.is_terminal() {
                continue;
            }
            let candidate = timeline
                .state_at(tick)
                .filter(|s| s.status == StateStatus::Waiting)
                .and_then(|s| s.candidate())?;
            participants.push((agent.id, candidate));
        }
        Some(participants)
    }

    /// Atomically decide and commit one tick's outcomes for all
    /// participants: collision set → CRASHED, else goal overlap →
    /// GOAL_REACHED, else ACTIVE.
    ///
    /// A `NotWaiting` from the timeline here means the barrier proof and the
    /// commit disagree — a bug.  It aborts the commit loudly.
    fn commit_step(
        &mut self,
        tick: Tick,
        participants: Vec<(AgentId, Candidate)>,
        events: &mut Vec<EngineEvent>,
    ) -> EngineResult<()> {
        let poses: Vec<_> = participants.iter().map(|(a, c)| (*a, c.pose)).collect();
        let conflicted = ds_detect::detect(&poses, &self.vehicle);

        let mut committed = Vec::with_capacity(participants.len());
        let mut terminals = Vec::new();
        for (agent, candidate) in participants {
            let status = if conflicted.contains(&agent) {
                StateStatus::Crashed
            } else if ds_detect::reached(
                &candidate.pose,
                &self.agents[agent.index()].goal,
                &self.vehicle,
            ) {
                StateStatus::GoalReached
            } else {
                StateStatus::Active
            };

            if let Err(source) = self.timelines[agent.index()].commit(tick, status, &candidate) {
                log::error!(
                    "scenario {}: commit of {tick} for agent {agent} found a non-commitable state: {source}",
                    self.id
                );
                return Err(EngineError::Internal { scenario: self.id, agent, tick, source });
            }

            if status.is_terminal() {
                terminals.push(EngineEvent::AgentTerminal {
                    scenario: self.id,
                    agent,
                    tick,
                    status,
                });
            }
            committed.push(CommittedState {
                agent,
                status,
                pose: candidate.pose,
                speed_mps: candidate.speed_mps,
                accel_mps2: candidate.accel_mps2,
            });
        }

        self.committed_tick = Some(tick);
        events.push(EngineEvent::TickCommitted { scenario: self.id, tick, states: committed });
        events.extend(terminals);
        Ok(())
    }

    // ── Closure ───────────────────────────────────────────────────────────

    /// `ACTIVE → DONE` check, run after every committed tick.
    fn evaluate_closure(&mut self, events: &mut Vec<EngineEvent>) {
        if self.status != ScenarioStatus::Active {
            return;
        }
        if self.timelines.iter().all(Timeline::is_terminal) {
            self.close(CloseReason::AllTerminal, events);
        } else if self.committed_tick >= Some(self.timing.final_tick()) {
            // Survivors keep their last ACTIVE state — no forced outcome.
            self.close(CloseReason::DurationReached, events);
        }
    }

    /// Wall-clock expiry (termination policy for stalled scenarios).  The
    /// scenario supervisor calls this when the configured duration elapses;
    /// returns `false` if the scenario had already closed.
    pub(crate) fn expire(&mut self, events: &mut Vec<EngineEvent>) -> bool {
        if self.status == ScenarioStatus::Done {
            return false;
        }
        self.close(CloseReason::Expired, events);
        true
    }

    fn close(&mut self, reason: CloseReason, events: &mut Vec<EngineEvent>) {
        self.set_status(ScenarioStatus::Done);
        log::debug!(
            "scenario {} closed ({reason}) at {:?}",
            self.id,
            self.committed_tick
        );
        events.push(EngineEvent::ScenarioClosed {
            scenario: self.id,
            final_tick: self.committed_tick,
            reason,
        });
    }

    /// The only status write.  Statuses move forward, never back.
    fn set_status(&mut self, next: ScenarioStatus) {
        debug_assert!(next >= self.status, "scenario status must not revert");
        self.status = next;
    }
}
