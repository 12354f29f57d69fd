//! The `CommitEngine` — scenario registry, locking, and entry points.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex, RwLock};

use ds_core::{AgentId, IdentityId, ScenarioId, Tick};
use ds_detect::VehicleSpec;
use ds_timeline::Candidate;
use rustc_hash::FxHashMap;

use crate::error::{EngineError, EngineResult};
use crate::events::{ChannelSink, EngineEvent, EventBus, EventSink};
use crate::scenario::{Scenario, ScenarioSpec, ScenarioStatus};

// ── Configuration ─────────────────────────────────────────────────────────────

/// Deployment-wide engine settings, loaded from configuration by the
/// application layer.
#[derive(Clone, Debug, Default)]
pub struct EngineConfig {
    /// Vehicle footprint used by both detectors for every agent.
    pub vehicle: VehicleSpec,
}

/// What a successful `submit` tells the caller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SubmitReceipt {
    /// How many candidate ticks were accepted from the batch.
    pub accepted: u32,
    /// The scenario's committed frontier after the barrier advanced.
    pub committed_through: Option<Tick>,
}

// ── CommitEngine ──────────────────────────────────────────────────────────────

struct ScenarioCell {
    state: Mutex<Scenario>,
}

/// The multi-scenario commit engine.
///
/// # Locking model
///
/// The registry is an `RwLock` map of `Arc`'d cells; each cell guards its
/// scenario with its own `Mutex`.  A submission takes the registry read
/// lock just long enough to clone the `Arc`, then runs append + barrier
/// advance entirely under that one scenario's mutex — submissions for
/// different scenarios never contend.  Within the critical section the work
/// is short and CPU-bound (a bounded number of rectangle tests), so callers
/// that arrive mid-commit simply wait for the lock.
///
/// Events collected during a critical section are published only after the
/// scenario mutex is released; subscribers can never block a commit.
pub struct CommitEngine {
    config: EngineConfig,
    scenarios: RwLock<FxHashMap<ScenarioId, Arc<ScenarioCell>>>,
    next_scenario: AtomicU64,
    bus: EventBus,
}

impl CommitEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            scenarios: RwLock::new(FxHashMap::default()),
            next_scenario: AtomicU64::new(0),
            bus: EventBus::new(),
        }
    }

    /// The configured vehicle footprint.
    pub fn vehicle(&self) -> VehicleSpec {
        self.config.vehicle
    }

    // ── Subscriptions ─────────────────────────────────────────────────────

    /// Subscribe with a channel; the returned receiver sees every event
    /// published after this call, across all scenarios.
    pub fn subscribe(&self) -> mpsc::Receiver<EngineEvent> {
        let (tx, rx) = mpsc::channel();
        self.bus.register(Box::new(ChannelSink::new(tx)));
        rx
    }

    /// Subscribe with a custom non-blocking sink.
    pub fn subscribe_with(&self, sink: Box<dyn EventSink>) {
        self.bus.register(sink);
    }

    // ── Scenario lifecycle ────────────────────────────────────────────────

    /// Create a scenario from `spec`.
    ///
    /// All-bot (or pre-bound) scenarios activate synchronously before this
    /// returns; scenarios with unbound human slots park in WAITING until
    /// [`bind_agent`](Self::bind_agent) supplies the last identity.
    pub fn create_scenario(&self, spec: ScenarioSpec) -> EngineResult<ScenarioId> {
        let id = ScenarioId(self.next_scenario.fetch_add(1, Ordering::Relaxed));
        let mut scenario = Scenario::new(id, spec, self.config.vehicle)?;

        let mut events = Vec::new();
        match scenario.try_activate(&mut events) {
            Ok(()) => {}
            Err(EngineError::SlotUnbound { .. }) => {} // parked in WAITING
            Err(e) => return Err(e),
        }

        self.scenarios
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(id, Arc::new(ScenarioCell { state: Mutex::new(scenario) }));
        // Published after the registry insert so subscribers can query the
        // scenario the moment they see its activation.
        self.bus.publish(events);
        Ok(id)
    }

    /// Bind `identity` to a slot.  Returns `true` if this was the last
    /// unbound slot and the scenario activated.
    pub fn bind_agent(
        &self,
        scenario: ScenarioId,
        agent: AgentId,
        identity: IdentityId,
    ) -> EngineResult<bool> {
        self.mutate(scenario, |s, events| {
            s.bind(agent, identity)?;
            match s.try_activate(events) {
                Ok(()) => Ok(true),
                Err(EngineError::SlotUnbound { .. }) => Ok(false),
                Err(e) => Err(e),
            }
        })
    }

    /// Re-check activation explicitly.  Errors with
    /// [`EngineError::SlotUnbound`] naming the first unbound slot.
    pub fn activate(&self, scenario: ScenarioId) -> EngineResult<()> {
        self.mutate(scenario, |s, events| s.try_activate(events))
    }

    /// Submit candidates for `agent`, starting at `from_tick`, and advance
    /// the barrier for every tick that becomes satisfied.
    ///
    /// This is the only external write entry point; it returns promptly —
    /// an unsatisfied barrier shows up as states left WAITING, never as a
    /// blocked call.
    pub fn submit(
        &self,
        scenario: ScenarioId,
        agent: AgentId,
        from_tick: Tick,
        candidates: &[Candidate],
    ) -> EngineResult<SubmitReceipt> {
        self.mutate(scenario, |s, events| s.submit(agent, from_tick, candidates, events))
    }

    /// Fire the wall-clock expiry for a stalled scenario (termination
    /// policy case "timeout").  Idempotent: returns `false` if the scenario
    /// had already closed.
    pub fn expire(&self, scenario: ScenarioId) -> EngineResult<bool> {
        self.mutate(scenario, |s, events| Ok(s.expire(events)))
    }

    /// Drop a closed scenario from the registry.  Whole-scenario deletion
    /// is the storage collaborator's call; the engine only refuses to
    /// delete live state.
    pub fn remove_scenario(&self, scenario: ScenarioId) -> EngineResult<()> {
        let mut registry = self
            .scenarios
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let cell = registry
            .get(&scenario)
            .ok_or(EngineError::ScenarioNotFound(scenario))?;
        let status = cell
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .status();
        if status != ScenarioStatus::Done {
            return Err(EngineError::InvalidScenario(format!(
                "scenario {scenario} is still {status}; only closed scenarios can be removed"
            )));
        }
        registry.remove(&scenario);
        Ok(())
    }

    // ── Internal plumbing ─────────────────────────────────────────────────

    fn cell(&self, scenario: ScenarioId) -> EngineResult<Arc<ScenarioCell>> {
        self.scenarios
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&scenario)
            .cloned()
            .ok_or(EngineError::ScenarioNotFound(scenario))
    }

    /// Run `f` under the scenario's exclusive critical section, then publish
    /// whatever events it buffered.  Publishing happens even when `f` errs:
    /// a partially accepted batch may have committed ticks before the
    /// rejection.
    fn mutate<T>(
        &self,
        scenario: ScenarioId,
        f: impl FnOnce(&mut Scenario, &mut Vec<EngineEvent>) -> EngineResult<T>,
    ) -> EngineResult<T> {
        let cell = self.cell(scenario)?;
        let mut events = Vec::new();
        let result = {
            // A poisoned mutex means a panic mid-commit on another thread;
            // recover the guard so the scenario stays reachable for queries
            // and closure rather than wedging every later caller.
            let mut state = cell
                .state
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            f(&mut state, &mut events)
        };
        self.bus.publish(events);
        result
    }

    /// Run a read-only closure under the scenario's lock.
    pub(crate) fn read<T>(
        &self,
        scenario: ScenarioId,
        f: impl FnOnce(&Scenario) -> EngineResult<T>,
    ) -> EngineResult<T> {
        let cell = self.cell(scenario)?;
        let state = cell
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&state)
    }
}
