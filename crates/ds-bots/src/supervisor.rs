//! The `BotSupervisor` — scenario-lifecycle ownership of background tasks.
//!
//! The supervisor subscribes to engine events and owns every background
//! task's `JoinHandle`:
//!
//! - `ScenarioActivated` → spawn one poller per bot agent and arm the
//!   scenario's expiry watchdog;
//! - `AgentTerminal`     → abort that agent's poller;
//! - `ScenarioClosed`    → abort every remaining poller and the watchdog.
//!
//! Cancellation is driven by the engine's own terminal-status transitions —
//! there is no job store to reconcile against, and no recurring job can
//! outlive its scenario.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use ds_core::{AgentId, DriverRng, ScenarioId};
use ds_engine::{CommitEngine, EngineError, EngineEvent, EventSink};
use rustc_hash::FxHashMap;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::planner::TrajectoryPlanner;
use crate::poller::drive_bot;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Supervisor settings.
#[derive(Clone, Debug)]
pub struct BotConfig {
    /// How often each bot polls, plans, and submits.
    pub poll_interval: Duration,
    /// Global seed for per-driver RNGs; replaying with the same seed
    /// reproduces every planner choice.
    pub seed: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self { poll_interval: Duration::from_millis(250), seed: 0 }
    }
}

// ── Event bridge ──────────────────────────────────────────────────────────────

/// Forwards engine events onto the supervisor's tokio channel.  Unbounded
/// send never blocks the engine's publish path.
struct PumpSink(mpsc::UnboundedSender<EngineEvent>);

impl EventSink for PumpSink {
    fn deliver(&self, event: &EngineEvent) -> bool {
        self.0.send(event.clone()).is_ok()
    }
}

// ── BotSupervisor ─────────────────────────────────────────────────────────────

/// Owns the polling and watchdog tasks for every live scenario.
pub struct BotSupervisor {
    engine: Arc<CommitEngine>,
    planner: Arc<dyn TrajectoryPlanner>,
    config: BotConfig,
    pollers: Mutex<FxHashMap<(ScenarioId, AgentId), JoinHandle<()>>>,
    watchdogs: Mutex<FxHashMap<ScenarioId, JoinHandle<()>>>,
}

impl BotSupervisor {
    pub fn new(
        engine: Arc<CommitEngine>,
        planner: Arc<dyn TrajectoryPlanner>,
        config: BotConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            engine,
            planner,
            config,
            pollers: Mutex::new(FxHashMap::default()),
            watchdogs: Mutex::new(FxHashMap::default()),
        })
    }

    /// Subscribe to the engine and start the event pump.
    ///
    /// Must run inside a tokio runtime, and before scenarios are created —
    /// activations published earlier are not replayed.
    pub fn start(self: &Arc<Self>) -> JoinHandle<()> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        self.engine.subscribe_with(Box::new(PumpSink(tx)));
        let supervisor = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                supervisor.handle_event(event);
            }
        })
    }

    /// Number of background tasks (pollers + watchdogs) not yet finished.
    pub fn active_tasks(&self) -> usize {
        let pollers = self
            .pollers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let watchdogs = self
            .watchdogs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        pollers.values().filter(|h| !h.is_finished()).count()
            + watchdogs.values().filter(|h| !h.is_finished()).count()
    }

    /// Abort everything.  Used at service shutdown.
    pub fn shutdown(&self) {
        let mut pollers = self
            .pollers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for (_, handle) in pollers.drain() {
            handle.abort();
        }
        let mut watchdogs = self
            .watchdogs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for (_, handle) in watchdogs.drain() {
            handle.abort();
        }
    }

    // ── Event handling ────────────────────────────────────────────────────

    fn handle_event(&self, event: EngineEvent) {
        match event {
            EngineEvent::ScenarioActivated { scenario, bots } => {
                log::info!("scenario {scenario}: dispatching {} bot(s)", bots.len());
                for agent in bots {
                    self.spawn_poller(scenario, agent);
                }
                self.arm_watchdog(scenario);
            }
            EngineEvent::AgentTerminal { scenario, agent, .. } => {
                self.stop_poller(scenario, agent);
            }
            EngineEvent::ScenarioClosed { scenario, .. } => {
                self.stop_scenario(scenario);
            }
            EngineEvent::TickCommitted { .. } => {}
        }
    }

    fn spawn_poller(&self, scenario: ScenarioId, agent: AgentId) {
        let rng = DriverRng::new(self.config.seed, scenario, agent);
        let handle = tokio::spawn(drive_bot(
            Arc::clone(&self.engine),
            Arc::clone(&self.planner),
            scenario,
            agent,
            self.config.poll_interval,
            rng,
        ));
        let mut pollers = self
            .pollers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(stale) = pollers.insert((scenario, agent), handle) {
            stale.abort();
        }
    }

    /// Arm the wall-clock termination policy: when the scenario's duration
    /// elapses and it is still open, close it.
    fn arm_watchdog(&self, scenario: ScenarioId) {
        let Ok(timing) = self.engine.timing(scenario) else { return };
        let engine = Arc::clone(&self.engine);
        let deadline = timing.duration();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(deadline).await;
            match engine.expire(scenario) {
                Ok(true) => log::info!("scenario {scenario}: expired after {deadline:?}"),
                Ok(false) | Err(EngineError::ScenarioNotFound(_)) => {}
                Err(e) => log::warn!("scenario {scenario}: expiry failed: {e}"),
            }
        });
        let mut watchdogs = self
            .watchdogs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(stale) = watchdogs.insert(scenario, handle) {
            stale.abort();
        }
    }

    fn stop_poller(&self, scenario: ScenarioId, agent: AgentId) {
        let mut pollers = self
            .pollers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(handle) = pollers.remove(&(scenario, agent)) {
            handle.abort();
        }
    }

    fn stop_scenario(&self, scenario: ScenarioId) {
        let mut pollers = self
            .pollers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        pollers.retain(|&(s, _), handle| {
            if s == scenario {
                handle.abort();
                false
            } else {
                true
            }
        });
        drop(pollers);

        let mut watchdogs = self
            .watchdogs
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(handle) = watchdogs.remove(&scenario) {
            handle.abort();
        }
    }
}
