//! Outbound commit events and subscriber plumbing.
//!
//! After every commit the engine emits an event describing what became
//! final.  Delivery is at-least-once and best-effort: sinks must never
//! block (the built-in [`ChannelSink`] sends on an unbounded channel), and
//! a sink whose consumer went away is dropped at the next publish.  Events
//! are always published *after* the scenario's critical section has been
//! released — a slow subscriber cannot stall the barrier.

use std::sync::mpsc;
use std::sync::Mutex;

use ds_core::{AgentId, Pose, ScenarioId, Tick};
use ds_timeline::StateStatus;

// ── Event payloads ────────────────────────────────────────────────────────────

/// One agent's freshly committed state within a [`EngineEvent::TickCommitted`].
#[derive(Clone, Debug, PartialEq)]
pub struct CommittedState {
    pub agent: AgentId,
    pub status: StateStatus,
    pub pose: Pose,
    pub speed_mps: f64,
    pub accel_mps2: f64,
}

/// Why a scenario closed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CloseReason {
    /// Every agent reached a terminal status.
    AllTerminal,
    /// The global clock committed the scenario's final tick.
    DurationReached,
    /// The wall-clock expiry fired on a stalled scenario.
    Expired,
}

impl CloseReason {
    pub fn as_str(self) -> &'static str {
        match self {
            CloseReason::AllTerminal => "all_terminal",
            CloseReason::DurationReached => "duration_reached",
            CloseReason::Expired => "expired",
        }
    }
}

impl std::fmt::Display for CloseReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything external subscribers can learn from the engine.
#[derive(Clone, Debug)]
pub enum EngineEvent {
    /// The scenario activated: tick 0 is committed and bot dispatch should
    /// begin for the listed agents.
    ScenarioActivated {
        scenario: ScenarioId,
        bots: Vec<AgentId>,
    },

    /// The barrier reconciled one tick; these states are now final.
    TickCommitted {
        scenario: ScenarioId,
        tick: Tick,
        states: Vec<CommittedState>,
    },

    /// An agent entered a terminal status at `tick`.
    AgentTerminal {
        scenario: ScenarioId,
        agent: AgentId,
        tick: Tick,
        status: StateStatus,
    },

    /// The scenario is DONE.  `final_tick` is the last committed tick,
    /// `None` if the scenario expired before activation.
    ScenarioClosed {
        scenario: ScenarioId,
        final_tick: Option<Tick>,
        reason: CloseReason,
    },
}

impl EngineEvent {
    /// The scenario this event belongs to.
    pub fn scenario(&self) -> ScenarioId {
        match self {
            EngineEvent::ScenarioActivated { scenario, .. }
            | EngineEvent::TickCommitted { scenario, .. }
            | EngineEvent::AgentTerminal { scenario, .. }
            | EngineEvent::ScenarioClosed { scenario, .. } => *scenario,
        }
    }
}

// ── Sinks ─────────────────────────────────────────────────────────────────────

/// A non-blocking event consumer.
///
/// Implementations must return quickly and must not block: `deliver` runs on
/// whichever submitter thread triggered the commit.  Return `false` to be
/// removed from the subscriber list.
pub trait EventSink: Send + Sync {
    fn deliver(&self, event: &EngineEvent) -> bool;
}

/// [`EventSink`] backed by an unbounded `std::sync::mpsc` sender.
///
/// Sending on an unbounded channel never blocks; a disconnected receiver
/// unsubscribes the sink.
pub struct ChannelSink(mpsc::Sender<EngineEvent>);

impl ChannelSink {
    pub fn new(sender: mpsc::Sender<EngineEvent>) -> Self {
        Self(sender)
    }
}

impl EventSink for ChannelSink {
    fn deliver(&self, event: &EngineEvent) -> bool {
        self.0.send(event.clone()).is_ok()
    }
}

// ── EventBus ──────────────────────────────────────────────────────────────────

/// Fan-out of engine events to all registered sinks.
pub(crate) struct EventBus {
    sinks: Mutex<Vec<Box<dyn EventSink>>>,
}

impl EventBus {
    pub(crate) fn new() -> Self {
        Self { sinks: Mutex::new(Vec::new()) }
    }

    pub(crate) fn register(&self, sink: Box<dyn EventSink>) {
        self.sinks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(sink);
    }

    /// Deliver `events` in order to every sink, dropping sinks that decline.
    pub(crate) fn publish(&self, events: Vec<EngineEvent>) {
        if events.is_empty() {
            return;
        }
        let mut sinks = self
            .sinks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for event in &events {
            sinks.retain(|sink| sink.deliver(event));
        }
    }
}
