//! `EventRecorder<W>` — bridges the engine's event stream to a `RecordWriter`.

use std::sync::mpsc::Receiver;

use ds_engine::EngineEvent;

use crate::row::{ClosureRow, CommitRow};
use crate::writer::RecordWriter;
use crate::RecordError;

/// Drains a subscribed event receiver into a [`RecordWriter`] backend.
///
/// Run it on a dedicated thread: [`run`][Self::run] blocks until the event
/// stream closes (every sending side dropped — in practice, when the engine
/// is torn down), then finishes the writer and returns it together with the
/// first error encountered, if any.  Writer errors never interrupt
/// draining — a broken disk should not back-pressure the commit path.
pub struct EventRecorder<W: RecordWriter> {
    rx: Receiver<EngineEvent>,
    writer: W,
    last_error: Option<RecordError>,
}

impl<W: RecordWriter> EventRecorder<W> {
    /// Create a recorder draining `rx` (from
    /// [`CommitEngine::subscribe`][ds_engine::CommitEngine::subscribe])
    /// into `writer`.
    pub fn new(rx: Receiver<EngineEvent>, writer: W) -> Self {
        Self { rx, writer, last_error: None }
    }

    /// Drain events until the stream closes, then finish the writer.
    ///
    /// Returns the writer (for post-run inspection) and the first write
    /// error, if any occurred.
    pub fn run(mut self) -> (W, Option<RecordError>) {
        while let Ok(event) = self.rx.recv() {
            self.record(&event);
        }
        let result = self.writer.finish();
        self.store_err(result);
        (self.writer, self.last_error)
    }

    fn record(&mut self, event: &EngineEvent) {
        match event {
            EngineEvent::TickCommitted { scenario, tick, states } => {
                let rows: Vec<CommitRow> = states
                    .iter()
                    .map(|s| CommitRow {
                        scenario: scenario.0,
                        tick: tick.0,
                        agent: s.agent.0,
                        status: s.status.as_str(),
                        x: s.pose.x,
                        y: s.pose.y,
                        heading_rad: s.pose.heading_rad,
                        speed_mps: s.speed_mps,
                    })
                    .collect();
                let result = self.writer.write_commits(&rows);
                self.store_err(result);
            }
            EngineEvent::ScenarioClosed { scenario, final_tick, reason } => {
                let row = ClosureRow {
                    scenario: scenario.0,
                    final_tick: final_tick.map(|t| t.0),
                    reason: reason.as_str(),
                };
                let result = self.writer.write_closure(&row);
                self.store_err(result);
            }
            // Activation and terminal notices carry no committed values
            // beyond what TickCommitted already recorded.
            EngineEvent::ScenarioActivated { .. } | EngineEvent::AgentTerminal { .. } => {}
        }
    }

    fn store_err(&mut self, result: crate::RecordResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}
