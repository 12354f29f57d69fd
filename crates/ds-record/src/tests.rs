//! Tests for the recording backends and the event bridge.

use std::sync::mpsc;

use ds_core::{AgentId, Pose, ScenarioId, Tick};
use ds_engine::{CloseReason, CommittedState, EngineEvent};
use ds_timeline::StateStatus;
use tempfile::TempDir;

use crate::row::{ClosureRow, CommitRow};
use crate::writer::RecordWriter;
use crate::{CsvRecorder, EventRecorder};

fn commit_row(tick: u64, agent: u32, x: f64) -> CommitRow {
    CommitRow {
        scenario: 1,
        tick,
        agent,
        status: "active",
        x,
        y: 0.0,
        heading_rad: 0.0,
        speed_mps: 5.0,
    }
}

fn tick_event(tick: u64, states: Vec<CommittedState>) -> EngineEvent {
    EngineEvent::TickCommitted { scenario: ScenarioId(1), tick: Tick(tick), states }
}

fn state(agent: u32, status: StateStatus, x: f64) -> CommittedState {
    CommittedState {
        agent: AgentId(agent),
        status,
        pose: Pose::new(x, 0.0, 0.0),
        speed_mps: 5.0,
        accel_mps2: 0.0,
    }
}

#[cfg(test)]
mod csv_backend {
    use super::*;

    #[test]
    fn writes_headers_and_rows() {
        let dir = TempDir::new().unwrap();
        let mut writer = CsvRecorder::new(dir.path()).unwrap();
        writer
            .write_commits(&[commit_row(0, 0, 0.0), commit_row(0, 1, 20.0)])
            .unwrap();
        writer
            .write_closure(&ClosureRow { scenario: 1, final_tick: Some(0), reason: "all_terminal" })
            .unwrap();
        writer.finish().unwrap();

        let commits =
            std::fs::read_to_string(dir.path().join("committed_states.csv")).unwrap();
        let lines: Vec<&str> = commits.lines().collect();
        assert_eq!(lines[0], "scenario,tick,agent,status,x,y,heading_rad,speed_mps");
        assert_eq!(lines[1], "1,0,0,active,0,0,0,5");
        assert_eq!(lines[2], "1,0,1,active,20,0,0,5");

        let closures =
            std::fs::read_to_string(dir.path().join("scenario_closures.csv")).unwrap();
        let lines: Vec<&str> = closures.lines().collect();
        assert_eq!(lines[0], "scenario,final_tick,reason");
        assert_eq!(lines[1], "1,0,all_terminal");
    }

    #[test]
    fn unactivated_closure_has_empty_final_tick() {
        let dir = TempDir::new().unwrap();
        let mut writer = CsvRecorder::new(dir.path()).unwrap();
        writer
            .write_closure(&ClosureRow { scenario: 4, final_tick: None, reason: "expired" })
            .unwrap();
        writer.finish().unwrap();

        let closures =
            std::fs::read_to_string(dir.path().join("scenario_closures.csv")).unwrap();
        assert_eq!(closures.lines().nth(1).unwrap(), "4,,expired");
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut writer = CsvRecorder::new(dir.path()).unwrap();
        writer.finish().unwrap();
        writer.finish().unwrap();
    }
}

#[cfg(test)]
mod recorder {
    use super::*;

    #[test]
    fn drains_events_into_rows() {
        let dir = TempDir::new().unwrap();
        let writer = CsvRecorder::new(dir.path()).unwrap();
        let (tx, rx) = mpsc::channel();

        tx.send(EngineEvent::ScenarioActivated { scenario: ScenarioId(1), bots: vec![] })
            .unwrap();
        tx.send(tick_event(0, vec![state(0, StateStatus::Active, 0.0)])).unwrap();
        tx.send(tick_event(1, vec![state(0, StateStatus::GoalReached, 8.0)]))
            .unwrap();
        tx.send(EngineEvent::AgentTerminal {
            scenario: ScenarioId(1),
            agent: AgentId(0),
            tick: Tick(1),
            status: StateStatus::GoalReached,
        })
        .unwrap();
        tx.send(EngineEvent::ScenarioClosed {
            scenario: ScenarioId(1),
            final_tick: Some(Tick(1)),
            reason: CloseReason::AllTerminal,
        })
        .unwrap();
        drop(tx);

        let (_writer, error) = EventRecorder::new(rx, writer).run();
        assert!(error.is_none());

        let commits =
            std::fs::read_to_string(dir.path().join("committed_states.csv")).unwrap();
        let lines: Vec<&str> = commits.lines().collect();
        assert_eq!(lines.len(), 3); // header + 2 committed states
        assert_eq!(lines[2], "1,1,0,goal_reached,8,0,0,5");

        let closures =
            std::fs::read_to_string(dir.path().join("scenario_closures.csv")).unwrap();
        assert_eq!(closures.lines().nth(1).unwrap(), "1,1,all_terminal");
    }

    /// End-to-end: a live engine's subscription feeds the recorder.
    #[test]
    fn records_a_real_scenario() {
        use ds_core::{OrientedRect, ScenarioTiming};
        use ds_engine::{CommitEngine, EngineConfig, ScenarioBuilder};
        use ds_timeline::Candidate;

        let dir = TempDir::new().unwrap();
        let writer = CsvRecorder::new(dir.path()).unwrap();

        let engine = CommitEngine::new(EngineConfig::default());
        let rx = engine.subscribe();

        // Single agent spawned inside its goal: commits tick 0 as
        // GOAL_REACHED and closes immediately.
        let spec = ScenarioBuilder::new(ScenarioTiming::new(1.0, 10.0))
            .bot(
                Candidate::stationary(Pose::new(0.0, 0.0, 0.0)),
                OrientedRect::new(6.0, 4.0, 0.0, 0.0, 0.0),
            )
            .build();
        engine.create_scenario(spec).unwrap();
        drop(engine); // closes the stream

        let (_writer, error) = EventRecorder::new(rx, writer).run();
        assert!(error.is_none());

        let commits =
            std::fs::read_to_string(dir.path().join("committed_states.csv")).unwrap();
        assert!(commits.lines().nth(1).unwrap().contains("goal_reached"));
        let closures =
            std::fs::read_to_string(dir.path().join("scenario_closures.csv")).unwrap();
        assert!(closures.lines().nth(1).unwrap().contains("all_terminal"));
    }
}

#[cfg(feature = "sqlite")]
#[cfg(test)]
mod sqlite_backend {
    use super::*;
    use crate::SqliteRecorder;

    #[test]
    fn writes_and_reads_back() {
        let dir = TempDir::new().unwrap();
        let mut writer = SqliteRecorder::new(dir.path()).unwrap();
        writer
            .write_commits(&[commit_row(0, 0, 0.0), commit_row(1, 0, 5.0)])
            .unwrap();
        writer
            .write_closure(&ClosureRow { scenario: 1, final_tick: Some(1), reason: "expired" })
            .unwrap();
        writer.finish().unwrap();
        drop(writer);

        let conn = rusqlite::Connection::open(dir.path().join("record.db")).unwrap();
        let commits: i64 = conn
            .query_row("SELECT COUNT(*) FROM committed_states", [], |r| r.get(0))
            .unwrap();
        assert_eq!(commits, 2);
        let reason: String = conn
            .query_row("SELECT reason FROM scenario_closures WHERE scenario = 1", [], |r| {
                r.get(0)
            })
            .unwrap();
        assert_eq!(reason, "expired");
    }
}
