//! CSV recording backend.
//!
//! Creates two files in the configured output directory:
//! - `committed_states.csv`
//! - `scenario_closures.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::row::{ClosureRow, CommitRow};
use crate::writer::RecordWriter;
use crate::RecordResult;

/// Writes recorded output to two CSV files.
pub struct CsvRecorder {
    commits: Writer<File>,
    closures: Writer<File>,
    finished: bool,
}

impl CsvRecorder {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> RecordResult<Self> {
        let mut commits = Writer::from_path(dir.join("committed_states.csv"))?;
        commits.write_record([
            "scenario", "tick", "agent", "status", "x", "y", "heading_rad", "speed_mps",
        ])?;

        let mut closures = Writer::from_path(dir.join("scenario_closures.csv"))?;
        closures.write_record(["scenario", "final_tick", "reason"])?;

        Ok(Self { commits, closures, finished: false })
    }
}

impl RecordWriter for CsvRecorder {
    fn write_commits(&mut self, rows: &[CommitRow]) -> RecordResult<()> {
        for row in rows {
            self.commits.write_record(&[
                row.scenario.to_string(),
                row.tick.to_string(),
                row.agent.to_string(),
                row.status.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.heading_rad.to_string(),
                row.speed_mps.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_closure(&mut self, row: &ClosureRow) -> RecordResult<()> {
        self.closures.write_record(&[
            row.scenario.to_string(),
            row.final_tick.map(|t| t.to_string()).unwrap_or_default(),
            row.reason.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> RecordResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.commits.flush()?;
        self.closures.flush()?;
        Ok(())
    }
}
