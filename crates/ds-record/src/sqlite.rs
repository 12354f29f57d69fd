//! SQLite recording backend (feature `sqlite`).
//!
//! Creates a single `record.db` file in the configured output directory
//! with two tables: `committed_states` and `scenario_closures`.

use std::path::Path;

use rusqlite::Connection;

use crate::row::{ClosureRow, CommitRow};
use crate::writer::RecordWriter;
use crate::RecordResult;

/// Writes recorded output to an SQLite database.
pub struct SqliteRecorder {
    conn: Connection,
    finished: bool,
}

impl SqliteRecorder {
    /// Open (or create) `record.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> RecordResult<Self> {
        let conn = Connection::open(dir.join("record.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS committed_states (
                 scenario    INTEGER NOT NULL,
                 tick        INTEGER NOT NULL,
                 agent       INTEGER NOT NULL,
                 status      TEXT    NOT NULL,
                 x           REAL    NOT NULL,
                 y           REAL    NOT NULL,
                 heading_rad REAL    NOT NULL,
                 speed_mps   REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS scenario_closures (
                 scenario   INTEGER PRIMARY KEY,
                 final_tick INTEGER,
                 reason     TEXT    NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl RecordWriter for SqliteRecorder {
    fn write_commits(&mut self, rows: &[CommitRow]) -> RecordResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO committed_states \
                 (scenario, tick, agent, status, x, y, heading_rad, speed_mps) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.scenario as i64,
                    row.tick as i64,
                    row.agent,
                    row.status,
                    row.x,
                    row.y,
                    row.heading_rad,
                    row.speed_mps,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_closure(&mut self, row: &ClosureRow) -> RecordResult<()> {
        self.conn.execute(
            "INSERT INTO scenario_closures (scenario, final_tick, reason) \
             VALUES (?1, ?2, ?3)",
            rusqlite::params![
                row.scenario as i64,
                row.final_tick.map(|t| t as i64),
                row.reason,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> RecordResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
