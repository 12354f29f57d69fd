//! The `RecordWriter` trait implemented by all backend writers.

use crate::row::{ClosureRow, CommitRow};
use crate::RecordResult;

/// Trait implemented by the CSV and SQLite writers.
///
/// All methods are infallible from the recorder's perspective — errors are
/// stored by [`EventRecorder`][crate::EventRecorder] and retrieved after
/// the run.
pub trait RecordWriter {
    /// Write one tick's batch of committed states.
    fn write_commits(&mut self, rows: &[CommitRow]) -> RecordResult<()>;

    /// Write one scenario closure row.
    fn write_closure(&mut self, row: &ClosureRow) -> RecordResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> RecordResult<()>;
}
