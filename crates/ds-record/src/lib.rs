//! `ds-record` — durable recording of committed scenario output.
//!
//! The engine's event stream is the scenario coordinator's one outbound
//! interface; this crate drains it into flat rows for later rendering and
//! analysis.  Two backends ship: CSV (always) and SQLite (feature
//! `sqlite`).
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ds_record::{CsvRecorder, EventRecorder};
//!
//! let rx = engine.subscribe();
//! let writer = CsvRecorder::new(&output_dir)?;
//! let recorder = std::thread::spawn(move || EventRecorder::new(rx, writer).run());
//! // ... scenarios run ...
//! drop(engine); // closes the stream
//! let (_writer, error) = recorder.join().unwrap();
//! error.map(|e| eprintln!("record error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod recorder;
pub mod row;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod writer;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use csv::CsvRecorder;
pub use error::{RecordError, RecordResult};
pub use recorder::EventRecorder;
pub use row::{ClosureRow, CommitRow};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRecorder;
pub use writer::RecordWriter;
