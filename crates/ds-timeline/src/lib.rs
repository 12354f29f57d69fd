//! `ds-timeline` — per-agent state timelines.
//!
//! A [`Timeline`] is the ordered sequence of one agent's per-tick states.
//! It enforces the append-only, contiguous-tick discipline the commit
//! barrier depends on:
//!
//! - states exist for a contiguous tick range starting at 0, no gaps;
//! - candidates enter as WAITING and are finalized exactly once by
//!   [`Timeline::commit`];
//! - terminal statuses (CRASHED, GOAL_REACHED) are sticky — committing one
//!   truncates any queued candidates beyond it and refuses all further
//!   appends.
//!
//! The timeline knows nothing about other agents, detectors, or scenarios;
//! the commit engine owns cross-agent coordination.

pub mod error;
pub mod state;
pub mod timeline;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{TimelineError, TimelineResult};
pub use state::{AgentState, Candidate, StateStatus};
pub use timeline::Timeline;
