//! Timeline rejection and invariant errors.

use ds_core::Tick;
use thiserror::Error;

use crate::StateStatus;

/// Errors raised by [`Timeline`][crate::Timeline] operations.
///
/// `OutOfOrderTick` and `AgentTerminal` are ordinary caller-recoverable
/// rejections: the submitter retries with the right tick or stops.
/// `NotWaiting` is different — it means `commit` was asked to finalize a
/// state that is not in a commitable status, which can only happen if the
/// barrier logic upstream is broken.  Callers must surface it loudly, never
/// skip it.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimelineError {
    #[error("candidate for {got} is out of order (next expected tick is {expected})")]
    OutOfOrderTick { expected: Tick, got: Tick },

    #[error("agent is already terminal ({status} at {at}); no further states accepted")]
    AgentTerminal { status: StateStatus, at: Tick },

    #[error("no commitable state at {tick} (found {found:?})")]
    NotWaiting {
        tick: Tick,
        /// Status of the state found at `tick`, or `None` if none exists.
        found: Option<StateStatus>,
    },
}

/// Shorthand result type for timeline operations.
pub type TimelineResult<T> = Result<T, TimelineError>;
