//! Engine error taxonomy.
//!
//! Two families share one enum.  The caller-facing rejections
//! (`ScenarioClosed`, `ScenarioNotStarted`, `SlotUnbound`,
//! `SlotAlreadyBound`, and everything wrapped in `Rejected`) are ordinary
//! results of racing a live scenario: the submitter corrects itself or
//! stops, and nothing is retried automatically.  `Internal` is the other
//! family — a broken barrier invariant surfaced mid-commit.  It is logged
//! with full scenario/agent/tick context at the point of detection and must
//! propagate all the way out; masking it would silently corrupt the barrier
//! for the rest of the scenario's life.

use ds_core::{AgentId, ScenarioId, Tick};
use ds_timeline::TimelineError;
use thiserror::Error;

/// Errors returned by [`CommitEngine`][crate::CommitEngine] operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("scenario {0} not found")]
    ScenarioNotFound(ScenarioId),

    #[error("agent {agent} not found in scenario {scenario}")]
    AgentNotFound { scenario: ScenarioId, agent: AgentId },

    #[error("scenario {0} is closed; no further submissions accepted")]
    ScenarioClosed(ScenarioId),

    #[error("scenario {0} has not activated yet; submissions open at activation")]
    ScenarioNotStarted(ScenarioId),

    #[error("agent {agent} in scenario {scenario} has no bound identity")]
    SlotUnbound { scenario: ScenarioId, agent: AgentId },

    #[error("agent {agent} in scenario {scenario} is already bound")]
    SlotAlreadyBound { scenario: ScenarioId, agent: AgentId },

    #[error("invalid scenario: {0}")]
    InvalidScenario(String),

    /// A caller-recoverable timeline rejection (out-of-order tick, agent
    /// already terminal).
    #[error(transparent)]
    Rejected(#[from] TimelineError),

    /// Internal-consistency failure: the commit pipeline hit a state the
    /// barrier had just proved commitable.  Indicates a bug, not bad input.
    #[error("internal error committing {tick} for agent {agent} in scenario {scenario}: {source}")]
    Internal {
        scenario: ScenarioId,
        agent: AgentId,
        tick: Tick,
        source: TimelineError,
    },
}

/// Shorthand result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
