//! `ds-engine` — the scenario commit engine.
//!
//! The engine reconciles out-of-order, asynchronous submissions from several
//! independent drivers into one consistent per-scenario timeline.  Its core
//! is a lock-step barrier: the outcome of tick `T` (who crashed, who reached
//! their goal, who keeps driving) is only ever computed once *every*
//! non-terminal agent has a candidate queued for `T`, so the detectors
//! always see a complete snapshot regardless of submission order or driver
//! speed.
//!
//! ```text
//! submit(agent, tick, candidates)
//!     └─ append to the agent's timeline          (ds-timeline)
//!     └─ while the next tick's barrier is satisfied:
//!           collision + goal detection           (ds-detect)
//!           commit every participant's state
//!           re-evaluate closure
//!     └─ publish commit events                   (after the lock drops)
//! ```
//!
//! | Module       | Contents                                           |
//! |--------------|----------------------------------------------------|
//! | [`agent`]    | `AgentSpec`, runtime `Agent`                       |
//! | [`scenario`] | `Scenario` — status machine + barrier logic        |
//! | [`engine`]   | `CommitEngine` — registry, locking, entry points   |
//! | [`events`]   | `EngineEvent`, `EventSink`, subscription plumbing  |
//! | [`query`]    | read-only snapshot views                           |
//! | [`builder`]  | `ScenarioBuilder`                                  |
//! | [`error`]    | `EngineError`                                      |

pub mod agent;
pub mod builder;
pub mod engine;
pub mod error;
pub mod events;
pub mod query;
pub mod scenario;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use agent::{Agent, AgentSpec};
pub use builder::ScenarioBuilder;
pub use engine::{CommitEngine, EngineConfig, SubmitReceipt};
pub use error::{EngineError, EngineResult};
pub use events::{ChannelSink, CloseReason, CommittedState, EngineEvent, EventSink};
pub use query::{AgentView, StateView};
pub use scenario::{ScenarioSpec, ScenarioStatus};
