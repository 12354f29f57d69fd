//! `ds-bots` — autonomous submitters for the scenario coordinator.
//!
//! The engine treats bots exactly like humans: they call
//! [`CommitEngine::submit`][ds_engine::CommitEngine::submit] and nothing
//! else.  What this crate adds is the background machinery the engine
//! deliberately does not own:
//!
//! - a [`TrajectoryPlanner`] trait — the black-box candidate source — with a
//!   reference [`GreedyPlanner`];
//! - one cancellable polling task per bot agent, started at scenario
//!   activation;
//! - a per-scenario expiry watchdog that fires the engine's wall-clock
//!   termination policy for stalled scenarios;
//! - the [`BotSupervisor`], which owns every task's handle and aborts it
//!   the moment the engine reports the agent terminal or the scenario
//!   closed.  No recurring job survives termination.
//!
//! | Module         | Contents                                       |
//! |----------------|------------------------------------------------|
//! | [`planner`]    | `TrajectoryPlanner`, `PlannerInput`, `GreedyPlanner` |
//! | [`poller`]     | the per-bot submission loop                    |
//! | [`supervisor`] | `BotSupervisor`, `BotConfig`                   |

pub mod planner;
pub mod poller;
pub mod supervisor;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use planner::{GreedyPlanner, PlannerInput, TrajectoryPlanner};
pub use poller::drive_bot;
pub use supervisor::{BotConfig, BotSupervisor};
