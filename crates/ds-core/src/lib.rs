//! `ds-core` — foundational types for the `rust_ds` scenario coordinator.
//!
//! This crate is a dependency of every other `ds-*` crate.  It intentionally
//! has no `ds-*` dependencies and minimal external ones (only `rand`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module   | Contents                                            |
//! |----------|-----------------------------------------------------|
//! | [`ids`]  | `ScenarioId`, `AgentId`, `IdentityId`               |
//! | [`time`] | `Tick`, `ScenarioTiming`                            |
//! | [`geom`] | `Pose`, `OrientedRect`, separating-axis overlap     |
//! | [`rng`]  | `DriverRng` (per scenario/agent)                    |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod geom;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use geom::{OrientedRect, Pose};
pub use ids::{AgentId, IdentityId, ScenarioId};
pub use rng::DriverRng;
pub use time::{ScenarioTiming, Tick};
