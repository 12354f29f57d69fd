//! `ds-detect` — per-tick conflict and goal detection.
//!
//! Both detectors operate on a *complete* snapshot of one tick's poses, as
//! guaranteed by the commit barrier: the engine only calls in here after
//! every non-terminal agent has a candidate queued for the tick.  Neither
//! detector mutates anything — they classify, the engine commits.
//!
//! | Module        | Contents                                          |
//! |---------------|---------------------------------------------------|
//! | [`vehicle`]   | `VehicleSpec` — per-deployment footprint          |
//! | [`collision`] | pairwise overlap sweep → set of conflicted agents |
//! | [`goal`]      | footprint-vs-goal-region test                     |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                            |
//! |------------|---------------------------------------------------|
//! | `parallel` | Runs the pair sweep on Rayon's thread pool.       |

pub mod collision;
pub mod goal;
pub mod vehicle;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use collision::detect;
pub use goal::reached;
pub use vehicle::VehicleSpec;
