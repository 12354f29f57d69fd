//! Goal-completion detection.

use ds_core::{OrientedRect, Pose};

use crate::VehicleSpec;

/// `true` iff the vehicle footprint at `pose` overlaps `goal`.
///
/// Touching the goal region's boundary counts — the overlap primitive treats
/// shared edges as overlap.  Only evaluated for non-terminal agents; the
/// engine never asks about an agent that already crashed or finished.
#[inline]
pub fn reached(pose: &Pose, goal: &OrientedRect, vehicle: &VehicleSpec) -> bool {
    vehicle.footprint(pose).overlaps(goal)
}
