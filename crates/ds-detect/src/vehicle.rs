//! The deployment-wide vehicle footprint.

use ds_core::{OrientedRect, Pose};
use serde::{Deserialize, Serialize};

/// Fixed vehicle dimensions used to build every agent's collision footprint.
///
/// One spec per deployment — agents do not carry individual dimensions.
/// Loaded from the deployment's configuration file alongside the engine
/// settings.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleSpec {
    /// Bumper-to-bumper length in metres.
    pub length_m: f64,
    /// Mirror-to-mirror width in metres.
    pub width_m: f64,
}

impl VehicleSpec {
    pub fn new(length_m: f64, width_m: f64) -> Self {
        Self { length_m, width_m }
    }

    /// The world-frame footprint of a vehicle at `pose`.
    #[inline]
    pub fn footprint(&self, pose: &Pose) -> OrientedRect {
        OrientedRect::from_pose(pose, self.length_m, self.width_m)
    }
}

impl Default for VehicleSpec {
    /// A generic passenger car.
    fn default() -> Self {
        Self { length_m: 4.5, width_m: 1.8 }
    }
}
