//! Planar poses and oriented rectangles with a separating-axis overlap test.
//!
//! All coordinates are world-frame metres (`f64`); rotations are radians,
//! counter-clockwise, zero pointing along +x.  Vehicles and goal regions are
//! both modelled as oriented rectangles, so one overlap primitive serves the
//! collision and goal detectors alike.
//!
//! # Numerical contract
//!
//! The separating-axis test compares projection intervals with exact `f64`
//! comparisons; touching intervals count as overlapping.  No epsilon is
//! applied: configurations with nearly parallel edges grazing near a vertex
//! can report non-overlap for shapes that visually intersect.  That edge
//! case is pinned by tests (see `tests.rs`) instead of being papered over
//! with a guessed tolerance.

/// A world-frame pose: position plus heading.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    /// Heading in radians, counter-clockwise from +x.
    pub heading_rad: f64,
}

impl Pose {
    #[inline]
    pub fn new(x: f64, y: f64, heading_rad: f64) -> Self {
        Self { x, y, heading_rad }
    }

    /// Euclidean distance to `other`, ignoring heading.
    #[inline]
    pub fn distance_m(&self, other: &Pose) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl std::fmt::Display for Pose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2} @ {:.3} rad)", self.x, self.y, self.heading_rad)
    }
}

// ── OrientedRect ──────────────────────────────────────────────────────────────

/// A rectangle with arbitrary planar orientation.
///
/// `length` extends along the rectangle's local +x axis (the direction
/// `rotation_rad` points), `width` along local +y.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrientedRect {
    pub length: f64,
    pub width: f64,
    pub center_x: f64,
    pub center_y: f64,
    pub rotation_rad: f64,
}

impl OrientedRect {
    pub fn new(length: f64, width: f64, center_x: f64, center_y: f64, rotation_rad: f64) -> Self {
        Self { length, width, center_x, center_y, rotation_rad }
    }

    /// A rectangle of the given dimensions centred on `pose`, aligned with
    /// its heading.  This is how vehicle footprints are built.
    pub fn from_pose(pose: &Pose, length: f64, width: f64) -> Self {
        Self {
            length,
            width,
            center_x: pose.x,
            center_y: pose.y,
            rotation_rad: pose.heading_rad,
        }
    }

    /// World-frame corner coordinates, counter-clockwise.
    pub fn corners(&self) -> [[f64; 2]; 4] {
        let (sin, cos) = self.rotation_rad.sin_cos();
        let hl = self.length * 0.5;
        let hw = self.width * 0.5;
        [[hl, hw], [-hl, hw], [-hl, -hw], [hl, -hw]].map(|[dx, dy]| {
            [
                self.center_x + dx * cos - dy * sin,
                self.center_y + dx * sin + dy * cos,
            ]
        })
    }

    /// The two unique face-normal axes of this rectangle (unit vectors).
    /// The other two normals are negations and project identically.
    fn axes(&self) -> [[f64; 2]; 2] {
        let (sin, cos) = self.rotation_rad.sin_cos();
        [[cos, sin], [-sin, cos]]
    }

    /// Projection interval of all four corners onto `axis`.
    fn project(&self, axis: [f64; 2]) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for [x, y] in self.corners() {
            let d = x * axis[0] + y * axis[1];
            min = min.min(d);
            max = max.max(d);
        }
        (min, max)
    }

    /// Separating-axis overlap test.
    ///
    /// Two oriented rectangles do **not** overlap iff some axis among the
    /// four candidate face normals separates their projections.  Touching
    /// projection intervals count as overlap.  Symmetric in its arguments.
    pub fn overlaps(&self, other: &OrientedRect) -> bool {
        let [a0, a1] = self.axes();
        let [b0, b1] = other.axes();
        for axis in [a0, a1, b0, b1] {
            let (self_min, self_max) = self.project(axis);
            let (other_min, other_max) = other.project(axis);
            if self_max < other_min || other_max < self_min {
                return false;
            }
        }
        true
    }

    /// Radius of the rectangle's circumscribed circle — a cheap upper bound
    /// for quick rejection before the full axis test.
    #[inline]
    pub fn circumradius(&self) -> f64 {
        (self.length * self.length + self.width * self.width).sqrt() * 0.5
    }
}
