//! Unit tests for ds-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, IdentityId, ScenarioId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(AgentId(0) < AgentId(1));
        assert!(ScenarioId(100) > ScenarioId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(ScenarioId::INVALID.0, u64::MAX);
        assert_eq!(IdentityId::INVALID.0, u64::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
        assert_eq!(ScenarioId(3).to_string(), "ScenarioId(3)");
    }
}

#[cfg(test)]
mod time {
    use std::time::Duration;

    use crate::{ScenarioTiming, Tick};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(t.next(), Tick(11));
        assert_eq!(Tick(15) - Tick(10), 5u64);
        assert_eq!(Tick(15).since(Tick(10)), 5);
    }

    #[test]
    fn display() {
        assert_eq!(Tick(4).to_string(), "T4");
    }

    #[test]
    fn quantization_rounds_up() {
        // 10 s at 0.5 s/tick → exactly 20 ticks.
        assert_eq!(ScenarioTiming::new(0.5, 10.0).final_tick(), Tick(20));
        // 10.1 s at 0.5 s/tick → a partial step still counts.
        assert_eq!(ScenarioTiming::new(0.5, 10.1).final_tick(), Tick(21));
        // Fractional everything.
        assert_eq!(ScenarioTiming::new(0.4, 1.0).final_tick(), Tick(3));
    }

    #[test]
    fn sub_tick_duration_still_gets_one_tick() {
        assert_eq!(ScenarioTiming::new(1.0, 0.25).final_tick(), Tick(1));
    }

    #[test]
    fn validity() {
        assert!(ScenarioTiming::new(0.5, 60.0).is_valid());
        assert!(!ScenarioTiming::new(0.0, 60.0).is_valid());
        assert!(!ScenarioTiming::new(0.5, -1.0).is_valid());
        assert!(!ScenarioTiming::new(f64::NAN, 60.0).is_valid());
    }

    #[test]
    fn wall_clock_duration() {
        let timing = ScenarioTiming::new(0.5, 12.5);
        assert_eq!(timing.duration(), Duration::from_millis(12_500));
        assert_eq!(timing.tick_duration(), Duration::from_millis(500));
    }
}

#[cfg(test)]
mod geom {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use crate::{OrientedRect, Pose};

    fn rect(cx: f64, cy: f64, rot: f64) -> OrientedRect {
        OrientedRect::new(4.0, 2.0, cx, cy, rot)
    }

    #[test]
    fn identical_rects_overlap() {
        let a = rect(3.0, -1.0, 0.7);
        assert!(a.overlaps(&a));
    }

    #[test]
    fn distant_rects_do_not_overlap() {
        let a = rect(0.0, 0.0, 0.0);
        let b = rect(10.0, 0.0, 0.0);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn axis_aligned_partial_overlap() {
        let a = rect(0.0, 0.0, 0.0);
        let b = rect(3.0, 1.0, 0.0); // overlaps a's right edge region
        assert!(a.overlaps(&b));
    }

    #[test]
    fn touching_edges_count_as_overlap() {
        // Exactly abutting along x: centers 4.0 apart, each half-length 2.0.
        let a = rect(0.0, 0.0, 0.0);
        let b = rect(4.0, 0.0, 0.0);
        assert!(a.overlaps(&b));
        // One ULP-scale nudge apart and they separate.
        let c = rect(4.0 + 1e-12, 0.0, 0.0);
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn rotated_cross_overlaps() {
        // Two long thin rects crossing at 90° share their centers' region.
        let a = OrientedRect::new(10.0, 1.0, 0.0, 0.0, 0.0);
        let b = OrientedRect::new(10.0, 1.0, 0.0, 0.0, std::f64::consts::FRAC_PI_2);
        assert!(a.overlaps(&b));
    }

    #[test]
    fn rotated_diagonal_miss() {
        // A 45°-rotated 4×2 rect projects a half-extent of 3/√2 ≈ 2.12 onto
        // the x-axis: centered at 4.0 it still reaches into a, centered at
        // 4.5 the x-axis separates them.
        let a = OrientedRect::new(4.0, 2.0, 0.0, 0.0, 0.0);
        let b = OrientedRect::new(4.0, 2.0, 4.0, 0.0, std::f64::consts::FRAC_PI_4);
        let c = OrientedRect::new(4.0, 2.0, 4.5, 0.0, std::f64::consts::FRAC_PI_4);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn containment_is_overlap() {
        let outer = OrientedRect::new(20.0, 20.0, 0.0, 0.0, 0.3);
        let inner = OrientedRect::new(1.0, 1.0, 0.5, -0.5, 1.1);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn from_pose_centers_on_pose() {
        let pose = Pose::new(12.0, -3.0, 0.9);
        let fp = OrientedRect::from_pose(&pose, 4.5, 1.8);
        assert_eq!(fp.center_x, 12.0);
        assert_eq!(fp.center_y, -3.0);
        assert_eq!(fp.rotation_rad, 0.9);
    }

    #[test]
    fn corners_of_axis_aligned_rect() {
        let r = OrientedRect::new(4.0, 2.0, 1.0, 1.0, 0.0);
        let corners = r.corners();
        let expect = [[3.0, 2.0], [-1.0, 2.0], [-1.0, 0.0], [3.0, 0.0]];
        for (got, want) in corners.iter().zip(expect.iter()) {
            assert!((got[0] - want[0]).abs() < 1e-12, "{got:?} vs {want:?}");
            assert!((got[1] - want[1]).abs() < 1e-12, "{got:?} vs {want:?}");
        }
    }

    /// Sweep near-parallel, near-tangent configurations.
    ///
    /// The exact-comparison axis test is known to report non-overlap for
    /// some shapes grazing near a vertex with almost-parallel edges, so this
    /// sweep pins only the invariants that must hold regardless of how that
    /// tie breaks: symmetry, guaranteed overlap when the incircles
    /// intersect, and guaranteed separation past the circumcircles.
    #[test]
    fn near_parallel_axis_sweep() {
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        for _ in 0..2_000 {
            let rot: f64 = rng.gen_range(0.0..std::f64::consts::PI);
            let delta: f64 = rng.gen_range(-1e-7..1e-7);
            let a = OrientedRect::new(4.0, 2.0, 0.0, 0.0, rot);

            // Place b roughly tangent along a's long edge normal.
            let gap: f64 = rng.gen_range(-0.05..0.05);
            let dist = 2.0 + gap; // half-widths sum = 2.0
            let nx = -rot.sin();
            let ny = rot.cos();
            let b = OrientedRect::new(4.0, 2.0, nx * dist, ny * dist, rot + delta);

            assert_eq!(a.overlaps(&b), b.overlaps(&a), "symmetry at rot={rot} gap={gap}");

            let center_dist = (b.center_x.powi(2) + b.center_y.powi(2)).sqrt();
            let inradius = 1.0; // min(length, width) / 2
            if center_dist < 2.0 * inradius - 1e-9 {
                assert!(a.overlaps(&b), "incircles intersect at rot={rot} gap={gap}");
            }

            // Pushed past the circumcircles the same configuration must
            // always separate.
            let far = OrientedRect::new(
                4.0,
                2.0,
                nx * (dist + 5.0),
                ny * (dist + 5.0),
                rot + delta,
            );
            assert!(!a.overlaps(&far), "past circumcircles at rot={rot} gap={gap}");
        }
    }

    #[test]
    fn pose_distance() {
        let a = Pose::new(0.0, 0.0, 0.0);
        let b = Pose::new(3.0, 4.0, 1.0);
        assert!((a.distance_m(&b) - 5.0).abs() < 1e-12);
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentId, DriverRng, ScenarioId};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = DriverRng::new(12345, ScenarioId(1), AgentId(0));
        let mut r2 = DriverRng::new(12345, ScenarioId(1), AgentId(0));
        for _ in 0..100 {
            let a: f64 = r1.random();
            let b: f64 = r2.random();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn distinct_agents_diverge() {
        let mut r1 = DriverRng::new(12345, ScenarioId(1), AgentId(0));
        let mut r2 = DriverRng::new(12345, ScenarioId(1), AgentId(1));
        let a: u64 = r1.random();
        let b: u64 = r2.random();
        assert_ne!(a, b);
    }

    #[test]
    fn distinct_scenarios_diverge() {
        let mut r1 = DriverRng::new(12345, ScenarioId(1), AgentId(0));
        let mut r2 = DriverRng::new(12345, ScenarioId(2), AgentId(0));
        let a: u64 = r1.random();
        let b: u64 = r2.random();
        assert_ne!(a, b);
    }

    #[test]
    fn gen_range_stays_in_range() {
        let mut rng = DriverRng::new(7, ScenarioId(0), AgentId(0));
        for _ in 0..1_000 {
            let v = rng.gen_range(-0.25f64..0.25);
            assert!((-0.25..0.25).contains(&v));
        }
    }
}
