//! Unit tests for ds-detect.

use ds_core::{AgentId, OrientedRect, Pose};

use crate::{detect, reached, VehicleSpec};

fn spec() -> VehicleSpec {
    VehicleSpec::new(4.0, 2.0)
}

#[cfg(test)]
mod collision {
    use super::*;

    #[test]
    fn empty_and_single_are_conflict_free() {
        assert!(detect(&[], &spec()).is_empty());
        let lone = [(AgentId(0), Pose::new(0.0, 0.0, 0.0))];
        assert!(detect(&lone, &spec()).is_empty());
    }

    #[test]
    fn coincident_poses_conflict() {
        let states = [
            (AgentId(0), Pose::new(5.0, 5.0, 1.0)),
            (AgentId(1), Pose::new(5.0, 5.0, 1.0)),
        ];
        let hit = detect(&states, &spec());
        assert!(hit.contains(&AgentId(0)));
        assert!(hit.contains(&AgentId(1)));
        assert_eq!(hit.len(), 2);
    }

    #[test]
    fn ten_metres_apart_is_clear() {
        let states = [
            (AgentId(0), Pose::new(0.0, 0.0, 0.0)),
            (AgentId(1), Pose::new(10.0, 0.0, 0.0)),
        ];
        assert!(detect(&states, &spec()).is_empty());
    }

    #[test]
    fn chain_conflict_returns_all_involved() {
        // a overlaps b, b overlaps c, a clear of c — all three are returned.
        let states = [
            (AgentId(0), Pose::new(0.0, 0.0, 0.0)),
            (AgentId(1), Pose::new(3.0, 0.0, 0.0)),
            (AgentId(2), Pose::new(6.0, 0.0, 0.0)),
        ];
        let hit = detect(&states, &spec());
        assert_eq!(hit.len(), 3);
    }

    #[test]
    fn bystander_excluded() {
        let states = [
            (AgentId(0), Pose::new(0.0, 0.0, 0.0)),
            (AgentId(1), Pose::new(1.0, 0.0, 0.0)),
            (AgentId(7), Pose::new(50.0, 50.0, 2.0)),
        ];
        let hit = detect(&states, &spec());
        assert_eq!(hit.len(), 2);
        assert!(!hit.contains(&AgentId(7)));
    }

    #[test]
    fn rotated_tbone_detected() {
        // One vehicle broadside across another's nose.
        let states = [
            (AgentId(0), Pose::new(0.0, 0.0, 0.0)),
            (AgentId(1), Pose::new(2.5, 0.0, std::f64::consts::FRAC_PI_2)),
        ];
        let hit = detect(&states, &spec());
        assert_eq!(hit.len(), 2);
    }

    #[test]
    fn membership_is_pose_determined() {
        // Shuffled input order never changes the membership.
        let a = (AgentId(0), Pose::new(0.0, 0.0, 0.0));
        let b = (AgentId(1), Pose::new(1.5, 0.5, 0.2));
        let c = (AgentId(2), Pose::new(30.0, 0.0, 0.0));
        let forward = detect(&[a, b, c], &spec());
        let shuffled = detect(&[c, b, a], &spec());
        assert_eq!(forward, shuffled);
    }
}

#[cfg(test)]
mod goal {
    use super::*;

    fn goal_at(x: f64, y: f64) -> OrientedRect {
        OrientedRect::new(6.0, 4.0, x, y, 0.0)
    }

    #[test]
    fn inside_goal_reached() {
        assert!(reached(&Pose::new(0.0, 0.0, 0.3), &goal_at(0.0, 0.0), &spec()));
    }

    #[test]
    fn far_from_goal_not_reached() {
        assert!(!reached(&Pose::new(100.0, 0.0, 0.0), &goal_at(0.0, 0.0), &spec()));
    }

    #[test]
    fn nosing_into_goal_counts() {
        // Vehicle centred just outside; its nose pokes into the region.
        // Goal right edge at x = 3, vehicle rear at 4.9 - 2 = 2.9 < 3.
        assert!(reached(&Pose::new(4.9, 0.0, 0.0), &goal_at(0.0, 0.0), &spec()));
        assert!(!reached(&Pose::new(5.1, 0.0, 0.0), &goal_at(0.0, 0.0), &spec()));
    }

    #[test]
    fn rotated_goal_region() {
        let goal = OrientedRect::new(6.0, 4.0, 10.0, 10.0, std::f64::consts::FRAC_PI_4);
        assert!(reached(&Pose::new(10.0, 10.0, 0.0), &goal, &spec()));
        assert!(!reached(&Pose::new(0.0, 0.0, 0.0), &goal, &spec()));
    }
}

#[cfg(test)]
mod vehicle {
    use super::*;

    #[test]
    fn footprint_tracks_pose() {
        let fp = spec().footprint(&Pose::new(3.0, -2.0, 0.5));
        assert_eq!(fp.center_x, 3.0);
        assert_eq!(fp.center_y, -2.0);
        assert_eq!(fp.rotation_rad, 0.5);
        assert_eq!(fp.length, 4.0);
        assert_eq!(fp.width, 2.0);
    }

    #[test]
    fn default_is_a_passenger_car() {
        let v = VehicleSpec::default();
        assert!(v.length_m > v.width_m);
        assert!(v.length_m < 6.0);
    }
}
