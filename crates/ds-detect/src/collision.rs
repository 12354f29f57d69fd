//! Pairwise collision detection over one tick's poses.

use ds_core::{AgentId, Pose};
use rustc_hash::FxHashSet;

use crate::VehicleSpec;

/// Return every agent involved in at least one footprint overlap.
///
/// `states` is the complete set of non-terminal agents' poses at a single
/// tick — the caller (the commit engine) has already filtered out terminal
/// agents, since a crashed agent cannot cause a new crash.  The result is
/// deterministic at the set-membership level; iteration order is not.
///
/// Every unordered pair is tested once.  Scenario populations are bounded
/// (a handful of vehicles), so the O(n²) sweep with a circumradius quick
/// reject is the whole algorithm; there is no spatial index to maintain.
pub fn detect(states: &[(AgentId, Pose)], vehicle: &VehicleSpec) -> FxHashSet<AgentId> {
    let rects: Vec<_> = states
        .iter()
        .map(|(agent, pose)| (*agent, vehicle.footprint(pose)))
        .collect();

    let mut conflicted = FxHashSet::default();
    for (a, b) in overlapping_pairs(&rects) {
        conflicted.insert(a);
        conflicted.insert(b);
    }
    conflicted
}

#[cfg(not(feature = "parallel"))]
fn overlapping_pairs(
    rects: &[(AgentId, ds_core::OrientedRect)],
) -> Vec<(AgentId, AgentId)> {
    let mut pairs = Vec::new();
    for i in 0..rects.len() {
        let (agent_i, rect_i) = &rects[i];
        for (agent_j, rect_j) in &rects[i + 1..] {
            if pair_overlaps(rect_i, rect_j) {
                pairs.push((*agent_i, *agent_j));
            }
        }
    }
    pairs
}

#[cfg(feature = "parallel")]
fn overlapping_pairs(
    rects: &[(AgentId, ds_core::OrientedRect)],
) -> Vec<(AgentId, AgentId)> {
    use rayon::prelude::*;

    (0..rects.len())
        .into_par_iter()
        .flat_map_iter(|i| {
            let (agent_i, rect_i) = rects[i];
            rects[i + 1..].iter().filter_map(move |(agent_j, rect_j)| {
                pair_overlaps(&rect_i, rect_j).then_some((agent_i, *agent_j))
            })
        })
        .collect()
}

/// Circumradius quick reject, then the full separating-axis test.
#[inline]
fn pair_overlaps(a: &ds_core::OrientedRect, b: &ds_core::OrientedRect) -> bool {
    let dx = a.center_x - b.center_x;
    let dy = a.center_y - b.center_y;
    let reach = a.circumradius() + b.circumradius();
    if dx * dx + dy * dy > reach * reach {
        return false;
    }
    a.overlaps(b)
}
