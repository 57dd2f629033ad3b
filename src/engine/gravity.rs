//! Gravity redistribution — push leftover benefit down into the subtree.
//!
//! Each round scans the current root's children in insertion order and gives
//! every child an independent Bernoulli draw against its share of the
//! subtree mass, `size(child) / size(current)`. The first success wins the
//! round; there is deliberately no normalized weighted choice across
//! siblings. The winner takes a fixed-rate award (clamped to what is left)
//! and becomes the next root. Whatever survives the descent lands in the
//! caller's overflow accounting.
//!
//! Each round either descends one level or stops, so the walk is bounded by
//! tree depth. Written as a loop over a current-root handle; each step is
//! tail-recursive.

use crate::model::{NodeId, SimulationConfig};
use crate::tree::ReferralTree;

use super::ProbabilitySource;

/// Run the gravity descent from `root` with `remaining` benefit.
///
/// Returns `(awarded, overflow)`: the total paid to descendants and the
/// remainder to deposit in the overflow pool. `root = None` (the attachment
/// parent was the super-root, so the chain had no natural-root member)
/// skips straight to overflow.
pub(super) fn redistribute<S: ProbabilitySource + ?Sized>(
    tree: &mut ReferralTree,
    root: Option<NodeId>,
    mut remaining: f64,
    config: &SimulationConfig,
    sampler: &mut S,
) -> (f64, f64) {
    let Some(mut current) = root else {
        return (0.0, remaining);
    };

    // Fixed per-level award, relative to the benefit constant, never to the
    // remainder; the min() clamp caps it at what is actually left.
    let step = config.gravity_commission_percent / 100.0 * config.benefit;
    let mut awarded = 0.0;

    while remaining > 0.0 {
        let subtree_mass = tree.node(current).size as f64;

        let mut winner = None;
        for &child in &tree.node(current).children {
            let pull = tree.node(child).size as f64 / subtree_mass;
            if sampler.sample() < pull {
                winner = Some(child);
                break;
            }
        }

        let Some(child) = winner else {
            break;
        };

        let award = step.min(remaining);
        tree.node_mut(child).commission += award;
        awarded += award;
        remaining -= award;
        tracing::trace!(
            node = %tree.node(child).name,
            award,
            remaining,
            "gravity award"
        );
        current = child;
    }

    (awarded, remaining)
}
