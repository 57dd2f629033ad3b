//! Commission distribution engine.
//!
//! Invoked once per child attachment. One event runs two phases over a
//! single benefit unit:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ONE DISTRIBUTION EVENT                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  chain phase   parent → … → GENESIS                         │
//! │                rate halves per step, acceptance gated by    │
//! │                pow(distance) + pos(ancestor)                │
//! │                                                             │
//! │  gravity phase topmost natural ancestor → descendants       │
//! │                first-match Bernoulli descent of the rest    │
//! │                                                             │
//! │  overflow      whatever neither phase placed                │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The three buckets of a [`DistributionOutcome`] always sum to the benefit
//! constant; that conservation law is what the tests pin down.
//!
//! The engine mutates `commission` fields only; tree shape (`children`,
//! `size`) belongs to the builder.

pub mod curves;
mod gravity;

use rand::Rng;

use crate::model::{Node, NodeId, SimulationConfig};
use crate::tree::ReferralTree;

// ============================================================================
// Randomness seam
// ============================================================================

/// Source of uniform draws in [0, 1).
///
/// The contract between the engine and randomness: a full run threads one
/// seeded generator through every draw, so (edges, seed) reproduces all
/// commissions exactly. Tests substitute scripted or constant sources.
pub trait ProbabilitySource {
    /// One uniform sample in [0, 1).
    fn sample(&mut self) -> f64;
}

impl<R: Rng> ProbabilitySource for R {
    fn sample(&mut self) -> f64 {
        self.gen_range(0.0..1.0)
    }
}

// ============================================================================
// Outcome accounting
// ============================================================================

/// Where one event's benefit unit went.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistributionOutcome {
    /// Paid to ancestors during the chain phase.
    pub chain_awarded: f64,
    /// Paid to descendants during the gravity phase.
    pub gravity_awarded: f64,
    /// Deposited into the run's overflow pool.
    pub overflow: f64,
}

impl DistributionOutcome {
    /// Sum of all three buckets; equals the benefit constant up to
    /// floating-point tolerance.
    pub fn accounted(&self) -> f64 {
        self.chain_awarded + self.gravity_awarded + self.overflow
    }
}

// ============================================================================
// DistributionEngine
// ============================================================================

/// Runs one distribution event per attachment.
pub struct DistributionEngine<'a> {
    config: &'a SimulationConfig,
}

impl<'a> DistributionEngine<'a> {
    pub fn new(config: &'a SimulationConfig) -> Self {
        Self { config }
    }

    /// Per-user additive acceptance probability.
    ///
    /// Currently a constant, but callers must treat it as a function of the
    /// ancestor; the contract allows it to vary per node later.
    pub fn pos_probability(&self, _ancestor: &Node) -> f64 {
        self.config.pos_probability_percent / 100.0
    }

    /// Distribute one benefit unit for a child just attached to `parent`.
    ///
    /// Chain phase: walk `parent` → super-root; ancestor at 1-indexed
    /// position `d` is offered `benefit × percent(d) / 100` and accepts iff
    /// an independent uniform draw lands below `pow(d) + pos(ancestor)`.
    /// The draw is consumed even when the bound is non-positive, so the
    /// draw sequence depends only on tree shape.
    ///
    /// Gravity phase: the remainder descends from the topmost non-super-root
    /// ancestor. When `parent` is the super-root itself no such ancestor
    /// exists and the remainder overflows directly.
    pub fn distribute<S>(
        &self,
        tree: &mut ReferralTree,
        parent: NodeId,
        sampler: &mut S,
    ) -> DistributionOutcome
    where
        S: ProbabilitySource + ?Sized,
    {
        let chain = tree.ancestors_of(parent);
        let mut benefit = self.config.benefit;
        let mut chain_awarded = 0.0;

        for (i, &ancestor) in chain.iter().enumerate() {
            let distance = (i + 1) as u32;
            let percent =
                curves::commission_percent(self.config.first_level_commission_percent, distance);
            let acceptance =
                curves::pow_probability(distance) + self.pos_probability(tree.node(ancestor));

            if sampler.sample() < acceptance {
                let award = benefit * percent / 100.0;
                tree.node_mut(ancestor).commission += award;
                chain_awarded += award;
                benefit -= award;
                tracing::trace!(
                    ancestor = %tree.node(ancestor).name,
                    distance,
                    award,
                    "chain award"
                );
            }
        }

        // The chain always ends at the super-root; the element before it is
        // the natural-root ancestor that seeds the gravity descent.
        let gravity_root = (chain.len() >= 2).then(|| chain[chain.len() - 2]);
        let (gravity_awarded, overflow) =
            gravity::redistribute(tree, gravity_root, benefit, self.config, sampler);

        DistributionOutcome { chain_awarded, gravity_awarded, overflow }
    }
}

// ============================================================================
// Test samplers
// ============================================================================
