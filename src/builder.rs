//! Tree builder — ordered referral edges in, populated tree out.
//!
//! Construction is depth-first from the natural roots (identifiers never
//! appearing as a referred value), in the order they first appear in the
//! input. A node's parent pointer is live from creation; attaching happens
//! bottom-up once the child's subtree is complete, and every attachment
//! fires exactly one distribution event at the parent.
//!
//! Input is validated before any node exists: a self-referral or a second
//! parent for the same referred identifier fails the build naming the
//! offender, instead of silently constructing a duplicated node.

use hashbrown::{HashMap, HashSet};

use crate::engine::{DistributionEngine, DistributionOutcome, ProbabilitySource};
use crate::loader::ReferralRecord;
use crate::model::{NodeId, SimulationConfig};
use crate::tree::ReferralTree;
use crate::{Error, Result};

// ============================================================================
// Run accounting
// ============================================================================

/// Aggregated accounting for one full run.
///
/// `overflow_pool` is the process-wide overflow accumulator, owned by the
/// run rather than living in ambient global state.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunStats {
    /// Participants created (super-root excluded).
    pub participants: usize,
    /// Distribution events fired (one per attachment).
    pub events: usize,
    /// Total paid out across all chain phases.
    pub chain_awarded: f64,
    /// Total paid out across all gravity phases.
    pub gravity_awarded: f64,
    /// Benefit no node qualified to receive, across all events.
    pub overflow_pool: f64,
}

impl RunStats {
    fn record(&mut self, outcome: &DistributionOutcome) {
        self.events += 1;
        self.chain_awarded += outcome.chain_awarded;
        self.gravity_awarded += outcome.gravity_awarded;
        self.overflow_pool += outcome.overflow;
    }
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RunStats {{ participants: {}, events: {}, chain: {:.4}, gravity: {:.4}, overflow: {:.4} }}",
            self.participants, self.events, self.chain_awarded, self.gravity_awarded, self.overflow_pool,
        )
    }
}

/// A finished run: the populated tree plus its accounting.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub tree: ReferralTree,
    pub stats: RunStats,
}

// ============================================================================
// TreeBuilder
// ============================================================================

/// Builds the referral tree and drives the engine, one event per edge.
pub struct TreeBuilder<'a> {
    config: &'a SimulationConfig,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(config: &'a SimulationConfig) -> Self {
        Self { config }
    }

    /// Consume an ordered edge list and produce the populated tree.
    ///
    /// Edge order is semantically significant twice over: it fixes child
    /// insertion order (and with it gravity's first-match scan) and the
    /// order in which natural roots are processed.
    pub fn build<S>(&self, records: &[ReferralRecord], sampler: &mut S) -> Result<BuildOutput>
    where
        S: ProbabilitySource + ?Sized,
    {
        // Pass 1: validate and index, before any node exists.
        let mut parent_of: HashMap<&str, &str> = HashMap::new();
        let mut children_map: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut roster: Vec<&str> = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();

        for record in records {
            let referrer = record.referrer.as_str();
            let referred = record.referred.as_str();

            if referrer == referred {
                return Err(Error::SelfReferral(referred.to_string()));
            }
            if let Some(&first) = parent_of.get(referred) {
                return Err(Error::DuplicateParent {
                    child: referred.to_string(),
                    first: first.to_string(),
                    second: referrer.to_string(),
                });
            }
            parent_of.insert(referred, referrer);
            children_map.entry(referrer).or_default().push(referred);

            for name in [referrer, referred] {
                if seen.insert(name) {
                    roster.push(name);
                }
            }
        }

        // Pass 2: depth-first construction from the natural roots.
        let mut tree = ReferralTree::new();
        let engine = DistributionEngine::new(self.config);
        let mut stats = RunStats::default();

        for &name in roster.iter().filter(|name| !parent_of.contains_key(*name)) {
            let root = tree.root();
            let id =
                self.build_subtree(&mut tree, &engine, &children_map, name, root, sampler, &mut stats)?;
            tree.attach(root, id);
            stats.record(&engine.distribute(&mut tree, root, sampler));
        }

        // Identifiers never reached from a natural root sit on a referral
        // cycle; surface the first one instead of dropping it silently.
        if tree.node_count() - 1 != roster.len() {
            let orphan = roster
                .iter()
                .copied()
                .find(|name| tree.find(name).is_none())
                .expect("count mismatch implies an unbuilt identifier");
            return Err(Error::CyclicReferral(orphan.to_string()));
        }

        stats.participants = tree.node_count() - 1;
        tracing::debug!(%stats, "build complete");
        Ok(BuildOutput { tree, stats })
    }

    #[allow(clippy::too_many_arguments)]
    fn build_subtree<S>(
        &self,
        tree: &mut ReferralTree,
        engine: &DistributionEngine<'_>,
        children_map: &HashMap<&str, Vec<&str>>,
        name: &str,
        parent: NodeId,
        sampler: &mut S,
        stats: &mut RunStats,
    ) -> Result<NodeId>
    where
        S: ProbabilitySource + ?Sized,
    {
        let id = tree.create_node(name, parent)?;
        if let Some(children) = children_map.get(name) {
            for &child in children {
                let child_id =
                    self.build_subtree(tree, engine, children_map, child, id, sampler, stats)?;
                tree.attach(id, child_id);
                stats.record(&engine.distribute(tree, id, sampler));
            }
        }
        Ok(id)
    }
}

// ============================================================================
// Tests
// ============================================================================
