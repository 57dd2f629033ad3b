//! # reftree-rs — Referral Tree Commission Engine
//!
//! Models a referral network as a rooted tree and distributes one fixed
//! benefit unit per referral edge through two chained probabilistic
//! algorithms.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `ProbabilitySource` is the contract between the
//!    distribution engine and randomness; tests substitute scripted sources
//! 2. **Clean DTOs**: `Node`, `TreeDump`, `SimulationConfig` cross all
//!    boundaries
//! 3. **No ambient state**: the overflow pool is an explicit per-run
//!    accumulator, never a global
//! 4. **Benefit conservation**: every event accounts for exactly one benefit
//!    unit across chain payouts, gravity payouts, and overflow
//!
//! ## Quick Start
//!
//! ```rust
//! use reftree_rs::{ReferralRecord, Simulation, SimulationConfig};
//!
//! # fn example() -> reftree_rs::Result<()> {
//! let records = vec![
//!     ReferralRecord::new("alice", "bob"),
//!     ReferralRecord::new("alice", "carol"),
//!     ReferralRecord::new("bob", "dave"),
//! ];
//!
//! let sim = Simulation::new(SimulationConfig::default())?;
//! let run = sim.run_seeded(&records, 42)?;
//!
//! println!("{}", run.stats);
//! for node in run.tree.iter() {
//!     println!("{}: {:.4}", node.name, node.commission);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Distribution Phases
//!
//! | Phase | Owner | Description |
//! |-------|-------|-------------|
//! | Ancestor chain | `engine` | distance-decayed, probability-gated payouts up to the super-root |
//! | Gravity | `engine` | first-match Bernoulli descent of the leftover into the chain-top subtree |
//! | Overflow | `builder` | undistributed remainder pooled per run |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod tree;
pub mod builder;
pub mod engine;
pub mod export;
pub mod loader;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{Node, NodeId, SimulationConfig};

// ============================================================================
// Re-exports: Tree + Builder
// ============================================================================

pub use tree::{ReferralTree, ROOT_NAME};
pub use builder::{BuildOutput, RunStats, TreeBuilder};

// ============================================================================
// Re-exports: Engine
// ============================================================================

pub use engine::{DistributionEngine, DistributionOutcome, ProbabilitySource};

// ============================================================================
// Re-exports: I/O boundary
// ============================================================================

pub use export::TreeDump;
pub use loader::ReferralRecord;

use rand::SeedableRng;
use rand::rngs::StdRng;

// ============================================================================
// Top-level Simulation handle
// ============================================================================

/// The primary entry point. A `Simulation` wraps a validated configuration
/// and runs full edge lists through tree construction and distribution.
pub struct Simulation {
    config: SimulationConfig,
}

impl Simulation {
    /// Create a simulation with the given configuration.
    ///
    /// Fails if the configuration is unusable (negative or NaN benefit).
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Run with an explicit seed. The same records and seed reproduce every
    /// commission value and the overflow total bit-for-bit.
    pub fn run_seeded(&self, records: &[ReferralRecord], seed: u64) -> Result<BuildOutput> {
        let mut rng = StdRng::seed_from_u64(seed);
        TreeBuilder::new(&self.config).build(records, &mut rng)
    }

    /// Run with an OS-entropy seed (non-reproducible).
    pub fn run(&self, records: &[ReferralRecord]) -> Result<BuildOutput> {
        let mut rng = StdRng::from_entropy();
        TreeBuilder::new(&self.config).build(records, &mut rng)
    }

    /// Access the configuration (for reporting).
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Self-referral: '{0}' appears as its own referrer")]
    SelfReferral(String),

    #[error("Duplicate parent for '{child}': referred by both '{first}' and '{second}'")]
    DuplicateParent {
        child: String,
        first: String,
        second: String,
    },

    #[error("Cyclic referral: '{0}' is never reachable from any natural root")]
    CyclicReferral(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Malformed record at line {line}: {message}")]
    MalformedRecord { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
