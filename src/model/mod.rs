//! # Referral Tree Model
//!
//! Clean DTOs for the referral tree and its configuration.
//! These types cross every boundary: builder ↔ engine ↔ export ↔ user.
//!
//! Design rule: this module is pure data — no I/O, no randomness, no
//! tree-wide bookkeeping (that lives in [`crate::tree`]).

pub mod node;
pub mod config;

pub use node::{Node, NodeId};
pub use config::SimulationConfig;
