//! Simulation configuration — the externally supplied distribution knobs.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Distribution constants for one simulation run.
///
/// All four values are externally supplied, never computed. Percentages are
/// expected in [0, 100]; out-of-range values are tolerated (they only push
/// acceptance probabilities toward or through zero) but logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Fixed benefit unit generated by one referral signup.
    pub benefit: f64,
    /// Commission rate at distance 1; halves per distance step beyond that.
    pub first_level_commission_percent: f64,
    /// Per-user additive acceptance probability, in percent.
    pub pos_probability_percent: f64,
    /// Rate of the fixed gravity award, relative to the benefit unit.
    pub gravity_commission_percent: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            benefit: 100.0,
            first_level_commission_percent: 50.0,
            pos_probability_percent: 10.0,
            gravity_commission_percent: 10.0,
        }
    }
}

impl SimulationConfig {
    /// Check the configuration is usable.
    ///
    /// Zero benefit is valid (a run degrades to zero-value events). Negative
    /// or NaN benefit is not. Percentages outside [0, 100] pass with a
    /// warning; the distribution math treats the resulting non-positive
    /// acceptance bounds as zero-probability.
    pub fn validate(&self) -> Result<()> {
        if self.benefit.is_nan() || self.benefit < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "benefit must be a non-negative number, got {}",
                self.benefit
            )));
        }
        for (name, value) in [
            ("first_level_commission_percent", self.first_level_commission_percent),
            ("pos_probability_percent", self.pos_probability_percent),
            ("gravity_commission_percent", self.gravity_commission_percent),
        ] {
            if value.is_nan() {
                return Err(Error::InvalidConfig(format!("{name} must not be NaN")));
            }
            if !(0.0..=100.0).contains(&value) {
                tracing::warn!(%name, %value, "percentage outside [0, 100], tolerating");
            }
        }
        Ok(())
    }
}
