//! Commission decay and acceptance probability curves.
//!
//! Both curves are pure functions of the ancestor's distance from the node
//! whose attachment triggered the event (distance 1 = immediate parent).

/// Commission rate at `distance`, in percent: the first-level rate halves
/// per distance step.
pub fn commission_percent(first_level_percent: f64, distance: u32) -> f64 {
    first_level_percent / 2f64.powi(distance as i32 - 1)
}

/// Backward acceptance probability contribution by distance.
///
/// Piecewise: 0.99, 0.90, 0.50, 0.10 for distances 1..=4, then decaying by
/// 0.01 per step. Never clamped: negative values are the intended decay to
/// no-payout beyond the horizon, and only pull the combined acceptance
/// bound toward or through zero.
pub fn pow_probability(distance: u32) -> f64 {
    match distance {
        1 => 0.99,
        2 => 0.90,
        3 => 0.50,
        4 => 0.10,
        d => 0.10 - 0.01 * (d as f64 - 4.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commission_percent_halves_per_step() {
        for d in 1..12 {
            assert_eq!(
                commission_percent(50.0, d + 1) * 2.0,
                commission_percent(50.0, d),
                "rate at distance {} should be exactly half of distance {}",
                d + 1,
                d
            );
        }
        assert_eq!(commission_percent(50.0, 1), 50.0);
        assert_eq!(commission_percent(50.0, 2), 25.0);
        assert_eq!(commission_percent(50.0, 3), 12.5);
    }

    #[test]
    fn test_pow_probability_near_levels() {
        assert_eq!(pow_probability(1), 0.99);
        assert_eq!(pow_probability(2), 0.90);
        assert_eq!(pow_probability(3), 0.50);
        assert_eq!(pow_probability(4), 0.10);
    }

    #[test]
    fn test_pow_probability_tail_decays() {
        assert!((pow_probability(5) - 0.09).abs() < 1e-12);
        assert!((pow_probability(10) - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_pow_probability_goes_negative_past_horizon() {
        // Distance 15 onward the contribution is below zero; no clamping.
        assert!(pow_probability(15) < 0.0);
        assert!(pow_probability(40) < pow_probability(15));
    }
}
