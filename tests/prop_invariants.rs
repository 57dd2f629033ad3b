//! Property tests: random forests × random seeds.

use proptest::prelude::*;
use proptest::sample::Index;

use reftree_rs::{BuildOutput, ReferralRecord, Simulation, SimulationConfig};

/// Generate a valid referral log by construction: nodes u1..un each pick a
/// parent among the earlier nodes, so every identifier has exactly one
/// referrer, u0 is the lone natural root, and no cycles are possible.
fn forest() -> impl Strategy<Value = Vec<ReferralRecord>> {
    (2usize..25).prop_flat_map(|n| {
        proptest::collection::vec(any::<Index>(), n - 1).prop_map(|parents| {
            parents
                .iter()
                .enumerate()
                .map(|(i, pick)| {
                    let child = i + 1;
                    let parent = pick.index(child);
                    ReferralRecord::new(format!("u{parent}"), format!("u{child}"))
                })
                .collect()
        })
    })
}

fn run(records: &[ReferralRecord], seed: u64) -> BuildOutput {
    Simulation::new(SimulationConfig::default())
        .expect("default config validates")
        .run_seeded(records, seed)
        .expect("constructed forest always builds")
}

proptest! {
    #[test]
    fn size_invariant_holds_everywhere(records in forest(), seed in any::<u64>()) {
        let out = run(&records, seed);
        for node in out.tree.iter() {
            let child_sum: u64 = node.children.iter().map(|c| out.tree.node(*c).size).sum();
            prop_assert_eq!(node.size, 1 + child_sum, "node '{}'", &node.name);
        }
    }

    #[test]
    fn benefit_is_conserved_globally(records in forest(), seed in any::<u64>()) {
        let out = run(&records, seed);
        let paid: f64 = out.tree.iter().map(|n| n.commission).sum();
        let expected = out.stats.events as f64 * 100.0;
        prop_assert!(
            (paid + out.stats.overflow_pool - expected).abs() < 1e-6,
            "paid {} + overflow {} != {}", paid, out.stats.overflow_pool, expected
        );
    }

    #[test]
    fn one_event_per_edge_plus_root_attachment(records in forest(), seed in any::<u64>()) {
        let out = run(&records, seed);
        // Every edge fires one event, plus one for attaching u0 to GENESIS.
        prop_assert_eq!(out.stats.events, records.len() + 1);
        prop_assert_eq!(out.stats.participants, records.len() + 1);
    }

    #[test]
    fn same_seed_same_commissions(records in forest(), seed in any::<u64>()) {
        let first = run(&records, seed);
        let second = run(&records, seed);
        let bits = |out: &BuildOutput| -> Vec<u64> {
            out.tree.iter().map(|n| n.commission.to_bits()).collect()
        };
        prop_assert_eq!(bits(&first), bits(&second));
        prop_assert_eq!(
            first.stats.overflow_pool.to_bits(),
            second.stats.overflow_pool.to_bits()
        );
    }
}
