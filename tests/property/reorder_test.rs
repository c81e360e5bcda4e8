// tests/property/reorder_test.rs

//! Reordering a pick must be a bijection over the same multiset of tiles;
//! anything else is rejected without touching the pending run.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;
use shelfhall::config::Config;
use shelfhall::core::controller::SessionController;
use shelfhall::core::model::board::Coords;

fn started_pair(seed: u64) -> SessionController {
    let mut ctl = SessionController::with_seed(Arc::new(Config::default()), seed);
    ctl.login("alice").unwrap();
    ctl.set_capacity("alice", 2).unwrap();
    ctl.login("bob").unwrap();
    ctl.mark_ready("alice").unwrap();
    ctl.mark_ready("bob").unwrap().expect("session starts");
    ctl
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    order.len() == len
        && order.iter().all(|&i| i < len)
        && order.iter().collect::<HashSet<_>>().len() == len
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        ..ProptestConfig::default()
    })]

    #[test]
    fn test_reorder_accepts_exactly_the_permutations(
        seed in any::<u64>(),
        order in prop::collection::vec(0usize..4, 0..4)
    ) {
        let mut ctl = started_pair(seed);
        let picked = ctl
            .pick("alice", Coords::new(1, 3), Coords::new(1, 4))
            .unwrap();

        let result = ctl.reorder("alice", &order);
        if is_permutation(&order, picked.len()) {
            prop_assert!(result.is_ok());
            // Same multiset, permuted positions.
            for (position, &source) in order.iter().enumerate() {
                prop_assert_eq!(ctl.pending_pick()[position], picked[source]);
            }
        } else {
            prop_assert!(result.is_err());
            prop_assert_eq!(ctl.pending_pick(), picked.as_slice());
        }
    }
}
