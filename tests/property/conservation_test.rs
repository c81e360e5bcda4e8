// tests/property/conservation_test.rs

//! The 132-tile conservation invariant: at every point of a session, the
//! pool, the board, the bookshelves and any pending pick partition the
//! original bag.

use std::sync::Arc;

use proptest::prelude::*;
use shelfhall::config::Config;
use shelfhall::core::controller::SessionController;
use shelfhall::core::model::board::Coords;
use shelfhall::core::model::game::GamePhase;
use shelfhall::core::model::tile_pool::POOL_SIZE;

fn total_tiles(ctl: &SessionController) -> usize {
    let game = ctl.game().expect("session running");
    game.board().pool().len()
        + game.board().tile_count()
        + game
            .players()
            .iter()
            .map(|p| p.bookshelf.tile_count())
            .sum::<usize>()
        + ctl.pending_pick().len()
}

fn started_pair(seed: u64) -> SessionController {
    let mut ctl = SessionController::with_seed(Arc::new(Config::default()), seed);
    ctl.login("alice").unwrap();
    ctl.set_capacity("alice", 2).unwrap();
    ctl.login("bob").unwrap();
    ctl.mark_ready("alice").unwrap();
    ctl.mark_ready("bob").unwrap().expect("session starts");
    ctl
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        max_shrink_iters: 500,
        ..ProptestConfig::default()
    })]

    #[test]
    fn test_tile_conservation_under_random_turns(
        seed in any::<u64>(),
        moves in prop::collection::vec(
            (0usize..9, 0usize..9, 0usize..9, 0usize..9, 0usize..5),
            1..40
        )
    ) {
        let mut ctl = started_pair(seed);
        prop_assert_eq!(total_tiles(&ctl), POOL_SIZE);

        for (start_row, start_col, end_row, end_col, column) in moves {
            if ctl.phase() == GamePhase::Ended {
                break;
            }
            let Some(current) = ctl.current_username() else {
                break;
            };
            let from = Coords::new(start_row, start_col);
            let to = Coords::new(end_row, end_col);
            if ctl.pick(&current, from, to).is_ok() {
                // Most random columns fit; when one is full, sweep for any
                // column with room. An unplaceable pick simply stays pending.
                if ctl.insert(&current, column).is_err() {
                    for fallback in 0..5 {
                        if ctl.insert(&current, fallback).is_ok() {
                            break;
                        }
                    }
                }
            }
            prop_assert_eq!(total_tiles(&ctl), POOL_SIZE);
        }
    }

    #[test]
    fn test_disconnect_recycles_pending_pick(seed in any::<u64>()) {
        let mut ctl = started_pair(seed);
        // The top-edge pair is exposed on every freshly filled board.
        ctl.pick("alice", Coords::new(1, 3), Coords::new(1, 4)).unwrap();
        prop_assert_eq!(total_tiles(&ctl), POOL_SIZE);
        ctl.mark_disconnected("alice");
        prop_assert!(ctl.pending_pick().is_empty());
        prop_assert_eq!(total_tiles(&ctl), POOL_SIZE);
    }
}
