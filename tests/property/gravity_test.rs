// tests/property/gravity_test.rs

//! After any sequence of inserts, no column may hold an empty cell below a
//! filled one.

use proptest::prelude::*;
use shelfhall::core::model::bookshelf::{Bookshelf, COLUMNS, ROWS};
use shelfhall::core::model::item::{Color, Item};

const COLORS: [Color; 6] = [
    Color::Green,
    Color::White,
    Color::Yellow,
    Color::Blue,
    Color::Cyan,
    Color::Pink,
];

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    #[test]
    fn test_gravity_holds_under_random_inserts(
        ops in prop::collection::vec((0usize..COLUMNS, 1usize..4, 0usize..6), 0..40)
    ) {
        let mut shelf = Bookshelf::new();
        for (column, count, color_index) in ops {
            let items = vec![Item::new(COLORS[color_index], 0); count];
            // Rejected inserts are part of the property: they must leave the
            // shelf untouched.
            let _ = shelf.insert(column, &items);

            for col in 0..COLUMNS {
                let mut seen_empty = false;
                for row in 0..ROWS {
                    if shelf.item_at(row, col).is_none() {
                        seen_empty = true;
                    } else {
                        prop_assert!(!seen_empty, "floating tile in column {col}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_tile_count_tracks_accepted_inserts(
        ops in prop::collection::vec((0usize..COLUMNS, 1usize..4), 0..40)
    ) {
        let mut shelf = Bookshelf::new();
        let mut accepted = 0;
        for (column, count) in ops {
            let items = vec![Item::new(Color::Blue, 0); count];
            if shelf.insert(column, &items).is_ok() {
                accepted += count;
            }
        }
        prop_assert_eq!(shelf.tile_count(), accepted);
    }
}
