use shelfhall::config::GameRules;
use shelfhall::core::GameError;
use shelfhall::core::model::bookshelf::{Bookshelf, COLUMNS, ROWS};
use shelfhall::core::model::item::{Color, Item};

fn items(colors: &[Color]) -> Vec<Item> {
    colors.iter().map(|&c| Item::new(c, 1)).collect()
}

#[test]
fn test_insert_places_bottom_up() {
    let mut shelf = Bookshelf::new();
    shelf
        .insert(2, &items(&[Color::Blue, Color::Pink]))
        .unwrap();
    assert_eq!(shelf.item_at(0, 2).unwrap().color, Color::Blue);
    assert_eq!(shelf.item_at(1, 2).unwrap().color, Color::Pink);
    assert!(shelf.item_at(2, 2).is_none());
    assert_eq!(shelf.free_cells_in_column(2), ROWS - 2);
}

#[test]
fn test_insert_stacks_on_existing_tiles() {
    let mut shelf = Bookshelf::new();
    shelf.insert(0, &items(&[Color::Green])).unwrap();
    shelf.insert(0, &items(&[Color::White])).unwrap();
    assert_eq!(shelf.item_at(0, 0).unwrap().color, Color::Green);
    assert_eq!(shelf.item_at(1, 0).unwrap().color, Color::White);
    assert_eq!(shelf.column_height(0), 2);
}

#[test]
fn test_insert_invalid_column() {
    let mut shelf = Bookshelf::new();
    let err = shelf.insert(COLUMNS, &items(&[Color::Blue])).unwrap_err();
    assert!(matches!(err, GameError::InvalidColumn(c) if c == COLUMNS));
}

#[test]
fn test_insert_rejected_when_column_lacks_space() {
    // One free cell left, three tiles requested: refused, shelf unchanged.
    let mut shelf = Bookshelf::new();
    shelf
        .insert(3, &items(&[Color::Blue; 5]))
        .unwrap();
    let err = shelf
        .insert(3, &items(&[Color::Pink, Color::Pink, Color::Pink]))
        .unwrap_err();
    assert!(matches!(err, GameError::ColumnFull));
    assert_eq!(shelf.column_height(3), 5);
    assert!(shelf.item_at(5, 3).is_none());
}

#[test]
fn test_insert_exactly_fills_column() {
    let mut shelf = Bookshelf::new();
    shelf.insert(1, &items(&[Color::Cyan; ROWS])).unwrap();
    assert!(shelf.is_column_full(1));
    assert_eq!(shelf.free_cells_in_column(1), 0);
}

#[test]
fn test_row_and_column_queries() {
    let mut shelf = Bookshelf::new();
    for col in 0..COLUMNS {
        shelf.insert(col, &items(&[Color::Yellow])).unwrap();
    }
    assert!(shelf.is_row_full(0));
    assert!(!shelf.is_row_full(1));
    assert_eq!(shelf.row_content(0).len(), COLUMNS);
    assert_eq!(shelf.column_content(0).len(), 1);
    assert!(!shelf.is_full());
}

#[test]
fn test_full_shelf() {
    let mut shelf = Bookshelf::new();
    for col in 0..COLUMNS {
        shelf.insert(col, &items(&[Color::Green; ROWS])).unwrap();
    }
    assert!(shelf.is_full());
    assert_eq!(shelf.tile_count(), ROWS * COLUMNS);
}

#[test]
fn test_points_empty_shelf() {
    let shelf = Bookshelf::new();
    assert_eq!(shelf.points(&GameRules::default()), 0);
}

#[test]
fn test_points_pair_below_minimum_group() {
    // A lone pair is below the three-tile minimum and scores nothing.
    let mut shelf = Bookshelf::new();
    shelf.insert(0, &items(&[Color::Blue, Color::Blue])).unwrap();
    assert_eq!(shelf.points(&GameRules::default()), 0);
}

#[test]
fn test_points_triple_scores_first_tier() {
    let mut shelf = Bookshelf::new();
    shelf
        .insert(0, &items(&[Color::Blue, Color::Blue, Color::Blue]))
        .unwrap();
    assert_eq!(shelf.points(&GameRules::default()), 2);
}

#[test]
fn test_points_column_plus_neighbor_is_one_group() {
    // A full same-color column plus one adjacent tile: a single 7-tile group.
    let mut shelf = Bookshelf::new();
    shelf.insert(0, &items(&[Color::Pink; ROWS])).unwrap();
    shelf.insert(1, &items(&[Color::Pink])).unwrap();
    let sizes = shelf.color_group_sizes();
    assert_eq!(sizes, vec![7]);
    assert_eq!(shelf.points(&GameRules::default()), 8);
}

#[test]
fn test_group_sizes_split_by_color() {
    let mut shelf = Bookshelf::new();
    shelf
        .insert(0, &items(&[Color::Blue, Color::Green, Color::Blue]))
        .unwrap();
    let mut sizes = shelf.color_group_sizes();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![1, 1, 1]);
}
