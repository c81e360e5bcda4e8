use rand::SeedableRng;
use rand::rngs::SmallRng;
use shelfhall::core::GameError;
use shelfhall::core::model::board::{BOARD_SIZE, Board, Coords};
use shelfhall::core::model::item::{Color, Item};
use shelfhall::core::model::tile_pool::POOL_SIZE;

#[test]
fn test_usable_mask_grows_with_player_count() {
    assert_eq!(Board::new(2).usable_cell_count(), 29);
    assert_eq!(Board::new(3).usable_cell_count(), 37);
    assert_eq!(Board::new(4).usable_cell_count(), 45);
}

#[test]
fn test_mask_is_monotone_in_player_count() {
    let two = Board::new(2);
    let four = Board::new(4);
    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            let c = Coords::new(row, col);
            if two.is_usable(c) {
                assert!(four.is_usable(c), "cell {c:?} lost at higher count");
            }
        }
    }
}

#[test]
fn test_fill_covers_mask_and_conserves_tiles() {
    let mut board = Board::new(2);
    board.fill(&mut SmallRng::seed_from_u64(7)).unwrap();
    assert_eq!(board.tile_count(), 29);
    assert_eq!(board.pool().len(), POOL_SIZE - 29);
    // Dead cells stay empty.
    assert!(board.item_at(Coords::new(0, 0)).is_none());
    assert!(board.item_at(Coords::new(8, 8)).is_none());
}

#[test]
fn test_pick_requires_straight_line() {
    let mut board = Board::new(2);
    board.fill(&mut SmallRng::seed_from_u64(7)).unwrap();
    let err = board
        .pick_line(Coords::new(1, 3), Coords::new(2, 4))
        .unwrap_err();
    assert!(matches!(err, GameError::InvalidPick(_)));
}

#[test]
fn test_pick_rejects_empty_cells() {
    let mut board = Board::new(2);
    let err = board
        .pick_line(Coords::new(1, 3), Coords::new(1, 4))
        .unwrap_err();
    assert!(matches!(err, GameError::InvalidPick(_)));
}

#[test]
fn test_pick_rejects_dead_cells() {
    let mut board = Board::new(2);
    board.fill(&mut SmallRng::seed_from_u64(7)).unwrap();
    // (0, 3) only activates with three players.
    let err = board
        .pick_line(Coords::new(0, 3), Coords::new(1, 3))
        .unwrap_err();
    assert!(matches!(err, GameError::InvalidPick(_)));
}

#[test]
fn test_pick_rejects_buried_line_on_full_board() {
    let mut board = Board::new(2);
    board.fill(&mut SmallRng::seed_from_u64(7)).unwrap();
    // The middle of row 4 has four occupied neighbors on a freshly filled
    // board: not exposed.
    let before = board.tile_count();
    let err = board
        .pick_line(Coords::new(4, 3), Coords::new(4, 5))
        .unwrap_err();
    assert!(matches!(err, GameError::InvalidPick(_)));
    assert_eq!(board.tile_count(), before);
}

#[test]
fn test_pick_exposed_edge_line() {
    let mut board = Board::new(2);
    board.fill(&mut SmallRng::seed_from_u64(7)).unwrap();
    // Row 1 cells border the dead row above them, so they are exposed.
    let picked = board
        .pick_line(Coords::new(1, 3), Coords::new(1, 4))
        .unwrap();
    assert_eq!(picked.len(), 2);
    assert!(board.item_at(Coords::new(1, 3)).is_none());
    assert!(board.item_at(Coords::new(1, 4)).is_none());
    assert_eq!(board.tile_count(), 27);
    // The pool is untouched by a pick.
    assert_eq!(board.pool().len(), POOL_SIZE - 29);
}

#[test]
fn test_pick_returns_items_in_board_order() {
    let mut board = Board::new(2);
    board.set_item(Coords::new(1, 3), Some(Item::new(Color::Green, 0)));
    board.set_item(Coords::new(1, 4), Some(Item::new(Color::Pink, 0)));
    let picked = board
        .pick_line(Coords::new(1, 4), Coords::new(1, 3))
        .unwrap();
    // Reversed endpoints still yield left-to-right board order.
    assert_eq!(picked[0].color, Color::Green);
    assert_eq!(picked[1].color, Color::Pink);
}

#[test]
fn test_pick_single_cell() {
    let mut board = Board::new(2);
    board.set_item(Coords::new(5, 1), Some(Item::new(Color::Cyan, 2)));
    let picked = board
        .pick_line(Coords::new(5, 1), Coords::new(5, 1))
        .unwrap();
    assert_eq!(picked.len(), 1);
}

#[test]
fn test_pick_out_of_bounds() {
    let mut board = Board::new(2);
    let err = board
        .pick_line(Coords::new(9, 0), Coords::new(9, 2))
        .unwrap_err();
    assert!(matches!(err, GameError::InvalidPick(_)));
}

#[test]
fn test_validation_failure_leaves_board_untouched() {
    let mut board = Board::new(2);
    board.set_item(Coords::new(1, 3), Some(Item::new(Color::Blue, 0)));
    // (1, 4) is empty, so the straight run mixes full and empty cells.
    let err = board
        .pick_line(Coords::new(1, 3), Coords::new(1, 5))
        .unwrap_err();
    assert!(matches!(err, GameError::InvalidPick(_)));
    assert!(board.item_at(Coords::new(1, 3)).is_some());
}
