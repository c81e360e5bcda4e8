use std::collections::HashSet;

use shelfhall::config::GameRules;
use shelfhall::core::model::bookshelf::Bookshelf;
use shelfhall::core::model::goals::{PERSONAL_GOAL_COUNT, PersonalGoal};
use shelfhall::core::model::item::{Color, Item};

#[test]
fn test_deck_has_twelve_unique_cards() {
    let deck = PersonalGoal::deck();
    assert_eq!(deck.len(), PERSONAL_GOAL_COUNT);
    let indices: HashSet<usize> = deck.iter().map(|goal| goal.index).collect();
    assert_eq!(indices.len(), PERSONAL_GOAL_COUNT);
}

#[test]
fn test_patterns_mark_six_cells_one_per_color() {
    for goal in PersonalGoal::deck() {
        assert_eq!(goal.cells().len(), 6, "card {}", goal.index);
        let colors: HashSet<Color> = goal.cells().iter().map(|cell| cell.color).collect();
        assert_eq!(colors.len(), 6, "card {}", goal.index);
        let positions: HashSet<(usize, usize)> = goal
            .cells()
            .iter()
            .map(|cell| (cell.row, cell.col))
            .collect();
        assert_eq!(positions.len(), 6, "card {}", goal.index);
    }
}

#[test]
fn test_empty_shelf_scores_zero() {
    let rules = GameRules::default();
    let shelf = Bookshelf::new();
    for goal in PersonalGoal::deck() {
        assert_eq!(goal.matches(&shelf), 0);
        assert_eq!(goal.points(&shelf, &rules), 0);
    }
}

#[test]
fn test_single_match_scores_first_tier() {
    let rules = GameRules::default();
    let goal = PersonalGoal::by_index(0);
    let target = goal.cells()[0];
    // Stack filler below the target cell so gravity puts the right color in
    // the right row.
    let mut shelf = Bookshelf::new();
    let filler_color = if target.color == Color::Green {
        Color::White
    } else {
        Color::Green
    };
    let mut column = vec![Item::new(filler_color, 0); target.row];
    column.push(Item::new(target.color, 0));
    shelf.insert(target.col, &column).unwrap();
    assert_eq!(goal.matches(&shelf), 1);
    assert_eq!(goal.points(&shelf, &rules), 1);
}

#[test]
fn test_wrong_color_at_target_does_not_match() {
    let goal = PersonalGoal::by_index(0);
    let target = goal.cells()[0];
    let wrong = if target.color == Color::Blue {
        Color::Pink
    } else {
        Color::Blue
    };
    let mut shelf = Bookshelf::new();
    let column = vec![Item::new(wrong, 0); target.row + 1];
    shelf.insert(target.col, &column).unwrap();
    assert_eq!(goal.matches(&shelf), 0);
}

#[test]
fn test_full_match_scores_top_tier() {
    let rules = GameRules::default();
    let goal = PersonalGoal::by_index(3);
    let mut shelf = Bookshelf::new();
    // Build each column tall enough, then check that all six pattern cells
    // line up.
    for col in 0..5 {
        let mut column: Vec<Item> = Vec::new();
        for row in 0..6 {
            let color = goal
                .cells()
                .iter()
                .find(|cell| cell.row == row && cell.col == col)
                .map(|cell| cell.color);
            match color {
                Some(color) => column.push(Item::new(color, 0)),
                // Filler at a non-pattern cell can never count as a match.
                None => column.push(Item::new(Color::Green, 0)),
            }
        }
        shelf.insert(col, &column).unwrap();
    }
    assert_eq!(goal.matches(&shelf), 6);
    assert_eq!(goal.points(&shelf, &rules), 12);
}

#[test]
fn test_tier_table_is_monotone() {
    let rules = GameRules::default();
    let mut last = 0;
    for matches in 1..=6 {
        let points = rules.personal_points(matches);
        assert!(points > last, "tier for {matches} matches must grow");
        last = points;
    }
}
