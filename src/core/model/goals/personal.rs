// src/core/model/goals/personal.rs

//! Private per-player target patterns, scored at game end by partial match.

use serde::{Deserialize, Serialize};

use crate::config::GameRules;
use crate::core::model::bookshelf::Bookshelf;
use crate::core::model::item::Color;

/// Number of distinct personal-goal cards.
pub const PERSONAL_GOAL_COUNT: usize = 12;

/// One marked cell of a personal target pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetCell {
    pub row: usize,
    pub col: usize,
    pub color: Color,
}

const fn cell(row: usize, col: usize, color: Color) -> TargetCell {
    TargetCell { row, col, color }
}

// The twelve card patterns: six marked cells each, one per color, positions
// given bottom-up. Static configuration, like the board's usable mask.
const PATTERNS: [[TargetCell; 6]; PERSONAL_GOAL_COUNT] = [
    [
        cell(0, 0, Color::Pink),
        cell(0, 2, Color::Blue),
        cell(1, 4, Color::Green),
        cell(2, 3, Color::White),
        cell(3, 1, Color::Yellow),
        cell(5, 2, Color::Cyan),
    ],
    [
        cell(1, 1, Color::Pink),
        cell(2, 0, Color::Green),
        cell(2, 2, Color::Yellow),
        cell(3, 4, Color::White),
        cell(4, 3, Color::Cyan),
        cell(5, 4, Color::Blue),
    ],
    [
        cell(0, 4, Color::Cyan),
        cell(1, 0, Color::Yellow),
        cell(2, 2, Color::Pink),
        cell(3, 3, Color::Green),
        cell(4, 1, Color::White),
        cell(5, 0, Color::Blue),
    ],
    [
        cell(0, 1, Color::Green),
        cell(1, 3, Color::Cyan),
        cell(2, 4, Color::White),
        cell(3, 0, Color::Pink),
        cell(4, 2, Color::Blue),
        cell(5, 4, Color::Yellow),
    ],
    [
        cell(0, 3, Color::Yellow),
        cell(1, 1, Color::Blue),
        cell(2, 0, Color::Cyan),
        cell(3, 2, Color::Green),
        cell(4, 4, Color::Pink),
        cell(5, 1, Color::White),
    ],
    [
        cell(0, 0, Color::Blue),
        cell(1, 2, Color::White),
        cell(2, 4, Color::Yellow),
        cell(3, 1, Color::Cyan),
        cell(4, 0, Color::Green),
        cell(5, 3, Color::Pink),
    ],
    [
        cell(0, 2, Color::Green),
        cell(1, 4, Color::Pink),
        cell(2, 1, Color::Cyan),
        cell(3, 3, Color::Blue),
        cell(4, 0, Color::White),
        cell(5, 2, Color::Yellow),
    ],
    [
        cell(0, 4, Color::White),
        cell(1, 1, Color::Green),
        cell(2, 3, Color::Yellow),
        cell(3, 0, Color::Blue),
        cell(4, 2, Color::Pink),
        cell(5, 0, Color::Cyan),
    ],
    [
        cell(0, 1, Color::Cyan),
        cell(1, 3, Color::Blue),
        cell(2, 0, Color::White),
        cell(3, 4, Color::Yellow),
        cell(4, 1, Color::Green),
        cell(5, 3, Color::Pink),
    ],
    [
        cell(0, 3, Color::Pink),
        cell(1, 0, Color::White),
        cell(2, 2, Color::Cyan),
        cell(3, 4, Color::Green),
        cell(4, 3, Color::Blue),
        cell(5, 1, Color::Yellow),
    ],
    [
        cell(0, 0, Color::Yellow),
        cell(1, 2, Color::Cyan),
        cell(2, 4, Color::Blue),
        cell(3, 2, Color::Pink),
        cell(4, 4, Color::White),
        cell(5, 0, Color::Green),
    ],
    [
        cell(0, 2, Color::White),
        cell(1, 0, Color::Pink),
        cell(2, 3, Color::Green),
        cell(3, 1, Color::Blue),
        cell(4, 4, Color::Cyan),
        cell(5, 4, Color::Yellow),
    ],
];

/// A private goal card. Matching is positional: a cell counts when the shelf
/// holds a tile of the pattern's color at that exact position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalGoal {
    pub index: usize,
    cells: Vec<TargetCell>,
}

impl PersonalGoal {
    pub fn by_index(index: usize) -> Self {
        Self {
            index,
            cells: PATTERNS[index].to_vec(),
        }
    }

    /// The full deck of twelve unique cards.
    pub fn deck() -> Vec<PersonalGoal> {
        (0..PERSONAL_GOAL_COUNT).map(Self::by_index).collect()
    }

    pub fn cells(&self) -> &[TargetCell] {
        &self.cells
    }

    /// Count of pattern cells whose color the shelf reproduces.
    pub fn matches(&self, shelf: &Bookshelf) -> usize {
        self.cells
            .iter()
            .filter(|target| {
                shelf
                    .item_at(target.row, target.col)
                    .is_some_and(|item| item.color == target.color)
            })
            .count()
    }

    /// Tiered score for the current shelf.
    pub fn points(&self, shelf: &Bookshelf, rules: &GameRules) -> u32 {
        rules.personal_points(self.matches(shelf))
    }
}
