// src/core/model/goals/layout.rs

//! The eight shared-goal pattern shapes. A closed sum type: each variant
//! carries only its own parameters and answers through `check`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::core::model::bookshelf::{Bookshelf, COLUMNS, ROWS};
use crate::core::model::item::{Color, Item};

/// A shared-goal pattern over a bookshelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "camelCase")]
pub enum Layout {
    /// The four corner cells hold `min_different..=max_different` distinct
    /// colors and the first and last columns are completely full.
    Corners {
        min_different: usize,
        max_different: usize,
    },
    /// A full-length diagonal of one color.
    Diagonal,
    /// At least `occurrences` completely filled rows (or columns), each with
    /// `min_different..=max_different` distinct colors.
    FullLine {
        min_different: usize,
        max_different: usize,
        occurrences: usize,
        horizontal: bool,
    },
    /// At least `occurrences` disjoint same-color groups of at least `size`
    /// tiles each.
    Group { occurrences: usize, size: usize },
    /// Five tiles of one color forming an X.
    XShape,
    /// At least `count` tiles of a single color anywhere on the shelf.
    ItemsPerColor { count: usize },
    /// Five adjacent columns with strictly ascending or descending heights,
    /// one tile per step.
    Stair,
    /// At least `occurrences` non-overlapping `size`x`size` blocks, all of
    /// one color.
    Square { occurrences: usize, size: usize },
}

impl Layout {
    /// The wire name of the shape, matching the envelope vocabulary.
    pub fn name(&self) -> &'static str {
        match self {
            Layout::Corners { .. } => "corners",
            Layout::Diagonal => "diagonal",
            Layout::FullLine { .. } => "fullLine",
            Layout::Group { .. } => "group",
            Layout::XShape => "xShape",
            Layout::ItemsPerColor { .. } => "itemsPerColor",
            Layout::Stair => "stair",
            Layout::Square { .. } => "square",
        }
    }

    /// Whether the bookshelf satisfies this pattern.
    pub fn check(&self, shelf: &Bookshelf) -> bool {
        match *self {
            Layout::Corners {
                min_different,
                max_different,
            } => check_corners(shelf, min_different, max_different),
            Layout::Diagonal => check_diagonal(shelf),
            Layout::FullLine {
                min_different,
                max_different,
                occurrences,
                horizontal,
            } => check_full_line(shelf, min_different, max_different, occurrences, horizontal),
            Layout::Group { occurrences, size } => check_group(shelf, occurrences, size),
            Layout::XShape => check_x_shape(shelf),
            Layout::ItemsPerColor { count } => check_items_per_color(shelf, count),
            Layout::Stair => check_stair(shelf),
            Layout::Square { occurrences, size } => check_square(shelf, occurrences, size),
        }
    }
}

fn distinct_colors(items: &[Item]) -> usize {
    items
        .iter()
        .map(|item| item.color)
        .collect::<HashSet<_>>()
        .len()
}

fn check_corners(shelf: &Bookshelf, min_different: usize, max_different: usize) -> bool {
    if shelf.free_cells_in_column(0) != 0 || shelf.free_cells_in_column(COLUMNS - 1) != 0 {
        return false;
    }
    let corners = [
        (0, 0),
        (ROWS - 1, 0),
        (ROWS - 1, COLUMNS - 1),
        (0, COLUMNS - 1),
    ];
    let colors: HashSet<Color> = corners
        .iter()
        .filter_map(|&(row, col)| shelf.item_at(row, col))
        .map(|item| item.color)
        .collect();
    (min_different..=max_different).contains(&colors.len())
}

fn same_color(shelf: &Bookshelf, cells: impl IntoIterator<Item = (usize, usize)>) -> bool {
    let mut color = None;
    for (row, col) in cells {
        match shelf.item_at(row, col) {
            Some(item) => match color {
                None => color = Some(item.color),
                Some(c) if c == item.color => {}
                Some(_) => return false,
            },
            None => return false,
        }
    }
    color.is_some()
}

fn check_diagonal(shelf: &Bookshelf) -> bool {
    // The 6x5 grid has four full-length diagonals: two directions, each
    // anchored at row 0 or row 1.
    for offset in 0..=(ROWS - COLUMNS) {
        if same_color(shelf, (0..COLUMNS).map(|i| (offset + i, i)))
            || same_color(shelf, (0..COLUMNS).map(|i| (offset + i, COLUMNS - 1 - i)))
        {
            return true;
        }
    }
    false
}

fn check_full_line(
    shelf: &Bookshelf,
    min_different: usize,
    max_different: usize,
    occurrences: usize,
    horizontal: bool,
) -> bool {
    let mut counter = 0;
    if horizontal {
        for row in 0..ROWS {
            if shelf.is_row_full(row) {
                let different = distinct_colors(&shelf.row_content(row));
                if (min_different..=max_different).contains(&different) {
                    counter += 1;
                }
            }
        }
    } else {
        for col in 0..COLUMNS {
            if shelf.is_column_full(col) {
                let different = distinct_colors(&shelf.column_content(col));
                if (min_different..=max_different).contains(&different) {
                    counter += 1;
                }
            }
        }
    }
    counter >= occurrences
}

fn check_group(shelf: &Bookshelf, occurrences: usize, size: usize) -> bool {
    shelf
        .color_group_sizes()
        .iter()
        .filter(|&&group| group >= size)
        .count()
        >= occurrences
}

fn check_x_shape(shelf: &Bookshelf) -> bool {
    for row in 0..ROWS - 2 {
        for col in 0..COLUMNS - 2 {
            let cells = [
                (row, col),
                (row, col + 2),
                (row + 1, col + 1),
                (row + 2, col),
                (row + 2, col + 2),
            ];
            if same_color(shelf, cells) {
                return true;
            }
        }
    }
    false
}

fn check_items_per_color(shelf: &Bookshelf, count: usize) -> bool {
    for color in Color::iter() {
        let total = (0..ROWS)
            .flat_map(|row| (0..COLUMNS).map(move |col| (row, col)))
            .filter(|&(row, col)| shelf.item_at(row, col).is_some_and(|i| i.color == color))
            .count();
        if total >= count {
            return true;
        }
    }
    false
}

fn check_stair(shelf: &Bookshelf) -> bool {
    let heights: Vec<usize> = (0..COLUMNS).map(|col| shelf.column_height(col)).collect();
    let ascending = heights.windows(2).all(|w| w[1] == w[0] + 1);
    let descending = heights.windows(2).all(|w| w[0] == w[1] + 1);
    (ascending && heights[0] >= 1) || (descending && heights[COLUMNS - 1] >= 1)
}

fn check_square(shelf: &Bookshelf, occurrences: usize, size: usize) -> bool {
    // All counted blocks must share one color; blocks may not overlap.
    // A greedy row-major scan per color is enough on a 6x5 grid.
    for color in Color::iter() {
        let mut used = [[false; COLUMNS]; ROWS];
        let mut found = 0;
        for row in 0..=(ROWS - size) {
            for col in 0..=(COLUMNS - size) {
                let block: Vec<(usize, usize)> = (0..size)
                    .flat_map(|dr| (0..size).map(move |dc| (row + dr, col + dc)))
                    .collect();
                let uniform = block.iter().all(|&(r, c)| {
                    !used[r][c] && shelf.item_at(r, c).is_some_and(|i| i.color == color)
                });
                if uniform {
                    for &(r, c) in &block {
                        used[r][c] = true;
                    }
                    found += 1;
                }
            }
        }
        if found >= occurrences {
            return true;
        }
    }
    false
}
