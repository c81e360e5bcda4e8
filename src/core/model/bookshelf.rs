// src/core/model/bookshelf.rs

//! A player's personal 5x6 grid and its adjacency-group scoring.

use crate::config::GameRules;
use crate::core::errors::GameError;

use super::item::Item;

/// Shelf height. Row 0 is the bottom shelf.
pub const ROWS: usize = 6;

/// Shelf width.
pub const COLUMNS: usize = 5;

/// A bookshelf. Invariant: within a column, filled cells are contiguous from
/// the bottom up; there is never an empty cell below a filled one.
#[derive(Debug, Clone, Default)]
pub struct Bookshelf {
    cells: [[Option<Item>; COLUMNS]; ROWS],
}

impl Bookshelf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item_at(&self, row: usize, col: usize) -> Option<Item> {
        self.cells[row][col]
    }

    /// Empty cells remaining in `column`.
    pub fn free_cells_in_column(&self, column: usize) -> usize {
        self.cells
            .iter()
            .filter(|row| row[column].is_none())
            .count()
    }

    /// Filled cells in `column`. Gravity makes this the height of the stack.
    pub fn column_height(&self, column: usize) -> usize {
        ROWS - self.free_cells_in_column(column)
    }

    pub fn is_column_full(&self, column: usize) -> bool {
        self.free_cells_in_column(column) == 0
    }

    pub fn is_row_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(|cell| cell.is_some())
    }

    pub fn is_full(&self) -> bool {
        (0..ROWS).all(|row| self.is_row_full(row))
    }

    pub fn tile_count(&self) -> usize {
        (0..COLUMNS).map(|col| self.column_height(col)).sum()
    }

    /// The filled tiles of a row, left to right.
    pub fn row_content(&self, row: usize) -> Vec<Item> {
        self.cells[row].iter().flatten().copied().collect()
    }

    /// The filled tiles of a column, bottom to top.
    pub fn column_content(&self, column: usize) -> Vec<Item> {
        self.cells.iter().filter_map(|row| row[column]).collect()
    }

    /// Places tiles bottom-up into `column`, first item lowest.
    pub fn insert(&mut self, column: usize, items: &[Item]) -> Result<(), GameError> {
        if column >= COLUMNS {
            return Err(GameError::InvalidColumn(column));
        }
        let free = self.free_cells_in_column(column);
        if items.len() > free {
            return Err(GameError::ColumnFull);
        }
        let mut row = ROWS - free;
        for &item in items {
            self.cells[row][column] = Some(item);
            row += 1;
        }
        Ok(())
    }

    /// Sizes of all maximal 4-connected same-color groups of filled cells.
    /// Recomputed from scratch on every call; nothing incremental to go
    /// stale.
    pub fn color_group_sizes(&self) -> Vec<usize> {
        let mut visited = [[false; COLUMNS]; ROWS];
        let mut sizes = Vec::new();
        for row in 0..ROWS {
            for col in 0..COLUMNS {
                let Some(item) = self.cells[row][col] else {
                    continue;
                };
                if visited[row][col] {
                    continue;
                }
                // Flood-fill the component in the von Neumann neighborhood.
                let mut size = 0;
                let mut stack = vec![(row, col)];
                visited[row][col] = true;
                while let Some((r, c)) = stack.pop() {
                    size += 1;
                    let mut neighbors = Vec::with_capacity(4);
                    if r > 0 {
                        neighbors.push((r - 1, c));
                    }
                    if r + 1 < ROWS {
                        neighbors.push((r + 1, c));
                    }
                    if c > 0 {
                        neighbors.push((r, c - 1));
                    }
                    if c + 1 < COLUMNS {
                        neighbors.push((r, c + 1));
                    }
                    for (nr, nc) in neighbors {
                        if !visited[nr][nc]
                            && self.cells[nr][nc].is_some_and(|n| n.color == item.color)
                        {
                            visited[nr][nc] = true;
                            stack.push((nr, nc));
                        }
                    }
                }
                sizes.push(size);
            }
        }
        sizes
    }

    /// Adjacency score: every same-color group of at least three tiles earns
    /// the saturating tier value for its size.
    pub fn points(&self, rules: &GameRules) -> u32 {
        self.color_group_sizes()
            .iter()
            .map(|&size| rules.adjacency_points(size))
            .sum()
    }

    /// The grid as rows of optional tiles, bottom row first, for snapshots.
    pub fn snapshot_grid(&self) -> Vec<Vec<Option<Item>>> {
        self.cells.iter().map(|row| row.to_vec()).collect()
    }
}
