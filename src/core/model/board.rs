// src/core/model/board.rs

//! The shared 9x9 board: grid, usable-cell mask and tile pool.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::errors::GameError;

use super::item::Item;
use super::tile_pool::TilePool;

/// The board is always 9x9 regardless of player count.
pub const BOARD_SIZE: usize = 9;

/// Board coordinates, row-major from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coords {
    pub row: usize,
    pub col: usize,
}

impl Coords {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

// Usable-cell thresholds: the minimum player count that activates each cell,
// 0 marking a permanently dead cell. 29 cells are active with 2 players,
// 37 with 3, 45 with 4.
const CELL_THRESHOLDS: [[u8; BOARD_SIZE]; BOARD_SIZE] = [
    [0, 0, 0, 3, 4, 0, 0, 0, 0],
    [0, 0, 0, 2, 2, 4, 0, 0, 0],
    [0, 0, 3, 2, 2, 2, 3, 0, 0],
    [0, 4, 2, 2, 2, 2, 2, 2, 3],
    [4, 2, 2, 2, 2, 2, 2, 2, 4],
    [3, 2, 2, 2, 2, 2, 2, 4, 0],
    [0, 0, 3, 2, 2, 2, 3, 0, 0],
    [0, 0, 0, 4, 2, 2, 0, 0, 0],
    [0, 0, 0, 0, 4, 3, 0, 0, 0],
];

/// The shared board. A cell outside the usable mask is always empty; every
/// tile on the grid was previously removed from the pool.
#[derive(Debug, Clone)]
pub struct Board {
    grid: [[Option<Item>; BOARD_SIZE]; BOARD_SIZE],
    usable: [[bool; BOARD_SIZE]; BOARD_SIZE],
    pool: TilePool,
}

impl Board {
    /// Creates an empty board with the usable mask for `player_count` and a
    /// full tile pool.
    pub fn new(player_count: usize) -> Self {
        let mut usable = [[false; BOARD_SIZE]; BOARD_SIZE];
        for (row, thresholds) in CELL_THRESHOLDS.iter().enumerate() {
            for (col, &threshold) in thresholds.iter().enumerate() {
                usable[row][col] = threshold != 0 && (threshold as usize) <= player_count;
            }
        }
        Self {
            grid: [[None; BOARD_SIZE]; BOARD_SIZE],
            usable,
            pool: TilePool::new(),
        }
    }

    pub fn is_usable(&self, c: Coords) -> bool {
        c.row < BOARD_SIZE && c.col < BOARD_SIZE && self.usable[c.row][c.col]
    }

    pub fn item_at(&self, c: Coords) -> Option<Item> {
        self.grid[c.row][c.col]
    }

    pub fn pool(&self) -> &TilePool {
        &self.pool
    }

    /// Number of tiles currently on the grid.
    pub fn tile_count(&self) -> usize {
        self.grid
            .iter()
            .flat_map(|row| row.iter())
            .filter(|cell| cell.is_some())
            .count()
    }

    pub fn usable_cell_count(&self) -> usize {
        self.usable
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&usable| usable)
            .count()
    }

    /// Puts tiles that never reached a bookshelf back into the pool.
    pub fn return_to_pool(&mut self, items: impl IntoIterator<Item = Item>) {
        self.pool.put_back(items);
    }

    /// Draws a random tile for every empty usable cell. The pool can never
    /// empty first given the pool-conservation invariant; if it does, the
    /// session must be aborted.
    pub fn fill(&mut self, rng: &mut impl Rng) -> Result<(), GameError> {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                if self.usable[row][col] && self.grid[row][col].is_none() {
                    let item = self.pool.draw(rng).ok_or(GameError::PoolExhausted)?;
                    self.grid[row][col] = Some(item);
                }
            }
        }
        Ok(())
    }

    /// Expands `from`/`to` into the straight run of cells between them,
    /// inclusive. The endpoints may be given in either order.
    fn line_coords(from: Coords, to: Coords) -> Result<Vec<Coords>, GameError> {
        if from.row >= BOARD_SIZE
            || from.col >= BOARD_SIZE
            || to.row >= BOARD_SIZE
            || to.col >= BOARD_SIZE
        {
            return Err(GameError::InvalidPick("coordinates out of bounds".into()));
        }
        if from.row == to.row {
            let (lo, hi) = (from.col.min(to.col), from.col.max(to.col));
            Ok((lo..=hi).map(|col| Coords::new(from.row, col)).collect())
        } else if from.col == to.col {
            let (lo, hi) = (from.row.min(to.row), from.row.max(to.row));
            Ok((lo..=hi).map(|row| Coords::new(row, from.col)).collect())
        } else {
            Err(GameError::InvalidPick("not a straight line".into()))
        }
    }

    /// A cell is exposed when at least one orthogonal side is free. The board
    /// edge and any cell holding no tile count as free sides; index
    /// arithmetic is guarded so border cells never look out of bounds.
    fn is_exposed(&self, c: Coords) -> bool {
        let Coords { row, col } = c;
        (row == 0 || self.grid[row - 1][col].is_none())
            || (row + 1 == BOARD_SIZE || self.grid[row + 1][col].is_none())
            || (col == 0 || self.grid[row][col - 1].is_none())
            || (col + 1 == BOARD_SIZE || self.grid[row][col + 1].is_none())
    }

    /// Validates a pick without mutating: the run must be straight, inside
    /// the usable mask, fully occupied, and every cell exposed before any
    /// removal happens.
    pub fn validate_pick(&self, from: Coords, to: Coords) -> Result<Vec<Coords>, GameError> {
        let coords = Self::line_coords(from, to)?;
        for &c in &coords {
            if !self.usable[c.row][c.col] {
                return Err(GameError::InvalidPick(
                    "cell outside the usable mask".into(),
                ));
            }
            if self.grid[c.row][c.col].is_none() {
                return Err(GameError::InvalidPick("empty cell in the selection".into()));
            }
        }
        for &c in &coords {
            if !self.is_exposed(c) {
                return Err(GameError::InvalidPick("selection is not exposed".into()));
            }
        }
        Ok(coords)
    }

    /// Removes a straight, fully exposed run of tiles and returns them in
    /// board order. On any validation failure the board is untouched.
    pub fn pick_line(&mut self, from: Coords, to: Coords) -> Result<Vec<Item>, GameError> {
        let coords = self.validate_pick(from, to)?;
        let mut items = Vec::with_capacity(coords.len());
        for c in coords {
            if let Some(item) = self.grid[c.row][c.col].take() {
                items.push(item);
            }
        }
        Ok(items)
    }

    /// The grid as rows of optional tiles, for snapshots sent to clients.
    pub fn snapshot_grid(&self) -> Vec<Vec<Option<Item>>> {
        self.grid.iter().map(|row| row.to_vec()).collect()
    }

    /// Places a tile directly, bypassing the pool. Test scaffolding.
    #[doc(hidden)]
    pub fn set_item(&mut self, c: Coords, item: Option<Item>) {
        self.grid[c.row][c.col] = item;
    }
}
