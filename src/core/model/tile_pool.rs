// src/core/model/tile_pool.rs

//! The shared bag of tiles a session draws from.

use rand::Rng;
use strum::IntoEnumIterator;

use super::item::{Color, Item, VARIANTS};

/// Tiles per color in a fresh pool.
pub const TILES_PER_COLOR: usize = 22;

/// Total tiles in a fresh pool: 6 colors * 22.
pub const POOL_SIZE: usize = 132;

/// A multiset of tiles. It only ever shrinks by drawing, except when a
/// disconnected seat's pending pick is recycled back into it.
#[derive(Debug, Clone)]
pub struct TilePool {
    items: Vec<Item>,
}

impl TilePool {
    /// Builds the full 132-tile bag: 22 per color, cycling the three variants.
    pub fn new() -> Self {
        let mut items = Vec::with_capacity(POOL_SIZE);
        for color in Color::iter() {
            for i in 0..TILES_PER_COLOR {
                items.push(Item::new(color, (i % VARIANTS as usize) as u8));
            }
        }
        Self { items }
    }

    /// Removes and returns a uniformly random remaining tile.
    pub fn draw(&mut self, rng: &mut impl Rng) -> Option<Item> {
        if self.items.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.items.len());
        Some(self.items.swap_remove(index))
    }

    /// Puts tiles back into the bag.
    pub fn put_back(&mut self, items: impl IntoIterator<Item = Item>) {
        self.items.extend(items);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for TilePool {
    fn default() -> Self {
        Self::new()
    }
}
