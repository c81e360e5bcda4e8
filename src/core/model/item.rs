// src/core/model/item.rs

//! The tile type shared by the board, the pool and the bookshelves.

use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

/// The number of artwork variants per color.
pub const VARIANTS: u8 = 3;

/// A tile color. The full pool holds 22 tiles of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "camelCase")]
pub enum Color {
    Green,
    White,
    Yellow,
    Blue,
    Cyan,
    Pink,
}

/// A single tile: a color plus one of three artwork variants.
/// Tiles carry no identity beyond value equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    pub color: Color,
    pub variant: u8,
}

impl Item {
    pub fn new(color: Color, variant: u8) -> Self {
        debug_assert!(variant < VARIANTS);
        Self { color, variant }
    }
}
