// src/core/model/mod.rs

//! The game model: tiles, board, bookshelves, goals, players and the session
//! state machine.

pub mod board;
pub mod bookshelf;
pub mod game;
pub mod goals;
pub mod item;
pub mod player;
pub mod room;
pub mod tile_pool;

pub use board::{BOARD_SIZE, Board, Coords};
pub use bookshelf::Bookshelf;
pub use game::{GameModel, GamePhase};
pub use item::{Color, Item};
pub use player::Player;
pub use room::Room;
pub use tile_pool::TilePool;
