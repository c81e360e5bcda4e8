// src/core/protocol/mod.rs

pub mod codec;
pub mod envelope;

pub use codec::EnvelopeCodec;
pub use envelope::{
    BoardView, BookshelfView, CommonGoalView, InsertRefusal, Request, Response, ScoreEntry,
};
