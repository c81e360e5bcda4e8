// src/core/errors.rs

//! Defines the primary error type for the entire application.

use std::sync::Arc;

use thiserror::Error;

/// The main error enum, representing all possible failures within the server.
/// Using `thiserror` allows for clean error definitions and automatic `From`
/// trait implementations.
#[derive(Error, Debug, Clone)]
pub enum GameError {
    #[error("IO Error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Username already taken")]
    UsernameTaken,

    #[error("The room is full")]
    RoomFull,

    #[error("A game is already in progress")]
    GameAlreadyStarted,

    #[error("Invalid player count: {0}")]
    InvalidCapacity(usize),

    #[error("Not this player's turn")]
    NotYourTurn,

    #[error("Operation not allowed in the current state: {0}")]
    InvalidState(String),

    #[error("Invalid pick: {0}")]
    InvalidPick(String),

    #[error("Invalid reorder: {0}")]
    InvalidReorder(String),

    #[error("Invalid column index: {0}")]
    InvalidColumn(usize),

    #[error("Not enough free cells in the column")]
    ColumnFull,

    #[error("The tile pool is exhausted")]
    PoolExhausted,

    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),
}

impl From<std::io::Error> for GameError {
    fn from(err: std::io::Error) -> Self {
        GameError::Io(Arc::new(err))
    }
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        GameError::Serialization(err.to_string())
    }
}
