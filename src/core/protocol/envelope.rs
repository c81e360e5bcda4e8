// src/core/protocol/envelope.rs

//! The structured envelopes exchanged with clients. Every message is a JSON
//! object carrying a `category` discriminator plus category-specific fields.

use serde::{Deserialize, Serialize};

use crate::core::model::goals::{Layout, PersonalGoal};
use crate::core::model::item::Item;

/// A client-to-server request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "camelCase")]
pub enum Request {
    /// Login step one: claim a username. Reconnects a disconnected seat.
    Username { username: String },
    /// Login step two.
    Age { age: u32 },
    /// Login step three: first-time players reduce the shared-goal count.
    #[serde(rename_all = "camelCase")]
    FirstGame { first_game: bool },
    /// Room capacity, sent by the room creator only.
    NumPlayers { num: usize },
    /// The client is ready to receive the game.
    Ready,
    /// A straight run on the board, given by its two endpoints.
    #[serde(rename_all = "camelCase")]
    Pick {
        start_row: usize,
        start_col: usize,
        end_row: usize,
        end_col: usize,
    },
    /// Permutation to apply to the pending pick before insertion.
    Sort { order: Vec<usize> },
    /// Bookshelf column for the pending pick.
    Insert { column: usize },
    /// Heartbeat reply.
    Ping,
}

impl Request {
    pub fn category(&self) -> &'static str {
        match self {
            Request::Username { .. } => "username",
            Request::Age { .. } => "age",
            Request::FirstGame { .. } => "firstGame",
            Request::NumPlayers { .. } => "numPlayers",
            Request::Ready => "ready",
            Request::Pick { .. } => "pick",
            Request::Sort { .. } => "sort",
            Request::Insert { .. } => "insert",
            Request::Ping => "ping",
        }
    }
}

/// One player's bookshelf as sent over the wire, bottom row first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookshelfView {
    pub username: String,
    pub grid: Vec<Vec<Option<Item>>>,
}

/// The board grid as sent over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    pub grid: Vec<Vec<Option<Item>>>,
}

/// A shared goal as presented to clients: its shape and the award currently
/// on top of the ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonGoalView {
    pub layout: Layout,
    pub top_score: u32,
}

/// One line of a scoreboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub username: String,
    pub score: u32,
}

/// Why an insert was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InsertRefusal {
    NotValidNumber,
    NotEnoughFreeCells,
    NotYourTurn,
}

/// A server-to-client message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "camelCase")]
pub enum Response {
    /// Login accepted; echoes the username.
    Username { username: String },
    UsernameRetry,
    /// The lobby rejected the login because the room is at capacity.
    RoomFull,
    /// A session is running and the username does not belong to it.
    GameAlreadyStarted,
    /// Sent to the room creator after login.
    ChooseCapacity,
    CapacityRetry,
    WaitingRoom,
    /// The full session view at start or resynchronization.
    #[serde(rename_all = "camelCase")]
    StartGame {
        personal_goal: PersonalGoal,
        common_goals: Vec<CommonGoalView>,
        bookshelves: Vec<BookshelfView>,
        board: BoardView,
        top_scores: Vec<u32>,
    },
    /// Post-turn state fanned out to every client.
    Update {
        board: BoardView,
        bookshelves: Vec<BookshelfView>,
        points: Vec<ScoreEntry>,
    },
    /// It is the receiving client's turn.
    Turn,
    /// Someone else's turn.
    OtherTurn { username: String },
    /// The tiles removed by an accepted pick, in board order.
    Picked { items: Vec<Item> },
    PickRetry,
    SortRetry,
    InsertRetry { reason: InsertRefusal },
    EndGame {
        winners: Vec<String>,
        scores: Vec<ScoreEntry>,
    },
    Disconnected { username: String },
    Reconnected { username: String },
    /// Server heartbeat.
    Ping,
    /// Reply to a client heartbeat.
    Pong,
    /// Catch-all for protocol violations; the connection stays open.
    Error { message: String },
}
