// src/core/model/room.rs

//! The pre-game lobby.

use rand::Rng;

use crate::core::errors::GameError;

/// Sessions hold between two and four players.
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

/// A lobby of players waiting for a session. Capacity is fixed by the first
/// player and the room is destroyed once the session starts.
#[derive(Debug, Clone)]
pub struct Room {
    id: u32,
    capacity: Option<usize>,
    usernames: Vec<String>,
}

impl Room {
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            id: rng.gen_range(0..1000),
            capacity: None,
            usernames: Vec::new(),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn usernames(&self) -> &[String] {
        &self.usernames
    }

    /// Fixes the player count. Only valid once, for 2..=4 players, and never
    /// below the number of already seated players.
    pub fn set_capacity(&mut self, capacity: usize) -> Result<(), GameError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&capacity) {
            return Err(GameError::InvalidCapacity(capacity));
        }
        if self.capacity.is_some() {
            return Err(GameError::InvalidState(
                "the room capacity is already set".into(),
            ));
        }
        if capacity < self.usernames.len() {
            return Err(GameError::InvalidCapacity(capacity));
        }
        self.capacity = Some(capacity);
        Ok(())
    }

    pub fn add(&mut self, username: &str) -> Result<(), GameError> {
        if self.is_full() {
            return Err(GameError::RoomFull);
        }
        self.usernames.push(username.to_string());
        Ok(())
    }

    /// Vacates a seat before the session starts.
    pub fn remove(&mut self, username: &str) {
        self.usernames.retain(|name| name != username);
    }

    /// True once the chosen capacity is reached. A room with no capacity yet
    /// is never full (but `add` still caps at the table maximum).
    pub fn is_full(&self) -> bool {
        match self.capacity {
            Some(capacity) => self.usernames.len() >= capacity,
            None => self.usernames.len() >= MAX_PLAYERS,
        }
    }

    /// Full in the sense that the session may start: capacity chosen and met.
    pub fn is_complete(&self) -> bool {
        self.capacity
            .is_some_and(|capacity| self.usernames.len() >= capacity)
    }
}
