// src/core/model/player.rs

//! A seated player and their score components.

use crate::config::GameRules;

use super::bookshelf::Bookshelf;
use super::goals::PersonalGoal;

/// A player of the game and everything scored against their name. The seat
/// survives disconnection; only `connected` flips.
#[derive(Debug, Clone)]
pub struct Player {
    pub username: String,
    pub age: u32,
    /// First-time players reduce the session to a single shared goal.
    pub first_game: bool,
    /// The room creator: turn-order anchor and end-of-game sentinel.
    pub first_player: bool,
    pub ready: bool,
    pub connected: bool,
    pub bookshelf: Bookshelf,
    pub personal_goal: Option<PersonalGoal>,
    /// One flag per shared goal of the session; completion is permanent.
    pub common_goal_completed: Vec<bool>,
    /// Ladder awards collected, in completion order.
    pub common_goal_points: Vec<u32>,
    pub has_end_game_card: bool,
}

impl Player {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.to_string(),
            age: 0,
            first_game: false,
            first_player: false,
            ready: false,
            connected: true,
            bookshelf: Bookshelf::new(),
            personal_goal: None,
            common_goal_completed: Vec::new(),
            common_goal_points: Vec::new(),
            has_end_game_card: false,
        }
    }

    pub fn common_goal_total(&self) -> u32 {
        self.common_goal_points.iter().sum()
    }

    pub fn personal_goal_points(&self, rules: &GameRules) -> u32 {
        self.personal_goal
            .as_ref()
            .map(|goal| goal.points(&self.bookshelf, rules))
            .unwrap_or(0)
    }

    /// Full score: adjacency groups, personal goal, shared goals and the
    /// end-game bonus.
    pub fn score(&self, rules: &GameRules) -> u32 {
        let mut score = 0;
        if self.has_end_game_card {
            score += rules.end_game_bonus;
        }
        score += self.common_goal_total();
        score += self.personal_goal_points(rules);
        score + self.bookshelf.points(rules)
    }
}
