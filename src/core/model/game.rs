// src/core/model/game.rs

//! The session model: board, players, goal decks and the turn/end-game
//! state machine.

use rand::Rng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::GameRules;
use crate::core::errors::GameError;

use super::board::{Board, Coords};
use super::goals::{CommonGoal, PersonalGoal, layout_deck};
use super::item::Item;
use super::player::Player;

/// Where a session is in its lifecycle. `Lobby` exists only before the model
/// is built; a constructed `GameModel` starts in `InProgress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    Lobby,
    InProgress,
    LastRound,
    Ended,
}

/// A running session. Created once the room fills, mutated turn by turn,
/// logically destroyed once winners are computed.
#[derive(Debug)]
pub struct GameModel {
    board: Board,
    players: Vec<Player>,
    common_goals: Vec<CommonGoal>,
    current: usize,
    phase: GamePhase,
    rules: GameRules,
}

impl GameModel {
    /// Builds and starts the session: fills the board, deals a personal goal
    /// to every player and draws the shared goals (one if anyone is playing
    /// their first game, two otherwise). The current player is the room
    /// creator.
    pub fn start(
        mut players: Vec<Player>,
        rules: GameRules,
        mut rng: SmallRng,
    ) -> Result<Self, GameError> {
        let mut board = Board::new(players.len());
        board.fill(&mut rng)?;

        let mut personal_deck = PersonalGoal::deck();
        let mut first_game = false;
        let mut current = 0;
        for (index, player) in players.iter_mut().enumerate() {
            let drawn = rng.gen_range(0..personal_deck.len());
            player.personal_goal = Some(personal_deck.swap_remove(drawn));
            if player.first_player {
                current = index;
            }
            if player.first_game {
                first_game = true;
            }
        }

        let goal_count = if first_game { 1 } else { 2 };
        let mut layouts = layout_deck();
        let ladder = rules.common_ladder(players.len());
        let mut common_goals = Vec::with_capacity(goal_count);
        for _ in 0..goal_count {
            let drawn = rng.gen_range(0..layouts.len());
            common_goals.push(CommonGoal::new(layouts.swap_remove(drawn), ladder.clone()));
        }
        for player in players.iter_mut() {
            player.common_goal_completed = vec![false; goal_count];
        }

        info!(
            players = players.len(),
            common_goals = goal_count,
            "Session started"
        );
        Ok(Self {
            board,
            players,
            common_goals,
            current,
            phase: GamePhase::InProgress,
            rules,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Replaces the board and shared goals of a running session, resizing
    /// every player's completion flags to match. Used to stage specific
    /// setups.
    pub fn set_game(&mut self, board: Board, common_goals: Vec<CommonGoal>) {
        let goal_count = common_goals.len();
        self.board = board;
        self.common_goals = common_goals;
        for player in self.players.iter_mut() {
            player.common_goal_completed = vec![false; goal_count];
            player.common_goal_points.clear();
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, username: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.username == username)
    }

    pub fn player_mut(&mut self, username: &str) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.username == username)
    }

    pub fn common_goals(&self) -> &[CommonGoal] {
        &self.common_goals
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// The top of each shared-goal ladder, in deck order.
    pub fn top_scores(&self) -> Vec<u32> {
        self.common_goals
            .iter()
            .map(|goal| goal.top_score().unwrap_or(0))
            .collect()
    }

    /// Every player's live score, in seating order.
    pub fn current_points(&self) -> Vec<(String, u32)> {
        self.players
            .iter()
            .map(|p| (p.username.clone(), p.score(&self.rules)))
            .collect()
    }

    /// Removes a straight exposed run from the board for the current player.
    pub fn pick(&mut self, from: Coords, to: Coords) -> Result<Vec<Item>, GameError> {
        if self.phase == GamePhase::Ended {
            return Err(GameError::InvalidState("the game has ended".into()));
        }
        self.board.pick_line(from, to)
    }

    /// Inserts the picked tiles into the current player's bookshelf,
    /// re-evaluates shared goals and arms the last round when the shelf
    /// fills. Does not advance the turn.
    pub fn place(&mut self, items: &[Item], column: usize) -> Result<(), GameError> {
        if self.phase == GamePhase::Ended {
            return Err(GameError::InvalidState("the game has ended".into()));
        }
        let current = self.current;
        self.players[current].bookshelf.insert(column, items)?;

        for index in 0..self.common_goals.len() {
            let satisfied = {
                let player = &self.players[current];
                !player.common_goal_completed[index]
                    && self.common_goals[index].check(&player.bookshelf)
            };
            if satisfied {
                let award = self.common_goals[index].claim();
                let player = &mut self.players[current];
                player.common_goal_completed[index] = true;
                if let Some(points) = award {
                    player.common_goal_points.push(points);
                    info!(
                        player = %player.username,
                        goal = self.common_goals[index].layout().name(),
                        points,
                        "Common goal completed"
                    );
                }
            }
        }

        let player = &mut self.players[current];
        if self.phase == GamePhase::InProgress && player.bookshelf.is_full() {
            player.has_end_game_card = true;
            self.phase = GamePhase::LastRound;
            info!(player = %player.username, "Bookshelf full, last round begins");
        }
        Ok(())
    }

    /// Advances the turn pointer in fixed seating order, skipping
    /// disconnected seats. During the last round the game ends the moment
    /// the pointer would return to the room creator. If every other seat is
    /// disconnected the pointer stalls on the current player.
    pub fn advance_turn(&mut self) -> GamePhase {
        if self.phase == GamePhase::Ended {
            return self.phase;
        }
        let count = self.players.len();
        let mut index = self.current;
        for _ in 0..count {
            index = (index + 1) % count;
            if self.phase == GamePhase::LastRound && self.players[index].first_player {
                self.phase = GamePhase::Ended;
                info!("Last round complete, game ended");
                return self.phase;
            }
            if self.players[index].connected {
                self.current = index;
                debug!(player = %self.players[index].username, "Turn advanced");
                return self.phase;
            }
        }
        self.phase
    }

    /// Recycles a run that was picked but never placed. Used when the picking
    /// player disconnects mid-turn; keeps the 132-tile conservation intact.
    pub fn recycle_pick(&mut self, items: Vec<Item>) {
        self.board.return_to_pool(items);
    }

    /// The final scoreboard in seating order, plus the winner list. Preserved
    /// house rule: with more than one top scorer, the room creator is
    /// excluded from the winners.
    pub fn final_standings(&self) -> (Vec<(String, u32)>, Vec<String>) {
        let scores: Vec<(String, u32)> = self
            .players
            .iter()
            .map(|p| (p.username.clone(), p.score(&self.rules)))
            .collect();
        let best = scores.iter().map(|&(_, s)| s).max().unwrap_or(0);
        let mut winners: Vec<String> = self
            .players
            .iter()
            .zip(scores.iter())
            .filter(|&(_, &(_, score))| score == best)
            .map(|(p, _)| p.username.clone())
            .collect();
        if winners.len() > 1 {
            let creator = self
                .players
                .iter()
                .find(|p| p.first_player)
                .map(|p| p.username.clone());
            if let Some(creator) = creator {
                winners.retain(|name| *name != creator);
            }
        }
        (scores, winners)
    }
}
