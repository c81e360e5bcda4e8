// src/core/controller.rs

//! The session controller: lobby formation, player registry, turn-by-turn
//! request validation and score finalization. This is the sole mutator of
//! session state; the server wraps exactly one instance in a
//! `tokio::sync::Mutex`, so every mutation here is serialized, including
//! heartbeat-driven disconnects and reconnection resynchronization.

use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::config::Config;
use crate::core::errors::GameError;
use crate::core::model::board::Coords;
use crate::core::model::game::{GameModel, GamePhase};
use crate::core::model::goals::PersonalGoal;
use crate::core::model::item::Item;
use crate::core::model::player::Player;
use crate::core::model::room::Room;
use crate::core::protocol::envelope::{BoardView, BookshelfView, CommonGoalView, ScoreEntry};

/// The common, non-personalized part of the session view.
#[derive(Debug, Clone)]
pub struct GameSnapshot {
    pub board: BoardView,
    pub bookshelves: Vec<BookshelfView>,
    pub common_goals: Vec<CommonGoalView>,
    pub top_scores: Vec<u32>,
    pub current_player: String,
}

/// Everything needed to announce a freshly started session.
#[derive(Debug, Clone)]
pub struct StartBundle {
    pub snapshot: GameSnapshot,
    /// Personal goal per player; each player only ever sees their own.
    pub personal_goals: Vec<(String, PersonalGoal)>,
}

/// The view resent to a reconnecting client.
#[derive(Debug, Clone)]
pub struct ResyncBundle {
    pub snapshot: GameSnapshot,
    pub personal_goal: PersonalGoal,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    Joined {
        room_id: u32,
        /// True for the room creator, who picks the capacity.
        choose_capacity: bool,
    },
    Reconnected(Box<ResyncBundle>),
}

/// Where the turn went after an accepted insert or a mid-turn disconnect.
#[derive(Debug, Clone)]
pub enum TurnAdvance {
    Next(String),
    Ended {
        scores: Vec<ScoreEntry>,
        winners: Vec<String>,
    },
}

/// The full fallout of an accepted insert.
#[derive(Debug, Clone)]
pub struct TurnReport {
    pub board: BoardView,
    pub bookshelves: Vec<BookshelfView>,
    pub points: Vec<ScoreEntry>,
    pub last_round_started: bool,
    pub advance: TurnAdvance,
}

/// The fallout of marking an identity disconnected.
#[derive(Debug, Clone)]
pub struct DisconnectReport {
    /// True when the identity held a seat in a running session; the seat and
    /// its score survive.
    pub was_seated: bool,
    /// Set when the disconnected player was the current one and the turn
    /// moved on (possibly ending the game).
    pub advance: Option<TurnAdvance>,
}

/// Orchestrates one room and its session.
#[derive(Debug)]
pub struct SessionController {
    config: Arc<Config>,
    room: Option<Room>,
    lobby: Vec<Player>,
    game: Option<GameModel>,
    /// Tiles picked but not yet placed by the current player.
    pending_pick: Vec<Item>,
    rng: SmallRng,
}

impl SessionController {
    pub fn new(config: Arc<Config>) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    /// Deterministic construction for tests.
    pub fn with_seed(config: Arc<Config>, seed: u64) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: Arc<Config>, rng: SmallRng) -> Self {
        Self {
            config,
            room: None,
            lobby: Vec::new(),
            game: None,
            pending_pick: Vec::new(),
            rng,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.game
            .as_ref()
            .map(|game| game.phase())
            .unwrap_or(GamePhase::Lobby)
    }

    pub fn game(&self) -> Option<&GameModel> {
        self.game.as_ref()
    }

    /// Mutable access to the running session, for staging specific setups.
    pub fn game_mut(&mut self) -> Option<&mut GameModel> {
        self.game.as_mut()
    }

    pub fn pending_pick(&self) -> &[Item] {
        &self.pending_pick
    }

    pub fn current_username(&self) -> Option<String> {
        self.game
            .as_ref()
            .map(|game| game.current_player().username.clone())
    }

    /// Handles a login. In the lobby it seats a new player; against a running
    /// session it either resynchronizes a disconnected seat or rejects the
    /// name.
    pub fn login(&mut self, username: &str) -> Result<LoginOutcome, GameError> {
        if username.is_empty() {
            return Err(GameError::ProtocolViolation("empty username".into()));
        }
        if let Some(game) = self.game.as_mut() {
            match game.player_mut(username) {
                Some(player) if !player.connected => {
                    player.connected = true;
                }
                Some(_) => return Err(GameError::UsernameTaken),
                None => return Err(GameError::GameAlreadyStarted),
            }
            info!(player = %username, "Player reconnected, resynchronizing");
            let bundle = self.resync(username)?;
            return Ok(LoginOutcome::Reconnected(Box::new(bundle)));
        }
        if self.lobby.iter().any(|p| p.username == username) {
            return Err(GameError::UsernameTaken);
        }
        let creator = self.room.is_none();
        let rng = &mut self.rng;
        let room = self.room.get_or_insert_with(|| Room::new(rng));
        room.add(username)?;
        let mut player = Player::new(username);
        player.first_player = creator;
        self.lobby.push(player);
        info!(player = %username, room = room.id(), "Player joined the lobby");
        Ok(LoginOutcome::Joined {
            room_id: room.id(),
            choose_capacity: creator,
        })
    }

    fn lobby_player_mut(&mut self, username: &str) -> Result<&mut Player, GameError> {
        if self.game.is_some() {
            return Err(GameError::InvalidState(
                "the game has already started".into(),
            ));
        }
        self.lobby
            .iter_mut()
            .find(|p| p.username == username)
            .ok_or_else(|| GameError::InvalidState("player is not in the lobby".into()))
    }

    pub fn set_age(&mut self, username: &str, age: u32) -> Result<(), GameError> {
        self.lobby_player_mut(username)?.age = age;
        Ok(())
    }

    pub fn set_first_game(&mut self, username: &str, first_game: bool) -> Result<(), GameError> {
        self.lobby_player_mut(username)?.first_game = first_game;
        Ok(())
    }

    /// Fixes the room capacity. Only the room creator may choose.
    pub fn set_capacity(&mut self, username: &str, capacity: usize) -> Result<(), GameError> {
        if !self.lobby_player_mut(username)?.first_player {
            return Err(GameError::InvalidState(
                "only the room creator chooses the capacity".into(),
            ));
        }
        let room = self
            .room
            .as_mut()
            .ok_or_else(|| GameError::InvalidState("no room to size".into()))?;
        room.set_capacity(capacity)
    }

    /// Marks a player ready; starts the session once the room is at capacity
    /// and every seated player is ready.
    pub fn mark_ready(&mut self, username: &str) -> Result<Option<StartBundle>, GameError> {
        self.lobby_player_mut(username)?.ready = true;
        self.try_start()
    }

    fn try_start(&mut self) -> Result<Option<StartBundle>, GameError> {
        let Some(room) = &self.room else {
            return Ok(None);
        };
        if !room.is_complete() || !self.lobby.iter().all(|p| p.ready) {
            return Ok(None);
        }
        let players = std::mem::take(&mut self.lobby);
        let rng = SmallRng::seed_from_u64(self.rng.r#gen());
        match GameModel::start(players, self.config.rules.clone(), rng) {
            Ok(game) => {
                // The room's job is done once the session exists.
                self.room = None;
                self.game = Some(game);
                let bundle = self.start_bundle()?;
                Ok(Some(bundle))
            }
            Err(err) => {
                // A failed start is an invariant violation; drop the lobby
                // rather than run a corrupt session.
                warn!(error = %err, "Session start aborted");
                self.room = None;
                Err(err)
            }
        }
    }

    fn snapshot(&self) -> Result<GameSnapshot, GameError> {
        let game = self
            .game
            .as_ref()
            .ok_or_else(|| GameError::InvalidState("no game in progress".into()))?;
        Ok(GameSnapshot {
            board: BoardView {
                grid: game.board().snapshot_grid(),
            },
            bookshelves: game
                .players()
                .iter()
                .map(|p| BookshelfView {
                    username: p.username.clone(),
                    grid: p.bookshelf.snapshot_grid(),
                })
                .collect(),
            common_goals: game
                .common_goals()
                .iter()
                .map(|goal| CommonGoalView {
                    layout: goal.layout().clone(),
                    top_score: goal.top_score().unwrap_or(0),
                })
                .collect(),
            top_scores: game.top_scores(),
            current_player: game.current_player().username.clone(),
        })
    }

    fn start_bundle(&self) -> Result<StartBundle, GameError> {
        let game = self
            .game
            .as_ref()
            .ok_or_else(|| GameError::InvalidState("no game in progress".into()))?;
        let personal_goals = game
            .players()
            .iter()
            .filter_map(|p| {
                p.personal_goal
                    .clone()
                    .map(|goal| (p.username.clone(), goal))
            })
            .collect();
        Ok(StartBundle {
            snapshot: self.snapshot()?,
            personal_goals,
        })
    }

    fn resync(&self, username: &str) -> Result<ResyncBundle, GameError> {
        let game = self
            .game
            .as_ref()
            .ok_or_else(|| GameError::InvalidState("no game in progress".into()))?;
        let personal_goal = game
            .player(username)
            .and_then(|p| p.personal_goal.clone())
            .ok_or_else(|| GameError::InvalidState("player holds no personal goal".into()))?;
        Ok(ResyncBundle {
            snapshot: self.snapshot()?,
            personal_goal,
        })
    }

    fn require_turn(&self, username: &str) -> Result<(), GameError> {
        let game = self
            .game
            .as_ref()
            .ok_or_else(|| GameError::InvalidState("no game in progress".into()))?;
        if game.phase() == GamePhase::Ended {
            return Err(GameError::InvalidState("the game has ended".into()));
        }
        if game.current_player().username != username {
            return Err(GameError::NotYourTurn);
        }
        Ok(())
    }

    /// Validates and executes a board pick for the current player. The picked
    /// tiles stay pending until they are inserted.
    pub fn pick(
        &mut self,
        username: &str,
        from: Coords,
        to: Coords,
    ) -> Result<Vec<Item>, GameError> {
        self.require_turn(username)?;
        if !self.pending_pick.is_empty() {
            return Err(GameError::InvalidState("a pick is already pending".into()));
        }
        let game = self
            .game
            .as_mut()
            .ok_or_else(|| GameError::InvalidState("no game in progress".into()))?;
        let items = game.pick(from, to)?;
        self.pending_pick = items.clone();
        Ok(items)
    }

    /// Reorders the pending pick. The order must be a permutation of the
    /// pick's indices; anything else leaves the pending tiles untouched.
    pub fn reorder(&mut self, username: &str, order: &[usize]) -> Result<(), GameError> {
        self.require_turn(username)?;
        if self.pending_pick.is_empty() {
            return Err(GameError::InvalidState("no pick to reorder".into()));
        }
        if order.len() != self.pending_pick.len() {
            return Err(GameError::InvalidReorder(
                "order length does not match the pick".into(),
            ));
        }
        let mut seen = vec![false; order.len()];
        for &index in order {
            if index >= order.len() || seen[index] {
                return Err(GameError::InvalidReorder(
                    "order is not a permutation".into(),
                ));
            }
            seen[index] = true;
        }
        self.pending_pick = order.iter().map(|&i| self.pending_pick[i]).collect();
        Ok(())
    }

    /// Inserts the pending pick into the current player's bookshelf, then
    /// advances the turn. Column and capacity failures leave the pending
    /// tiles in place so the client can retry.
    pub fn insert(&mut self, username: &str, column: usize) -> Result<TurnReport, GameError> {
        self.require_turn(username)?;
        if self.pending_pick.is_empty() {
            return Err(GameError::InvalidState("no pick to insert".into()));
        }
        let game = self
            .game
            .as_mut()
            .ok_or_else(|| GameError::InvalidState("no game in progress".into()))?;
        let was_last_round = game.phase() == GamePhase::LastRound;
        game.place(&self.pending_pick, column)?;
        self.pending_pick.clear();
        let last_round_started = !was_last_round && game.phase() == GamePhase::LastRound;
        let advance = Self::advance_model(game);
        Ok(TurnReport {
            board: BoardView {
                grid: game.board().snapshot_grid(),
            },
            bookshelves: game
                .players()
                .iter()
                .map(|p| BookshelfView {
                    username: p.username.clone(),
                    grid: p.bookshelf.snapshot_grid(),
                })
                .collect(),
            points: game
                .current_points()
                .into_iter()
                .map(|(username, score)| ScoreEntry { username, score })
                .collect(),
            last_round_started,
            advance,
        })
    }

    fn advance_model(game: &mut GameModel) -> TurnAdvance {
        match game.advance_turn() {
            GamePhase::Ended => {
                let (scores, winners) = game.final_standings();
                info!(?winners, "Game ended");
                TurnAdvance::Ended {
                    scores: scores
                        .into_iter()
                        .map(|(username, score)| ScoreEntry { username, score })
                        .collect(),
                    winners,
                }
            }
            _ => TurnAdvance::Next(game.current_player().username.clone()),
        }
    }

    /// Marks an identity disconnected. In the lobby the seat is simply
    /// vacated; in a running session the seat and score survive and the
    /// rotation skips it. A disconnect of the current player forfeits any
    /// pending pick (the tiles return to the pool) and passes the turn.
    pub fn mark_disconnected(&mut self, username: &str) -> DisconnectReport {
        if self.game.is_none() {
            let before = self.lobby.len();
            self.lobby.retain(|p| p.username != username);
            if self.lobby.len() != before {
                info!(player = %username, "Player left the lobby");
                if let Some(room) = &mut self.room {
                    room.remove(username);
                }
                if self.lobby.is_empty() {
                    self.room = None;
                } else if !self.lobby.iter().any(|p| p.first_player) {
                    // The creator left; the oldest remaining seat anchors
                    // the turn order from now on.
                    self.lobby[0].first_player = true;
                }
            }
            return DisconnectReport {
                was_seated: false,
                advance: None,
            };
        }

        let Some(game) = self.game.as_mut() else {
            return DisconnectReport {
                was_seated: false,
                advance: None,
            };
        };
        let Some(player) = game.player_mut(username) else {
            return DisconnectReport {
                was_seated: false,
                advance: None,
            };
        };
        if !player.connected {
            return DisconnectReport {
                was_seated: true,
                advance: None,
            };
        }
        player.connected = false;
        info!(player = %username, "Player disconnected, seat retained");

        let advance = if game.phase() != GamePhase::Ended
            && game.current_player().username == username
        {
            if !self.pending_pick.is_empty() {
                let pending = std::mem::take(&mut self.pending_pick);
                game.recycle_pick(pending);
            }
            Some(Self::advance_model(game))
        } else {
            None
        };
        DisconnectReport {
            was_seated: true,
            advance,
        }
    }
}
