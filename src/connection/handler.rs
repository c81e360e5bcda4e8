// src/connection/handler.rs

//! Defines the `ConnectionHandler` which manages the full lifecycle of a
//! client connection: reading envelopes, routing requests through the
//! session controller, forwarding broadcasts, and seat cleanup on close.

use std::net::SocketAddr;
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

use crate::core::GameError;
use crate::core::controller::{LoginOutcome, StartBundle, TurnAdvance, TurnReport};
use crate::core::model::board::Coords;
use crate::core::protocol::envelope::{InsertRefusal, Request, Response};
use crate::core::protocol::EnvelopeCodec;
use crate::core::state::{Liveness, ServerState};
use crate::core::tasks::HeartbeatMonitor;

use super::guard::ConnectionGuard;
use super::session::SessionState;

/// Manages the full lifecycle of a client connection.
pub struct ConnectionHandler {
    framed: Framed<TcpStream, EnvelopeCodec>,
    addr: SocketAddr,
    state: Arc<ServerState>,
    session_id: u64,
    shutdown_rx: broadcast::Receiver<()>,
    global_shutdown_rx: broadcast::Receiver<()>,
    outbox_rx: mpsc::UnboundedReceiver<Response>,
    session: SessionState,
}

impl ConnectionHandler {
    pub fn new(
        socket: TcpStream,
        addr: SocketAddr,
        state: Arc<ServerState>,
        session_id: u64,
        shutdown_rx: broadcast::Receiver<()>,
        global_shutdown_rx: broadcast::Receiver<()>,
        outbox_rx: mpsc::UnboundedReceiver<Response>,
    ) -> Self {
        Self {
            framed: Framed::new(socket, EnvelopeCodec),
            addr,
            state,
            session_id,
            shutdown_rx,
            global_shutdown_rx,
            outbox_rx,
            session: SessionState::new(),
        }
    }

    /// The main event loop for the connection, handling incoming envelopes,
    /// outbound broadcasts and shutdown signals.
    pub async fn run(&mut self) -> Result<(), GameError> {
        let _guard = ConnectionGuard::new(self.state.clone(), self.session_id, self.addr);
        let monitor = tokio::spawn(
            HeartbeatMonitor::new(self.state.clone(), self.session_id)
                .run(self.shutdown_rx.resubscribe()),
        );

        'main_loop: loop {
            tokio::select! {
                // Prioritize shutdown signals over other events.
                biased;
                _ = self.global_shutdown_rx.recv() => {
                    info!("Connection handler for {} received global shutdown signal.", self.addr);
                    break 'main_loop;
                }
                _ = self.shutdown_rx.recv() => {
                    info!("Connection handler for {} received kill signal.", self.addr);
                    break 'main_loop;
                }
                Some(response) = self.outbox_rx.recv() => {
                    if self.framed.send(response).await.is_err() {
                        break 'main_loop;
                    }
                }
                result = self.framed.next() => {
                    match result {
                        Some(Ok(value)) => {
                            debug!("Session {}: received envelope: {}", self.session_id, value);
                            match serde_json::from_value::<Request>(value) {
                                Ok(request) => {
                                    if let Err(e) = self.process(request).await {
                                        warn!("Connection error for {}: {}", self.addr, e);
                                        break 'main_loop;
                                    }
                                }
                                Err(e) => {
                                    // Unknown or malformed category: log it and
                                    // keep the connection, per the protocol
                                    // contract.
                                    warn!("Session {}: protocol violation: {}", self.session_id, e);
                                    let reply = Response::Error { message: e.to_string() };
                                    if self.framed.send(reply).await.is_err() {
                                        break 'main_loop;
                                    }
                                }
                            }
                        }
                        Some(Err(e)) => {
                            if is_normal_disconnect(&e) {
                                debug!("Connection from {} closed by peer: {}", self.addr, e);
                            } else {
                                warn!("Connection error for {}: {}", self.addr, e);
                            }
                            break 'main_loop;
                        }
                        None => {
                            debug!("Connection from {} closed by peer.", self.addr);
                            break 'main_loop;
                        }
                    }
                }
            }
        }

        monitor.abort();
        self.handle_peer_close().await;
        Ok(())
    }

    /// Marks the seat disconnected when the socket closes under a live
    /// identity. Skipped when the heartbeat monitor already did the
    /// transition.
    async fn handle_peer_close(&mut self) {
        let Some(username) = self.session.username.clone() else {
            return;
        };
        let already_disconnected = match self.state.clients.get(&self.session_id) {
            Some(entry) => {
                let info = entry.value().0.clone();
                drop(entry);
                let mut info = info.lock().await;
                let was = info.liveness;
                info.liveness = Liveness::Disconnected;
                was == Liveness::Disconnected
            }
            None => false,
        };
        if already_disconnected {
            return;
        }
        let report = {
            let mut controller = self.state.controller.lock().await;
            controller.mark_disconnected(&username)
        };
        if report.was_seated {
            self.state
                .broadcast_except(
                    self.session_id,
                    &Response::Disconnected {
                        username: username.clone(),
                    },
                )
                .await;
        }
        match report.advance {
            Some(TurnAdvance::Next(next)) => self.state.notify_turn(&next).await,
            Some(TurnAdvance::Ended { scores, winners }) => {
                self.state
                    .broadcast_except(self.session_id, &Response::EndGame { winners, scores })
                    .await;
            }
            None => {}
        }
    }

    /// Routes one request. Returns an error only for transport failures;
    /// game-level rejections become retry responses.
    async fn process(&mut self, request: Request) -> Result<(), GameError> {
        debug!(
            "Session {}: received request: {}",
            self.session_id,
            request.category()
        );
        // Any traffic proves the client is alive, not just heartbeat
        // replies.
        self.touch_liveness().await;
        match request {
            Request::Username { username } => self.handle_login(username).await,
            Request::Age { age } => self.handle_age(age).await,
            Request::FirstGame { first_game } => self.handle_first_game(first_game).await,
            Request::NumPlayers { num } => self.handle_capacity(num).await,
            Request::Ready => self.handle_ready().await,
            Request::Pick {
                start_row,
                start_col,
                end_row,
                end_col,
            } => {
                self.handle_pick(
                    Coords::new(start_row, start_col),
                    Coords::new(end_row, end_col),
                )
                .await
            }
            Request::Sort { order } => self.handle_sort(order).await,
            Request::Insert { column } => self.handle_insert(column).await,
            Request::Ping => self.handle_ping().await,
        }
    }

    /// The username this connection is logged in under, or a protocol error.
    fn username(&self) -> Result<String, GameError> {
        self.session
            .username
            .clone()
            .ok_or_else(|| GameError::ProtocolViolation("request before login".into()))
    }

    async fn set_registered_username(&self, username: &str) {
        if let Some(entry) = self.state.clients.get(&self.session_id) {
            let info = entry.value().0.clone();
            drop(entry);
            let mut info = info.lock().await;
            info.username = Some(username.to_string());
            info.liveness = Liveness::Connected;
            info.last_reply = Instant::now();
        }
    }

    async fn handle_login(&mut self, username: String) -> Result<(), GameError> {
        let outcome = {
            let mut controller = self.state.controller.lock().await;
            controller.login(&username)
        };
        match outcome {
            Ok(LoginOutcome::Joined {
                choose_capacity, ..
            }) => {
                self.session.username = Some(username.clone());
                self.set_registered_username(&username).await;
                self.framed
                    .send(Response::Username {
                        username: username.clone(),
                    })
                    .await?;
                if choose_capacity {
                    // The room creator picks how many seats the game has.
                    self.framed.send(Response::ChooseCapacity).await?;
                } else {
                    self.framed.send(Response::WaitingRoom).await?;
                }
                info!("{username} logged in.");
            }
            Ok(LoginOutcome::Reconnected(bundle)) => {
                self.session.username = Some(username.clone());
                self.set_registered_username(&username).await;
                info!("{username} reconnected.");
                self.framed
                    .send(Response::Username {
                        username: username.clone(),
                    })
                    .await?;
                let snapshot = bundle.snapshot;
                self.framed
                    .send(Response::StartGame {
                        personal_goal: bundle.personal_goal,
                        common_goals: snapshot.common_goals,
                        bookshelves: snapshot.bookshelves,
                        board: snapshot.board,
                        top_scores: snapshot.top_scores,
                    })
                    .await?;
                if snapshot.current_player == username {
                    self.framed.send(Response::Turn).await?;
                } else {
                    self.framed
                        .send(Response::OtherTurn {
                            username: snapshot.current_player,
                        })
                        .await?;
                }
                self.state
                    .broadcast_except(self.session_id, &Response::Reconnected { username })
                    .await;
            }
            Err(GameError::UsernameTaken) => {
                info!("{username} requested login, but the username is already taken.");
                self.framed.send(Response::UsernameRetry).await?;
            }
            Err(GameError::RoomFull) => {
                self.framed.send(Response::RoomFull).await?;
            }
            Err(GameError::GameAlreadyStarted) => {
                self.framed.send(Response::GameAlreadyStarted).await?;
            }
            Err(e) => {
                self.framed
                    .send(Response::Error {
                        message: e.to_string(),
                    })
                    .await?;
            }
        }
        Ok(())
    }

    async fn handle_age(&mut self, age: u32) -> Result<(), GameError> {
        let username = match self.username() {
            Ok(username) => username,
            Err(e) => return self.send_error(e).await,
        };
        let result = {
            let mut controller = self.state.controller.lock().await;
            controller.set_age(&username, age)
        };
        if let Err(e) = result {
            return self.send_error(e).await;
        }
        Ok(())
    }

    async fn handle_first_game(&mut self, first_game: bool) -> Result<(), GameError> {
        let username = match self.username() {
            Ok(username) => username,
            Err(e) => return self.send_error(e).await,
        };
        let result = {
            let mut controller = self.state.controller.lock().await;
            controller.set_first_game(&username, first_game)
        };
        if let Err(e) = result {
            return self.send_error(e).await;
        }
        Ok(())
    }

    async fn handle_capacity(&mut self, num: usize) -> Result<(), GameError> {
        let username = match self.username() {
            Ok(username) => username,
            Err(e) => return self.send_error(e).await,
        };
        let result = {
            let mut controller = self.state.controller.lock().await;
            controller.set_capacity(&username, num)
        };
        match result {
            Ok(()) => self.framed.send(Response::WaitingRoom).await?,
            Err(_) => self.framed.send(Response::CapacityRetry).await?,
        }
        Ok(())
    }

    async fn handle_ready(&mut self) -> Result<(), GameError> {
        let username = match self.username() {
            Ok(username) => username,
            Err(e) => return self.send_error(e).await,
        };
        let outcome = {
            let mut controller = self.state.controller.lock().await;
            controller.mark_ready(&username)
        };
        match outcome {
            Ok(Some(bundle)) => {
                info!("Game started.");
                self.announce_start(bundle).await;
            }
            Ok(None) => {
                self.framed.send(Response::WaitingRoom).await?;
            }
            Err(e) => return self.send_error(e).await,
        }
        Ok(())
    }

    /// Fans the start-of-game view out to every seated player. Each client
    /// receives its own personal goal alongside the shared state.
    async fn announce_start(&self, bundle: StartBundle) {
        let snapshot = bundle.snapshot;
        for (username, personal_goal) in bundle.personal_goals {
            self.state
                .send_to(
                    &username,
                    Response::StartGame {
                        personal_goal,
                        common_goals: snapshot.common_goals.clone(),
                        bookshelves: snapshot.bookshelves.clone(),
                        board: snapshot.board.clone(),
                        top_scores: snapshot.top_scores.clone(),
                    },
                )
                .await;
        }
        self.state.notify_turn(&snapshot.current_player).await;
    }

    async fn handle_pick(&mut self, from: Coords, to: Coords) -> Result<(), GameError> {
        let username = match self.username() {
            Ok(username) => username,
            Err(e) => return self.send_error(e).await,
        };
        let result = {
            let mut controller = self.state.controller.lock().await;
            controller.pick(&username, from, to)
        };
        match result {
            Ok(items) => {
                self.framed.send(Response::Picked { items }).await?;
            }
            Err(e) => {
                debug!("Pick rejected for {username}: {e}");
                self.framed.send(Response::PickRetry).await?;
            }
        }
        Ok(())
    }

    async fn handle_sort(&mut self, order: Vec<usize>) -> Result<(), GameError> {
        let username = match self.username() {
            Ok(username) => username,
            Err(e) => return self.send_error(e).await,
        };
        let result = {
            let mut controller = self.state.controller.lock().await;
            controller.reorder(&username, &order)
        };
        if let Err(e) = result {
            debug!("Sort rejected for {username}: {e}");
            self.framed.send(Response::SortRetry).await?;
        }
        Ok(())
    }

    async fn handle_insert(&mut self, column: usize) -> Result<(), GameError> {
        let username = match self.username() {
            Ok(username) => username,
            Err(e) => return self.send_error(e).await,
        };
        let result = {
            let mut controller = self.state.controller.lock().await;
            controller.insert(&username, column)
        };
        match result {
            Ok(report) => self.announce_turn_result(report).await,
            Err(GameError::InvalidColumn(_)) => {
                self.framed
                    .send(Response::InsertRetry {
                        reason: InsertRefusal::NotValidNumber,
                    })
                    .await?;
            }
            Err(GameError::ColumnFull) => {
                self.framed
                    .send(Response::InsertRetry {
                        reason: InsertRefusal::NotEnoughFreeCells,
                    })
                    .await?;
            }
            Err(e) => {
                debug!("Insert rejected for {username}: {e}");
                self.framed
                    .send(Response::InsertRetry {
                        reason: InsertRefusal::NotYourTurn,
                    })
                    .await?;
            }
        }
        Ok(())
    }

    /// Broadcasts the post-turn update and either the next turn or the final
    /// scoreboard.
    async fn announce_turn_result(&self, report: TurnReport) {
        self.state
            .broadcast(&Response::Update {
                board: report.board,
                bookshelves: report.bookshelves,
                points: report.points,
            })
            .await;
        match report.advance {
            TurnAdvance::Next(next) => {
                self.state.notify_turn(&next).await;
            }
            TurnAdvance::Ended { scores, winners } => {
                self.state
                    .broadcast(&Response::EndGame { winners, scores })
                    .await;
            }
        }
    }

    /// Refreshes the liveness bookkeeping. A suspected client that answers
    /// again is promoted back to connected.
    async fn touch_liveness(&self) {
        if let Some(entry) = self.state.clients.get(&self.session_id) {
            let info = entry.value().0.clone();
            drop(entry);
            let mut info = info.lock().await;
            info.last_reply = Instant::now();
            if info.liveness == Liveness::Suspected {
                info.liveness = Liveness::Connected;
                info!(addr = %info.addr, "Client answered again, back to connected");
            }
        }
    }

    /// Answers a heartbeat reply; the bookkeeping already happened in
    /// `touch_liveness`.
    async fn handle_ping(&mut self) -> Result<(), GameError> {
        self.framed.send(Response::Pong).await?;
        Ok(())
    }

    /// Sends a generic error envelope back to the client.
    async fn send_error(&mut self, e: GameError) -> Result<(), GameError> {
        debug!(
            "Session {}: sending error response: {}",
            self.session_id, e
        );
        self.framed
            .send(Response::Error {
                message: e.to_string(),
            })
            .await?;
        Ok(())
    }
}

/// Helper function to check for non-critical disconnection errors.
fn is_normal_disconnect(e: &GameError) -> bool {
    matches!(e, GameError::Io(arc_err) if matches!(
        arc_err.kind(),
        std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::BrokenPipe
            | std::io::ErrorKind::UnexpectedEof
            | std::io::ErrorKind::ConnectionAborted
    ))
}
