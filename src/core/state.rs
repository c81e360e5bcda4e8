// src/core/state.rs

//! The central `ServerState`: the client registry, the session controller
//! mutex and the broadcast helpers built on top of the registry.

use std::net::SocketAddr;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, broadcast, mpsc};
// The tokio clock, so liveness timing can run under a paused clock in tests.
use tokio::time::Instant;
use tracing::debug;

use crate::config::Config;
use crate::core::controller::SessionController;
use crate::core::protocol::envelope::Response;

pub type OutboxSender = mpsc::UnboundedSender<Response>;
pub type ShutdownSender = broadcast::Sender<()>;
pub type ClientStateTuple = (Arc<Mutex<ClientInfo>>, OutboxSender, ShutdownSender);
pub type ClientMap = Arc<DashMap<u64, ClientStateTuple>>;

/// Connection liveness as seen by the heartbeat monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Connected,
    Suspected,
    Disconnected,
}

/// Per-connection bookkeeping.
#[derive(Debug)]
pub struct ClientInfo {
    pub addr: SocketAddr,
    pub session_id: u64,
    /// Set once the connection completes a login.
    pub username: Option<String>,
    pub liveness: Liveness,
    pub created: Instant,
    /// Last time the client answered a heartbeat (or sent anything at all).
    pub last_reply: Instant,
}

/// The central struct holding all shared, server-wide state. Wrapped in an
/// `Arc` and handed to every connection task.
#[derive(Debug)]
pub struct ServerState {
    /// All active connections, keyed by a unique session id. Each entry
    /// carries the client metadata, the outbound message channel and a
    /// shutdown sender for targeted termination.
    pub clients: ClientMap,
    pub config: Arc<Config>,
    /// The single serialization point for all session mutations: turns,
    /// liveness transitions and reconnection resync all lock here.
    pub controller: Mutex<SessionController>,
}

impl ServerState {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            clients: Arc::new(DashMap::new()),
            config: config.clone(),
            controller: Mutex::new(SessionController::new(config)),
        }
    }

    /// Sends a message to every logged-in connection.
    pub async fn broadcast(&self, response: &Response) {
        self.broadcast_filtered(response, |_| true).await;
    }

    /// Sends a message to every logged-in connection except `session_id`.
    pub async fn broadcast_except(&self, session_id: u64, response: &Response) {
        self.broadcast_filtered(response, |id| id != session_id)
            .await;
    }

    async fn broadcast_filtered(&self, response: &Response, keep: impl Fn(u64) -> bool) {
        let targets: Vec<ClientStateTuple> = self
            .clients
            .iter()
            .filter(|entry| keep(*entry.key()))
            .map(|entry| entry.value().clone())
            .collect();
        for (info, outbox, _) in targets {
            if info.lock().await.username.is_some() {
                let _ = outbox.send(response.clone());
            }
        }
    }

    /// Sends a message to the connection logged in under `username`, if any.
    pub async fn send_to(&self, username: &str, response: Response) {
        let targets: Vec<ClientStateTuple> = self
            .clients
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        for (info, outbox, _) in targets {
            if info.lock().await.username.as_deref() == Some(username) {
                let _ = outbox.send(response);
                return;
            }
        }
        debug!(player = %username, "No live connection for message");
    }

    /// Announces whose turn it is: `turn` to the player, `otherTurn` to the
    /// rest.
    pub async fn notify_turn(&self, current: &str) {
        let targets: Vec<ClientStateTuple> = self
            .clients
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        for (info, outbox, _) in targets {
            let info = info.lock().await;
            match info.username.as_deref() {
                Some(name) if name == current => {
                    let _ = outbox.send(Response::Turn);
                }
                Some(_) => {
                    let _ = outbox.send(Response::OtherTurn {
                        username: current.to_string(),
                    });
                }
                None => {}
            }
        }
    }
}
