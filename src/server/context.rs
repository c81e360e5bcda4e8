// src/server/context.rs

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::core::state::ServerState;

/// Holds all the initialized state required to run the server's main loop.
pub struct ServerContext {
    pub state: Arc<ServerState>,
    pub listener: TcpListener,
    pub shutdown_tx: broadcast::Sender<()>,
}
