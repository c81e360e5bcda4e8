// src/connection/guard.rs

//! Defines `ConnectionGuard`, an RAII guard for connection resource
//! management.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::debug;

use crate::core::state::ServerState;

/// An RAII guard to ensure connection resources are always cleaned up when a
/// connection handler's scope is exited, however it exits.
pub struct ConnectionGuard {
    pub(crate) state: Arc<ServerState>,
    pub(crate) session_id: u64,
    pub(crate) addr: SocketAddr,
}

impl ConnectionGuard {
    pub(crate) fn new(state: Arc<ServerState>, session_id: u64, addr: SocketAddr) -> Self {
        Self {
            state,
            session_id,
            addr,
        }
    }
}

impl Drop for ConnectionGuard {
    /// Removes the client from the central registry. Seat-level disconnect
    /// handling happens in the handler before this runs; the guard only
    /// guarantees the registry entry cannot leak.
    fn drop(&mut self) {
        debug!(
            "ConnectionGuard dropping, cleaning up resources for connection {}",
            self.addr
        );
        if self.state.clients.remove(&self.session_id).is_none() {
            debug!(
                "Client {} was not in the registry upon cleanup.",
                self.addr
            );
        }
    }
}
