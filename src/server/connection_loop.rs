// src/server/connection_loop.rs

//! Contains the main server loop for accepting connections and handling
//! graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::{Mutex, broadcast, mpsc};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::connection::ConnectionHandler;
use crate::core::state::{ClientInfo, Liveness};

use super::context::ServerContext;

/// The main server loop that accepts connections and handles graceful
/// shutdown.
pub async fn run(ctx: ServerContext) {
    let mut session_id_counter: u64 = 0;
    let mut client_tasks = JoinSet::new();

    let mut sigint = signal(SignalKind::interrupt()).expect("Failed to create SIGINT stream");
    let mut sigterm = signal(SignalKind::terminate()).expect("Failed to create SIGTERM stream");

    loop {
        tokio::select! {
            biased;

            _ = sigint.recv() => {
                info!("SIGINT received, initiating graceful shutdown.");
                break;
            }
            _ = sigterm.recv() => {
                info!("SIGTERM received, initiating graceful shutdown.");
                break;
            }

            res = ctx.listener.accept() => {
                match res {
                    Ok((socket, addr)) => {
                        if ctx.state.clients.len() >= ctx.state.config.max_clients {
                            warn!("Rejecting connection from {addr}: max_clients reached");
                            drop(socket);
                            continue;
                        }
                        info!("Accepted new connection from: {}", addr);

                        session_id_counter = session_id_counter.wrapping_add(1);
                        let session_id = session_id_counter;
                        let state = ctx.state.clone();

                        let (conn_shutdown_tx, conn_shutdown_rx) = broadcast::channel(1);
                        let global_shutdown_rx = ctx.shutdown_tx.subscribe();
                        let (outbox_tx, outbox_rx) = mpsc::unbounded_channel();

                        let client_info = Arc::new(Mutex::new(ClientInfo {
                            addr,
                            session_id,
                            username: None,
                            liveness: Liveness::Connected,
                            created: Instant::now(),
                            last_reply: Instant::now(),
                        }));
                        state
                            .clients
                            .insert(session_id, (client_info, outbox_tx, conn_shutdown_tx));

                        client_tasks.spawn(async move {
                            let mut handler = ConnectionHandler::new(
                                socket,
                                addr,
                                state,
                                session_id,
                                conn_shutdown_rx,
                                global_shutdown_rx,
                                outbox_rx,
                            );
                            if let Err(e) = handler.run().await {
                                warn!("Connection from {} terminated unexpectedly: {}", addr, e);
                            }
                        });
                    }
                    Err(e) => {
                        error!("Failed to accept connection: {}", e);
                    }
                }
            },

            Some(res) = client_tasks.join_next() => {
                if let Err(e) = res {
                    if e.is_panic() {
                        error!("A client handler panicked: {e:?}");
                    }
                }
            },
        }
    }

    info!("Shutting down. Sending signal to all tasks.");
    if ctx.shutdown_tx.send(()).is_err() {
        warn!("No live connections to signal.");
    }

    if tokio::time::timeout(Duration::from_secs(10), async {
        while client_tasks.join_next().await.is_some() {}
    })
    .await
    .is_err()
    {
        warn!("Timed out waiting for client connections to close cleanly.");
        client_tasks.shutdown().await;
    }
    info!("Server shutdown complete.");
}
