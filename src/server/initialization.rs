// src/server/initialization.rs

//! Builds the shared server state and binds the listener.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::info;

use crate::config::Config;
use crate::core::state::ServerState;

use super::context::ServerContext;

pub async fn setup(config: Config) -> Result<ServerContext> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    info!("Listening on {addr}");

    let state = Arc::new(ServerState::new(Arc::new(config)));
    let (shutdown_tx, _) = broadcast::channel(1);

    Ok(ServerContext {
        state,
        listener,
        shutdown_tx,
    })
}
