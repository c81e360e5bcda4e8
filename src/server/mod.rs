// src/server/mod.rs

use anyhow::Result;

use crate::config::Config;

mod connection_loop;
mod context;
mod initialization;

/// The main server startup function, orchestrating all setup phases.
pub async fn run(config: Config) -> Result<()> {
    // 1. Initialize server state and the listener.
    let server_context = initialization::setup(config).await?;

    // 2. Start the main connection acceptance loop. This function will run
    //    until shutdown.
    connection_loop::run(server_context).await;

    Ok(())
}
