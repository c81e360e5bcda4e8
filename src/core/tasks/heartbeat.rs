// src/core/tasks/heartbeat.rs

//! The per-connection heartbeat monitor.
//!
//! Sends a ping envelope on a fixed interval and watches the time since the
//! client's last reply: one silent window marks the identity suspected, a
//! second marks it disconnected. Disconnection retains the seat in the
//! session (rotation skips it) and tears the connection down.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::core::controller::TurnAdvance;
use crate::core::protocol::envelope::Response;
use crate::core::state::{Liveness, ServerState, ShutdownSender};

pub struct HeartbeatMonitor {
    state: Arc<ServerState>,
    session_id: u64,
}

impl HeartbeatMonitor {
    pub fn new(state: Arc<ServerState>, session_id: u64) -> Self {
        Self { state, session_id }
    }

    /// Runs until the connection disappears, a shutdown is signalled, or the
    /// liveness ladder bottoms out. The session lock is only taken for the
    /// final disconnect transition, never while sleeping.
    pub async fn run(self, mut shutdown_rx: broadcast::Receiver<()>) {
        let (interval_period, window) = {
            let liveness = &self.state.config.liveness;
            (liveness.heartbeat_interval, liveness.reply_window)
        };
        let mut interval = tokio::time::interval(interval_period);
        // The first tick fires immediately; skip it so `last_reply` has a
        // chance to move before the first check.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let Some(entry) = self.state.clients.get(&self.session_id) else {
                        debug!(session_id = self.session_id, "Connection gone, heartbeat monitor exiting");
                        return;
                    };
                    let (info_arc, outbox, conn_shutdown) = entry.value().clone();
                    drop(entry);

                    let mut info = info_arc.lock().await;
                    let elapsed = info.last_reply.elapsed();
                    match info.liveness {
                        Liveness::Connected if elapsed > window => {
                            info.liveness = Liveness::Suspected;
                            warn!(addr = %info.addr, "Client silent for a full window, now suspected");
                        }
                        Liveness::Suspected if elapsed > window * 2 => {
                            info.liveness = Liveness::Disconnected;
                            let username = info.username.clone();
                            let addr = info.addr;
                            drop(info);
                            warn!(%addr, "Client silent for two windows, disconnecting");
                            self.finalize_disconnect(username, conn_shutdown).await;
                            return;
                        }
                        _ => {}
                    }
                    let _ = outbox.send(Response::Ping);
                }
                _ = shutdown_rx.recv() => {
                    debug!(session_id = self.session_id, "Heartbeat monitor shutting down");
                    return;
                }
            }
        }
    }

    /// Routes the disconnect through the controller mutex (the same
    /// serialization point as turn processing), fans out the notifications
    /// and kills the connection task.
    async fn finalize_disconnect(&self, username: Option<String>, conn_shutdown: ShutdownSender) {
        if let Some(username) = username {
            let report = {
                let mut controller = self.state.controller.lock().await;
                controller.mark_disconnected(&username)
            };
            if report.was_seated {
                self.state
                    .broadcast(&Response::Disconnected {
                        username: username.clone(),
                    })
                    .await;
            }
            match report.advance {
                Some(TurnAdvance::Next(next)) => {
                    self.state.notify_turn(&next).await;
                }
                Some(TurnAdvance::Ended { scores, winners }) => {
                    info!("Game ended after a disconnect");
                    self.state
                        .broadcast(&Response::EndGame { winners, scores })
                        .await;
                }
                None => {}
            }
        }
        let _ = conn_shutdown.send(());
    }
}
