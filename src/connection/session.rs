// src/connection/session.rs

//! Defines the state associated with a single client connection.

/// Holds the state specific to one connection's protocol progress.
#[derive(Debug, Default)]
pub struct SessionState {
    /// The identity this connection logged in under, once accepted.
    pub username: Option<String>,
}

impl SessionState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub fn is_logged_in(&self) -> bool {
        self.username.is_some()
    }
}
