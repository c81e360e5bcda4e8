// src/core/mod.rs

//! The central module containing the core logic and data structures of the
//! game server.

pub mod controller;
pub mod errors;
pub mod model;
pub mod protocol;
pub mod state;
pub mod tasks;

pub use controller::SessionController;
pub use errors::GameError;
pub use protocol::{Request, Response};
