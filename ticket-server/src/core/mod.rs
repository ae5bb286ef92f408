//! Core: configuration, shared state, server bootstrap and startup errors
//!
//! - [`Config`] - settings loaded from the environment
//! - [`ServerState`] - state shared by every request
//! - [`Server`] - HTTP server
//! - [`ServerError`] - startup / serve failures

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::{AdminBootstrap, Config};
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
