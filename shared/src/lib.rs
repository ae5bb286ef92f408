//! Shared types for the ticketing service
//!
//! Error types, domain models, request/response bodies and small
//! time helpers used by the server and its API clients.

pub mod error;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};
