//! Data models
//!
//! Shared between ticket-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod booking;
pub mod event;
pub mod serde_helpers;
pub mod user;

// Re-exports
pub use booking::*;
pub use event::*;
pub use user::*;
