//! Ticket Server - event ticketing HTTP/JSON service
//!
//! Organizers publish events with a fixed seat capacity, attendees book
//! tickets, and the server guarantees an event is never oversold, even
//! under concurrent bookings.
//!
//! # Module layout
//!
//! ```text
//! ticket-server/src/
//! ├── core/          # config, state, server bootstrap
//! ├── auth/          # JWT, password hashing, guards, rate limiting
//! ├── services/      # seat accounting (per-event locks)
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # SQLite pool, migrations, repositories
//! └── utils/         # logging, validation, extractors
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

pub use api::build_app;
pub use auth::{CurrentUser, JwtService};
pub use crate::core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

pub use utils::logger::{init_logger, init_logger_with_file};

/// Security event on the `security` tracing target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
