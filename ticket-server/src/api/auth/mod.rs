//! Authentication Routes

mod handler;

use axum::{Router, middleware, routing::get, routing::post};

use crate::auth::{login_rate_limit, register_rate_limit};
use crate::core::ServerState;

/// - /api/auth/register, /api/auth/login: public, rate limited per IP
/// - /api/auth/me: authenticated by the global `require_auth` layer
pub fn router(state: &ServerState) -> Router<ServerState> {
    let register = Router::new()
        .route("/api/auth/register", post(handler::register))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            register_rate_limit,
        ));

    let login = Router::new()
        .route("/api/auth/login", post(handler::login))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            login_rate_limit,
        ));

    Router::new()
        .merge(register)
        .merge(login)
        .route("/api/auth/me", get(handler::me))
}
