//! Event API

mod handler;

use axum::{Router, middleware, routing::get, routing::post, routing::put};
use shared::models::Role;

use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/events", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id));

    let manage_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::cancel))
        .layer(middleware::from_fn(require_role(&[
            Role::Organizer,
            Role::Admin,
        ])));

    read_routes.merge(manage_routes)
}
