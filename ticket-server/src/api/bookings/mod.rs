//! Booking API

mod handler;

use axum::{Router, middleware, routing::get, routing::post};
use shared::models::Role;

use crate::auth::require_role;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/bookings", routes())
}

fn routes() -> Router<ServerState> {
    let book_routes = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn(require_role(&[
            Role::Attendee,
            Role::Admin,
        ])));

    let report_routes = Router::new()
        .route("/event/{event_id}", get(handler::list_by_event))
        .layer(middleware::from_fn(require_role(&[
            Role::Organizer,
            Role::Admin,
        ])));

    // Ownership is checked in the handler
    let read_routes = Router::new().route("/{id}", get(handler::get_by_id));

    book_routes.merge(report_routes).merge(read_routes)
}
