//! HTTP API
//!
//! - [`health`] - liveness
//! - [`auth`] - registration, login, current identity
//! - [`events`] - event catalogue and lifecycle
//! - [`bookings`] - ticket purchases and booking queries

pub mod auth;
pub mod bookings;
pub mod events;
pub mod health;

use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use axum::{BoxError, Router};
use http::{HeaderName, HeaderValue};
use shared::error::{AppError, ErrorCode};
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower::timeout::error::Elapsed;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::require_auth;
use crate::core::ServerState;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request bodies larger than this are refused
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// uuid v4 request id generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// All routes, without the cross-cutting middleware
pub fn build_router(state: &ServerState) -> Router<ServerState> {
    Router::new()
        // Public
        .merge(health::router())
        // Login / register public, /me authenticated
        .merge(auth::router(state))
        // Reads public, writes ORGANIZER / ADMIN
        .merge(events::router())
        // Authenticated
        .merge(bookings::router())
}

/// Fully configured application; used by the HTTP server and by tests
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    let app = build_router(state)
        // ========== Application Middleware ==========
        // JWT authentication, injects CurrentUser
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    with_timeout(app, Duration::from_millis(state.config.request_timeout_ms))
        // ========== Tower HTTP Middleware ==========
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .layer(TraceLayer::new_for_http())
        // outermost, so the trace span and the response both see the id
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
}

/// Abort requests running longer than `timeout` with a JSON TimeoutError
fn with_timeout<S>(router: Router<S>, timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_timeout))
            .layer(TimeoutLayer::new(timeout)),
    )
}

async fn handle_timeout(err: BoxError) -> AppError {
    if err.is::<Elapsed>() {
        tracing::warn!("Request timed out");
        AppError::new(ErrorCode::TimeoutError)
    } else {
        AppError::internal(format!("Unhandled middleware error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::routing::get;
    use http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn slow() -> &'static str {
        tokio::time::sleep(Duration::from_secs(5)).await;
        "done"
    }

    async fn fast() -> &'static str {
        "done"
    }

    fn app() -> Router {
        with_timeout(
            Router::new()
                .route("/slow", get(slow))
                .route("/fast", get(fast)),
            Duration::from_millis(10),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_returns_json_error() {
        let request = Request::builder().uri("/slow").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], 9004);
        assert_eq!(body["error"], "Operation timed out");
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_request_passes() {
        let request = Request::builder().uri("/fast").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
