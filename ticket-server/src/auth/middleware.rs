//! Authentication middleware
//!
//! Axum middleware for JWT authentication and role checks

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::Method;

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use shared::error::{AppError, ErrorCode};
use shared::models::Role;

/// Routes reachable without a token
///
/// Everything else under `/api/` requires `Authorization: Bearer <token>`.
pub fn is_public_route(method: &Method, path: &str) -> bool {
    let path = path.trim_end_matches('/');
    match path {
        "/api/health" => true,
        "/api/auth/login" | "/api/auth/register" => method == Method::POST,
        "/api/events" => method == Method::GET,
        _ => {
            // GET /api/events/{id}
            method == Method::GET
                && path
                    .strip_prefix("/api/events/")
                    .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
        }
    }
}

/// Authentication middleware
///
/// Extracts and validates the JWT from `Authorization: Bearer <token>` and
/// inserts [`CurrentUser`] into the request extensions.
///
/// Skipped for:
/// - `OPTIONS *` (CORS preflight)
/// - non-`/api/` paths
/// - routes listed by [`is_public_route`]
///
/// | Failure | Response |
/// |---------|----------|
/// | header missing or not `Bearer` | 401 NotAuthenticated |
/// | token expired | 401 TokenExpired |
/// | token invalid | 401 TokenInvalid |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == Method::OPTIONS || !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if is_public_route(req.method(), path) {
        return Ok(next.run(req).await);
    }

    let user = authenticate(&state, req.headers(), req.uri())?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Validate the bearer token in `headers`
pub(crate) fn authenticate(
    state: &ServerState,
    headers: &http::HeaderMap,
    uri: &http::Uri,
) -> Result<CurrentUser, AppError> {
    let token = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(JwtService::extract_from_header);

    let Some(token) = token else {
        security_log!("WARN", "auth_missing", uri = uri.to_string());
        return Err(AppError::not_authenticated());
    };

    let claims = state.get_jwt_service().validate_token(token).map_err(|e| {
        security_log!(
            "WARN",
            "auth_failed",
            error = e.to_string(),
            uri = uri.to_string()
        );
        match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            _ => AppError::invalid_token(),
        }
    })?;

    CurrentUser::try_from(claims).map_err(|e| {
        security_log!("WARN", "auth_failed", error = e.to_string(), uri = uri.to_string());
        AppError::invalid_token()
    })
}

/// Role check middleware, requires one of `roles`
///
/// Must run after [`require_auth`].
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/", post(handler::create))
///     .layer(middleware::from_fn(require_role(&[Role::Organizer, Role::Admin])));
/// ```
pub fn require_role(
    roles: &'static [Role],
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let user = req
                .extensions()
                .get::<CurrentUser>()
                .ok_or_else(AppError::not_authenticated)?;

            if !user.has_any_role(roles) {
                security_log!(
                    "WARN",
                    "role_required",
                    user_id = user.id,
                    user_role = user.role.as_str(),
                    required = format!("{:?}", roles)
                );
                return Err(AppError::new(ErrorCode::RoleRequired));
            }

            Ok(next.run(req).await)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_routes() {
        assert!(is_public_route(&Method::GET, "/api/health"));
        assert!(is_public_route(&Method::POST, "/api/auth/login"));
        assert!(is_public_route(&Method::POST, "/api/auth/register"));
        assert!(is_public_route(&Method::GET, "/api/events"));
        assert!(is_public_route(&Method::GET, "/api/events/"));
        assert!(is_public_route(&Method::GET, "/api/events/12"));
    }

    #[test]
    fn test_protected_routes() {
        assert!(!is_public_route(&Method::GET, "/api/auth/me"));
        assert!(!is_public_route(&Method::POST, "/api/events"));
        assert!(!is_public_route(&Method::PUT, "/api/events/12"));
        assert!(!is_public_route(&Method::DELETE, "/api/events/12"));
        assert!(!is_public_route(&Method::GET, "/api/events/12/extra"));
        assert!(!is_public_route(&Method::POST, "/api/bookings"));
        assert!(!is_public_route(&Method::GET, "/api/bookings/3"));
        assert!(!is_public_route(&Method::GET, "/api/bookings/event/3"));
    }
}
