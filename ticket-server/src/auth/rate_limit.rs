//! Fixed-window rate limiting for login and registration routes

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::core::ServerState;
use crate::security_log;
use shared::error::{AppError, ErrorCode};

const WINDOW: Duration = Duration::from_secs(60);

/// Per-route entry count above which expired entries are pruned inline
const PRUNE_THRESHOLD: usize = 10_000;

struct IpEntry {
    count: u32,
    window_start: Instant,
}

#[derive(Clone)]
pub struct RateLimiter {
    /// route name -> (IP -> entry)
    inner: Arc<Mutex<HashMap<&'static str, HashMap<String, IpEntry>>>>,
    /// Requests allowed per IP per window; 0 disables limiting
    max_per_window: u32,
}

impl RateLimiter {
    pub fn new(max_per_window: u32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            max_per_window,
        }
    }

    /// Returns `true` if the request is allowed, `false` if rate-limited.
    pub async fn check(&self, route: &'static str, ip: &str) -> bool {
        if self.max_per_window == 0 {
            return true;
        }

        let mut map = self.inner.lock().await;
        let route_map = map.entry(route).or_default();
        let now = Instant::now();

        if route_map.len() >= PRUNE_THRESHOLD {
            route_map.retain(|_, entry| now.duration_since(entry.window_start) < WINDOW);
        }

        let entry = route_map.entry(ip.to_owned()).or_insert_with(|| IpEntry {
            count: 0,
            window_start: now,
        });

        if now.duration_since(entry.window_start) >= WINDOW {
            entry.count = 0;
            entry.window_start = now;
        }

        entry.count += 1;
        entry.count <= self.max_per_window
    }
}

/// Client IP: the peer address, or the first `X-Forwarded-For` entry when
/// proxy headers are trusted.
fn extract_ip(request: &Request, trust_forwarded: bool) -> String {
    if trust_forwarded
        && let Some(forwarded) = request.headers().get("x-forwarded-for")
        && let Ok(val) = forwarded.to_str()
        && let Some(first) = val.split(',').next()
    {
        let ip = first.trim();
        if !ip.is_empty() {
            return ip.to_owned();
        }
    }

    request
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}

async fn limit(
    route: &'static str,
    state: &ServerState,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = extract_ip(&request, state.config.trust_proxy_headers);
    if !state.rate_limiter.check(route, &ip).await {
        security_log!("WARN", "rate_limited", route = route, ip = ip);
        return Err(AppError::new(ErrorCode::TooManyAttempts));
    }
    Ok(next.run(request).await)
}

pub async fn login_rate_limit(
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    limit("login", &state, request, next).await
}

pub async fn register_rate_limit(
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    limit("register", &state, request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_per_route_and_ip() {
        let limiter = RateLimiter::new(2);
        assert!(limiter.check("login", "1.1.1.1").await);
        assert!(limiter.check("login", "1.1.1.1").await);
        assert!(!limiter.check("login", "1.1.1.1").await);

        // other IPs and routes have their own windows
        assert!(limiter.check("login", "2.2.2.2").await);
        assert!(limiter.check("register", "1.1.1.1").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_resets() {
        let limiter = RateLimiter::new(1);
        assert!(limiter.check("login", "ip").await);
        assert!(!limiter.check("login", "ip").await);

        tokio::time::advance(WINDOW).await;
        assert!(limiter.check("login", "ip").await);
    }

    fn request_from(peer: &str, forwarded: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/api/auth/login");
        if let Some(value) = forwarded {
            builder = builder.header("x-forwarded-for", value);
        }
        let mut request = builder.body(axum::body::Body::empty()).unwrap();
        let addr: std::net::SocketAddr = peer.parse().unwrap();
        request
            .extensions_mut()
            .insert(axum::extract::ConnectInfo(addr));
        request
    }

    #[test]
    fn test_forwarded_header_ignored_by_default() {
        let request = request_from("10.0.0.7:5123", Some("203.0.113.9"));
        assert_eq!(extract_ip(&request, false), "10.0.0.7");

        // rotating the header does not change the key
        let other = request_from("10.0.0.7:5124", Some("198.51.100.1"));
        assert_eq!(extract_ip(&other, false), "10.0.0.7");
    }

    #[test]
    fn test_forwarded_header_used_behind_trusted_proxy() {
        let request = request_from("10.0.0.7:5123", Some("203.0.113.9, 10.0.0.1"));
        assert_eq!(extract_ip(&request, true), "203.0.113.9");

        let without = request_from("10.0.0.7:5123", None);
        assert_eq!(extract_ip(&without, true), "10.0.0.7");
    }

    #[test]
    fn test_unknown_peer() {
        let request = axum::http::Request::builder()
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(extract_ip(&request, false), "unknown");
    }

    #[tokio::test]
    async fn test_zero_disables() {
        let limiter = RateLimiter::new(0);
        for _ in 0..100 {
            assert!(limiter.check("login", "ip").await);
        }
    }
}
