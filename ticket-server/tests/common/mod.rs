//! Shared helpers: a fully initialized app on a temp-file database,
//! driven in-process with `oneshot`.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shared::models::Role;
use tempfile::TempDir;
use ticket_server::db::repository::user;
use ticket_server::{Config, ServerState, build_app};
use tower::ServiceExt;

/// 2030-01-01T00:00:00Z in milliseconds
pub const JAN_1_2030: i64 = 1_893_456_000_000;

pub struct TestApp {
    pub app: Router,
    pub state: ServerState,
    _dir: TempDir,
}

pub struct TestUser {
    pub id: i64,
    pub token: String,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("tickets.db");
        let config = Config::for_database(db_path.to_string_lossy());

        let state = ServerState::initialize(&config).await.unwrap();
        let app = build_app(&state).with_state(state.clone());

        Self {
            app,
            state,
            _dir: dir,
        }
    }

    /// Send a request, returning status and parsed JSON body (`Null` if empty)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, token, None).await
    }

    /// Insert a user directly and mint a token for it, skipping password
    /// hashing
    pub async fn user(&self, email: &str, role: Role) -> TestUser {
        let created = user::create(&self.state.pool, "Test User", email, "unused", role)
            .await
            .unwrap();
        let token = self
            .state
            .get_jwt_service()
            .generate_token(&created)
            .unwrap();
        TestUser {
            id: created.id,
            token,
        }
    }

    /// Create an event through the API and return its id
    pub async fn create_event(&self, token: &str, capacity: i64) -> i64 {
        let (status, body) = self
            .post(
                "/api/events",
                Some(token),
                json!({
                    "name": "Spring Concert",
                    "venue": "Main Hall",
                    "date_time": JAN_1_2030,
                    "category": "music",
                    "capacity": capacity
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap()
    }

    pub async fn book(&self, token: &str, event_id: i64, tickets: i64) -> (StatusCode, Value) {
        self.post(
            "/api/bookings",
            Some(token),
            json!({
                "event_id": event_id,
                "tickets_booked": tickets,
                "total_price": tickets as f64 * 25.0
            }),
        )
        .await
    }

    pub async fn available_seats(&self, event_id: i64) -> i64 {
        let (status, body) = self.get(&format!("/api/events/{event_id}"), None).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["available_seats"].as_i64().unwrap()
    }
}
