//! Registration, login and token handling through the HTTP API

mod common;

use axum::body::Body;
use common::TestApp;
use http::{Method, Request, StatusCode, header};
use serde_json::json;
use shared::models::Role;
use ticket_server::auth::{JwtConfig, JwtService};

#[tokio::test]
async fn test_register_login_and_me() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({
                "name": "Attendee",
                "email": "  Attendee@Example.com ",
                "password": "correct-horse",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["message"], "User registered successfully");
    let id = body["id"].as_i64().unwrap();

    let (status, duplicate) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "name": "Again", "email": "attendee@example.com", "password": "another-pass" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(duplicate["code"], 5002);

    let (status, login) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "attendee@example.com", "password": "correct-horse" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{login}");
    assert_eq!(login["user"]["id"], id);
    assert_eq!(login["user"]["role"], "ATTENDEE");
    assert!(login["user"].get("password_hash").is_none());

    let token = login["token"].as_str().unwrap();
    let (status, me) = app.get("/api/auth/me", Some(token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], id);
    assert_eq!(me["email"], "attendee@example.com");
    assert_eq!(me["role"], "ATTENDEE");

    let (status, wrong_password) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "attendee@example.com", "password": "wrong-horse" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown_email) = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "nobody@example.com", "password": "wrong-horse" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new().await;

    let (status, _) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "name": "Root", "email": "root@example.com", "password": "long-enough", "role": "ADMIN" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "name": "Short", "email": "short@example.com", "password": "1234567" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "name": "Bad", "email": "not-an-email", "password": "long-enough" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post("/api/auth/register", None, json!({ "email": "x@example.com" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "name");

    let (status, _) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "name": "Typo", "email": "t@example.com", "password": "long-enough", "role": "SUPERUSER" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_a_json_400() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let (status, body) = app.send_request(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_token_required_and_checked() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    let request = Request::builder()
        .uri("/api/auth/me")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let (status, _) = app.send_request(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.get("/api/auth/me", Some("not.a.token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1004);

    // signed with a different secret
    let attendee = app.user("fan@example.com", Role::Attendee).await;
    let stored = ticket_server::db::repository::user::find_by_id(&app.state.pool, attendee.id)
        .await
        .unwrap()
        .unwrap();
    let foreign = JwtService::with_config(JwtConfig::ephemeral())
        .generate_token(&stored)
        .unwrap();
    let (status, _) = app.get("/api/auth/me", Some(&foreign)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, me) = app.get("/api/auth/me", Some(&attendee.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], attendee.id);
}

#[tokio::test]
async fn test_health_and_request_id() {
    let app = TestApp::new().await;

    let response = {
        use tower::ServiceExt;
        app.app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    };
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let (_, body) = app.get("/api/health", None).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
