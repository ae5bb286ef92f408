//! Authentication Handlers
//!
//! Registration, login and the current identity

use std::time::Duration;

use axum::{Json, extract::State, http::StatusCode};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{LoginRequest, LoginResponse, RegisterRequest, Role, UserInfo};
use shared::response::CreatedResponse;

use crate::auth::{CurrentUser, hash_password, verify_password};
use crate::core::ServerState;
use crate::db::repository::{RepoError, user};
use crate::security_log;
use crate::utils::ApiJson;
use crate::utils::validation::{
    MAX_NAME_LEN, normalize_email, require, validate_password, validate_required_text,
};

/// POST /api/auth/register
///
/// Role defaults to ATTENDEE; ADMIN accounts cannot be self-registered.
pub async fn register(
    State(state): State<ServerState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let name = require(req.name, "name")?;
    let email = require(req.email, "email")?;
    let password = require(req.password, "password")?;

    validate_required_text(&name, "name", MAX_NAME_LEN)?;
    let email = normalize_email(&email)?;
    validate_password(&password)?;

    let role = req.role.unwrap_or(Role::Attendee);
    if role == Role::Admin {
        security_log!("WARN", "admin_self_registration", email = email.clone());
        return Err(AppError::permission_denied(
            "ADMIN accounts cannot be self-registered",
        ));
    }

    if user::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::new(ErrorCode::EmailAlreadyRegistered));
    }

    let hash = hash_password(&password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

    let created = user::create(&state.pool, name.trim(), &email, &hash, role)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::new(ErrorCode::EmailAlreadyRegistered),
            other => other.into(),
        })?;

    tracing::info!(user_id = created.id, email = %email, role = %role, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new(created.id, "User registered successfully")),
    ))
}

/// POST /api/auth/login
///
/// Every attempt waits the configured fixed delay, and an unknown email
/// fails exactly like a wrong password.
pub async fn login(
    State(state): State<ServerState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let email = require(req.email, "email")?.trim().to_lowercase();
    let password = require(req.password, "password")?;

    let found = user::find_by_email(&state.pool, &email).await?;

    tokio::time::sleep(Duration::from_millis(state.config.login_delay_ms)).await;

    let account = match found {
        Some(u) if verify_password(&password, &u.password_hash) => u,
        Some(u) => {
            security_log!("WARN", "login_failed", user_id = u.id, reason = "invalid_password");
            return Err(AppError::invalid_credentials());
        }
        None => {
            security_log!("WARN", "login_failed", email = email, reason = "unknown_email");
            return Err(AppError::invalid_credentials());
        }
    };

    let token = state
        .get_jwt_service()
        .generate_token(&account)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(user_id = account.id, role = %account.role, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: UserInfo::from(&account),
    }))
}

/// GET /api/auth/me
pub async fn me(user: CurrentUser) -> Json<UserInfo> {
    Json(UserInfo {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
    })
}
