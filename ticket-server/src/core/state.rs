use std::sync::Arc;

use shared::error::AppError;
use shared::models::Role;
use sqlx::SqlitePool;

use crate::auth::{JwtService, RateLimiter, hash_password};
use crate::core::{Config, Result};
use crate::db::DbService;
use crate::db::repository::user;
use crate::services::CapacityService;
use crate::utils::validation::{normalize_email, validate_password};

/// Server state, shared by every request
///
/// Cheap to clone: every field is a pool handle or an `Arc`.
///
/// | Field | Type | Meaning |
/// |-------|------|---------|
/// | config | Arc<Config> | immutable settings |
/// | pool | SqlitePool | database connections |
/// | jwt_service | Arc<JwtService> | token issue / validation |
/// | capacity | CapacityService | per-event locks and seat-checked writes |
/// | rate_limiter | RateLimiter | login / register throttling |
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
    pub capacity: CapacityService,
    pub rate_limiter: RateLimiter,
}

impl ServerState {
    /// Open the database, apply migrations and create the bootstrap admin
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::new(&config.database_path, config.db_max_connections).await?;
        let state = Self::with_pool(config.clone(), db.pool);
        state.bootstrap_admin().await?;
        Ok(state)
    }

    /// Build state around an already-migrated pool
    pub fn with_pool(config: Config, pool: SqlitePool) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let rate_limiter = RateLimiter::new(config.auth_rate_limit_per_minute);
        Self {
            capacity: CapacityService::new(pool.clone()),
            config: Arc::new(config),
            pool,
            jwt_service,
            rate_limiter,
        }
    }

    pub fn get_jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    /// Create the configured ADMIN account if its email is still free
    async fn bootstrap_admin(&self) -> Result<()> {
        let Some(admin) = &self.config.admin else {
            return Ok(());
        };

        let email = normalize_email(&admin.email)?;
        validate_password(&admin.password)?;

        if let Some(existing) = user::find_by_email(&self.pool, &email)
            .await
            .map_err(AppError::from)?
        {
            if existing.role != Role::Admin {
                tracing::warn!(
                    email = %email,
                    role = %existing.role,
                    "ADMIN_EMAIL belongs to a non-admin user, bootstrap skipped"
                );
            }
            return Ok(());
        }

        let hash = hash_password(&admin.password)
            .map_err(|e| AppError::internal(format!("Failed to hash admin password: {e}")))?;
        let created = user::create(&self.pool, &admin.name, &email, &hash, Role::Admin)
            .await
            .map_err(AppError::from)?;

        tracing::info!(user_id = created.id, email = %email, "Bootstrap admin created");
        Ok(())
    }
}
