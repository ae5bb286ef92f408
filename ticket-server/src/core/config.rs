use std::str::FromStr;

use crate::auth::{JwtConfig, MIN_SECRET_LEN, generate_secret};
use crate::core::{Result, ServerError};

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | DATABASE_PATH | data/tickets.db | SQLite file |
/// | HTTP_PORT | 5000 | HTTP port |
/// | ENVIRONMENT | development | development / staging / production |
/// | JWT_SECRET | generated in development | HS256 secret |
/// | JWT_EXPIRATION_MINUTES | 120 | token lifetime |
/// | JWT_ISSUER | ticket-server | `iss` claim |
/// | JWT_AUDIENCE | ticket-clients | `aud` claim |
/// | DB_MAX_CONNECTIONS | 5 | pool size |
/// | REQUEST_TIMEOUT_MS | 30000 | per-request timeout |
/// | LOG_LEVEL | info | tracing level |
/// | LOG_DIR | - | daily log file directory |
/// | LOG_JSON | false | JSON log lines |
/// | ADMIN_EMAIL / ADMIN_PASSWORD / ADMIN_NAME | - | admin bootstrap |
/// | LOGIN_DELAY_MS | 500 | fixed delay per login attempt |
/// | AUTH_RATE_LIMIT_PER_MINUTE | 20 | login/register requests per IP |
///
/// ```ignore
/// DATABASE_PATH=/srv/tickets.db HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    pub jwt: JwtConfig,
    pub db_max_connections: u32,
    pub request_timeout_ms: u64,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub log_json: bool,
    pub admin: Option<AdminBootstrap>,
    /// No usable JWT_SECRET was configured; tokens die with the process
    pub jwt_secret_generated: bool,
    pub login_delay_ms: u64,
    pub auth_rate_limit_per_minute: u32,
    /// Key the rate limiter on `X-Forwarded-For`; only behind a trusted proxy
    pub trust_proxy_headers: bool,
}

/// Credentials of the ADMIN account created at startup
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
    pub name: String,
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Use the configured secret, or generate one in development only.
///
/// The flag is `true` when the secret was generated.
fn resolve_jwt_secret(configured: Option<String>, environment: &str) -> Result<(String, bool)> {
    match configured {
        Some(secret) if secret.len() >= MIN_SECRET_LEN => Ok((secret, false)),
        _ if environment == "development" => Ok((generate_secret(), true)),
        Some(_) => Err(ServerError::Config(format!(
            "JWT_SECRET must be at least {MIN_SECRET_LEN} characters in {environment} environment"
        ))),
        None => Err(ServerError::Config(format!(
            "JWT_SECRET must be set in {environment} environment"
        ))),
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let (secret, jwt_secret_generated) =
            resolve_jwt_secret(env_non_empty("JWT_SECRET"), &environment)?;
        let jwt = JwtConfig {
            secret,
            expiration_minutes: env_or("JWT_EXPIRATION_MINUTES", 120),
            issuer: env_non_empty("JWT_ISSUER").unwrap_or_else(|| "ticket-server".into()),
            audience: env_non_empty("JWT_AUDIENCE").unwrap_or_else(|| "ticket-clients".into()),
        };

        let admin = match (env_non_empty("ADMIN_EMAIL"), env_non_empty("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminBootstrap {
                email,
                password,
                name: env_non_empty("ADMIN_NAME").unwrap_or_else(|| "Administrator".into()),
            }),
            _ => None,
        };

        Ok(Self {
            database_path: env_non_empty("DATABASE_PATH").unwrap_or_else(|| "data/tickets.db".into()),
            http_port: env_or("HTTP_PORT", 5000),
            environment,
            jwt,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 5),
            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", 30_000),
            log_level: env_non_empty("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: env_non_empty("LOG_DIR"),
            log_json: env_or("LOG_JSON", false),
            admin,
            jwt_secret_generated,
            login_delay_ms: env_or("LOGIN_DELAY_MS", 500),
            auth_rate_limit_per_minute: env_or("AUTH_RATE_LIMIT_PER_MINUTE", 20),
            trust_proxy_headers: env_or("TRUST_PROXY_HEADERS", false),
        })
    }

    /// Development defaults with a throwaway database path; used by tests
    pub fn for_database(database_path: impl Into<String>) -> Self {
        Self {
            database_path: database_path.into(),
            http_port: 0,
            environment: "development".into(),
            jwt: JwtConfig::ephemeral(),
            db_max_connections: 5,
            request_timeout_ms: 30_000,
            log_level: "info".into(),
            log_dir: None,
            log_json: false,
            admin: None,
            jwt_secret_generated: true,
            login_delay_ms: 0,
            auth_rate_limit_per_minute: 0,
            trust_proxy_headers: false,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
