//! Authentication and authorization
//!
//! - [`JwtService`] issues and validates session tokens
//! - [`require_auth`] attaches [`CurrentUser`] to protected requests
//! - [`require_role`] gates routes by role
//! - [`RateLimiter`] throttles login and registration per client IP

mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod rate_limit;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService, MIN_SECRET_LEN, generate_secret};
pub use middleware::{is_public_route, require_auth, require_role};
pub use password::{hash_password, verify_password};
pub use rate_limit::{RateLimiter, login_rate_limit, register_rate_limit};
