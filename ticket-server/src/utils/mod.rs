//! Utilities: logging setup, input validation and error-shaped extractors

pub mod extract;
pub mod logger;
pub mod validation;

pub use extract::{ApiJson, ApiPath, ApiQuery};
pub use shared::error::{AppError, AppResult, ErrorCategory, ErrorCode};
