//! Input validation helpers
//!
//! Text length limits and field checks shared by the handlers.
//! SQLite TEXT has no built-in length enforcement.

use shared::error::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Event and user names
pub const MAX_NAME_LEN: usize = 200;

/// Venue names
pub const MAX_VENUE_LEN: usize = 200;

/// Category labels
pub const MAX_CATEGORY_LEN: usize = 100;

/// Event descriptions
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;

/// Image paths / URLs
pub const MAX_URL_LEN: usize = 2048;

// ── Field helpers ───────────────────────────────────────────────────

/// Unwrap a field the request must carry
pub fn require<T>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| {
        AppError::with_message(ErrorCode::RequiredField, format!("{field} is required"))
            .with_detail("field", field)
    })
}

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("{field} must not be empty"),
        )
        .with_detail("field", field));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        )));
    }
    Ok(())
}

pub fn validate_capacity(capacity: i64) -> Result<(), AppError> {
    if capacity <= 0 {
        return Err(
            AppError::with_message(ErrorCode::ValueOutOfRange, "Capacity must be greater than 0")
                .with_detail("capacity", capacity),
        );
    }
    Ok(())
}

/// Trim and lower-case an email, rejecting anything that is not
/// `local@domain`
pub fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();
    validate_required_text(&email, "email", MAX_EMAIL_LEN)?;

    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !email.contains(char::is_whitespace)
        });
    if !valid {
        return Err(AppError::with_message(
            ErrorCode::InvalidFormat,
            "Email address is not valid",
        ));
    }
    Ok(email)
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(AppError::with_message(
            ErrorCode::PasswordTooShort,
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    if len > MAX_PASSWORD_LEN {
        return Err(AppError::with_message(
            ErrorCode::PasswordTooLong,
            format!("Password must be at most {MAX_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}
