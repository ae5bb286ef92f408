//! Unified error codes for the ticketing service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Event errors
//! - 4xxx: Booking errors
//! - 5xxx: User errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Serialized as a bare `u16` so clients can branch on the number without
/// parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request (malformed body, query string, path)
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Too many login/registration attempts
    TooManyAttempts = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,
    /// Caller does not own the resource
    NotResourceOwner = 2004,

    // ==================== 3xxx: Event ====================
    /// Event not found
    EventNotFound = 3001,
    /// New capacity is below tickets already sold
    CapacityBelowSold = 3002,
    /// Patch carried no fields
    NoFieldsToUpdate = 3003,

    // ==================== 4xxx: Booking ====================
    /// Booking not found
    BookingNotFound = 4001,
    /// Not enough seats left for the request
    CapacityExceeded = 4002,
    /// Ticket count must be positive
    InvalidTicketCount = 4003,
    /// Total price must be a non-negative number
    InvalidTotalPrice = 4004,

    // ==================== 5xxx: User ====================
    /// Email already registered
    EmailAlreadyRegistered = 5002,
    /// Password too short
    PasswordTooShort = 5003,
    /// Password too long
    PasswordTooLong = 5004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Operation timeout
    TimeoutError = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Default human-readable message
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "All required fields must be provided",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "Authorization header missing or malformed",
            ErrorCode::InvalidCredentials => "Invalid credentials",
            ErrorCode::TokenExpired => "Invalid or expired token",
            ErrorCode::TokenInvalid => "Invalid or expired token",
            ErrorCode::TooManyAttempts => "Too many requests, try again later",

            // Permission
            ErrorCode::PermissionDenied => "Forbidden: insufficient privileges",
            ErrorCode::RoleRequired => "Forbidden: insufficient privileges",
            ErrorCode::NotResourceOwner => "Forbidden: not the owner of this resource",

            // Event
            ErrorCode::EventNotFound => "Event not found",
            ErrorCode::CapacityBelowSold => "Capacity cannot be lower than tickets already sold",
            ErrorCode::NoFieldsToUpdate => "No fields to update",

            // Booking
            ErrorCode::BookingNotFound => "Booking not found",
            ErrorCode::CapacityExceeded => "Not enough seats available",
            ErrorCode::InvalidTicketCount => "Tickets booked must be greater than 0",
            ErrorCode::InvalidTotalPrice => "Total price must be a non-negative number",

            // User
            ErrorCode::EmailAlreadyRegistered => "Email already registered",
            ErrorCode::PasswordTooShort => "Password is too short",
            ErrorCode::PasswordTooLong => "Password is too long",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TimeoutError => "Operation timed out",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::TooManyAttempts),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::RoleRequired),
            2004 => Ok(ErrorCode::NotResourceOwner),

            // Event
            3001 => Ok(ErrorCode::EventNotFound),
            3002 => Ok(ErrorCode::CapacityBelowSold),
            3003 => Ok(ErrorCode::NoFieldsToUpdate),

            // Booking
            4001 => Ok(ErrorCode::BookingNotFound),
            4002 => Ok(ErrorCode::CapacityExceeded),
            4003 => Ok(ErrorCode::InvalidTicketCount),
            4004 => Ok(ErrorCode::InvalidTotalPrice),

            // User
            5002 => Ok(ErrorCode::EmailAlreadyRegistered),
            5003 => Ok(ErrorCode::PasswordTooShort),
            5004 => Ok(ErrorCode::PasswordTooLong),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9004 => Ok(ErrorCode::TimeoutError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
