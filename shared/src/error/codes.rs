//! Unified error codes for the canteen backend
//!
//! This module defines all error codes used across the server and clients.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Order errors
//! - 5xxx: Payment errors
//! - 6xxx: Catalog errors
//! - 8xxx: User errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Role not found
    RoleNotFound = 2002,
    /// Role name already exists
    RoleNameExists = 2003,
    /// Cannot modify a system role
    RoleIsSystem = 2004,
    /// Role is still assigned to users
    RoleInUse = 2005,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no line items
    OrderEmpty = 4002,
    /// Order has already been completed
    OrderAlreadyCompleted = 4003,
    /// Order has already been cancelled
    OrderAlreadyCancelled = 4004,

    // ==================== 5xxx: Payment ====================
    /// Payment not found
    PaymentNotFound = 5001,
    /// Invalid payment method
    PaymentInvalidMethod = 5002,
    /// Payment has already been settled
    PaymentAlreadyPaid = 5003,

    // ==================== 6xxx: Catalog ====================
    /// Food item not found
    FoodItemNotFound = 6001,
    /// Category not found
    CategoryNotFound = 6101,
    /// Category still has active food items
    CategoryHasItems = 6102,
    /// Category name already exists
    CategoryNameExists = 6103,
    /// Menu not found
    MenuNotFound = 6201,
    /// Menu name already exists
    MenuNameExists = 6202,
    /// Ordering timeframe not found
    TimeframeNotFound = 6301,
    /// Timeframe window values out of range
    TimeframeInvalidWindow = 6302,

    // ==================== 8xxx: User ====================
    /// User not found
    UserNotFound = 8001,
    /// Username already exists
    UsernameExists = 8002,
    /// Cannot modify a system user
    UserIsSystem = 8003,
    /// User still has pending orders or payments
    UserHasPendingOrders = 8004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Pickup token counter failure
    CounterError = 9003,
    /// Configuration error
    ConfigError = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Whether this code represents success
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Get the default message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",

            Self::NotAuthenticated => "Authentication required",
            Self::InvalidCredentials => "Invalid username or password",
            Self::TokenExpired => "Token expired",
            Self::TokenInvalid => "Invalid token",
            Self::AccountDisabled => "Account has been disabled",

            Self::PermissionDenied => "Permission denied",
            Self::RoleNotFound => "Role not found",
            Self::RoleNameExists => "Role name already exists",
            Self::RoleIsSystem => "Cannot modify system role",
            Self::RoleInUse => "Role is still assigned to users",

            Self::OrderNotFound => "Order not found",
            Self::OrderEmpty => "Order has no line items",
            Self::OrderAlreadyCompleted => "Order has already been completed",
            Self::OrderAlreadyCancelled => "Order has already been cancelled",

            Self::PaymentNotFound => "Payment not found",
            Self::PaymentInvalidMethod => "Invalid payment method",
            Self::PaymentAlreadyPaid => "Payment has already been settled",

            Self::FoodItemNotFound => "Food item not found",
            Self::CategoryNotFound => "Category not found",
            Self::CategoryHasItems => "Category still has active food items",
            Self::CategoryNameExists => "Category name already exists",
            Self::MenuNotFound => "Menu not found",
            Self::MenuNameExists => "Menu name already exists",
            Self::TimeframeNotFound => "Ordering timeframe not found",
            Self::TimeframeInvalidWindow => "Timeframe window values out of range",

            Self::UserNotFound => "User not found",
            Self::UsernameExists => "Username already exists",
            Self::UserIsSystem => "Cannot modify system user",
            Self::UserHasPendingOrders => "User still has pending orders or payments",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::CounterError => "Pickup token counter failure",
            Self::ConfigError => "Configuration error",
        }
    }

    /// Get the HTTP status code for this error code
    pub fn http_status(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            Self::Success => StatusCode::OK,

            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::OrderEmpty
            | Self::PaymentInvalidMethod
            | Self::TimeframeInvalidWindow => StatusCode::BAD_REQUEST,

            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,

            Self::PermissionDenied
            | Self::AccountDisabled
            | Self::RoleIsSystem
            | Self::UserIsSystem => StatusCode::FORBIDDEN,

            Self::NotFound
            | Self::RoleNotFound
            | Self::OrderNotFound
            | Self::PaymentNotFound
            | Self::FoodItemNotFound
            | Self::CategoryNotFound
            | Self::MenuNotFound
            | Self::TimeframeNotFound
            | Self::UserNotFound => StatusCode::NOT_FOUND,

            Self::AlreadyExists
            | Self::RoleNameExists
            | Self::RoleInUse
            | Self::OrderAlreadyCompleted
            | Self::OrderAlreadyCancelled
            | Self::PaymentAlreadyPaid
            | Self::CategoryHasItems
            | Self::CategoryNameExists
            | Self::MenuNameExists
            | Self::UsernameExists
            | Self::UserHasPendingOrders => StatusCode::CONFLICT,

            Self::Unknown
            | Self::InternalError
            | Self::DatabaseError
            | Self::CounterError
            | Self::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
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
            0 => Ok(Self::Success),
            1 => Ok(Self::Unknown),
            2 => Ok(Self::ValidationFailed),
            3 => Ok(Self::NotFound),
            4 => Ok(Self::AlreadyExists),
            5 => Ok(Self::InvalidRequest),

            1001 => Ok(Self::NotAuthenticated),
            1002 => Ok(Self::InvalidCredentials),
            1003 => Ok(Self::TokenExpired),
            1004 => Ok(Self::TokenInvalid),
            1005 => Ok(Self::AccountDisabled),

            2001 => Ok(Self::PermissionDenied),
            2002 => Ok(Self::RoleNotFound),
            2003 => Ok(Self::RoleNameExists),
            2004 => Ok(Self::RoleIsSystem),
            2005 => Ok(Self::RoleInUse),

            4001 => Ok(Self::OrderNotFound),
            4002 => Ok(Self::OrderEmpty),
            4003 => Ok(Self::OrderAlreadyCompleted),
            4004 => Ok(Self::OrderAlreadyCancelled),

            5001 => Ok(Self::PaymentNotFound),
            5002 => Ok(Self::PaymentInvalidMethod),
            5003 => Ok(Self::PaymentAlreadyPaid),

            6001 => Ok(Self::FoodItemNotFound),
            6101 => Ok(Self::CategoryNotFound),
            6102 => Ok(Self::CategoryHasItems),
            6103 => Ok(Self::CategoryNameExists),
            6201 => Ok(Self::MenuNotFound),
            6202 => Ok(Self::MenuNameExists),
            6301 => Ok(Self::TimeframeNotFound),
            6302 => Ok(Self::TimeframeInvalidWindow),

            8001 => Ok(Self::UserNotFound),
            8002 => Ok(Self::UsernameExists),
            8003 => Ok(Self::UserIsSystem),
            8004 => Ok(Self::UserHasPendingOrders),

            9001 => Ok(Self::InternalError),
            9002 => Ok(Self::DatabaseError),
            9003 => Ok(Self::CounterError),
            9004 => Ok(Self::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::PermissionDenied.code(), 2001);
        assert_eq!(ErrorCode::OrderNotFound.code(), 4001);
        assert_eq!(ErrorCode::PaymentNotFound.code(), 5001);
        assert_eq!(ErrorCode::FoodItemNotFound.code(), 6001);
        assert_eq!(ErrorCode::TimeframeNotFound.code(), 6301);
        assert_eq!(ErrorCode::UserNotFound.code(), 8001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
        assert_eq!(ErrorCode::CounterError.code(), 9003);
    }

    #[test]
    fn test_round_trip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::PermissionDenied,
            ErrorCode::OrderAlreadyCancelled,
            ErrorCode::CounterError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(3001), Err(InvalidErrorCode(3001)));
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
        assert!(!ErrorCode::OrderNotFound.is_success());
    }
}
