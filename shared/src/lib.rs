//! Shared types for the canteen ordering backend
//!
//! Holds the pieces used by both the server and its clients:
//! - [`error`]: unified error codes, [`AppError`] and the [`ApiResponse`] envelope
//! - [`response`]: pagination types for list endpoints
//! - [`util`]: timestamps and short order id generation

pub mod error;
pub mod response;
pub mod util;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use response::{PaginatedResponse, Pagination};
