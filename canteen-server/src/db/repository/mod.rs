//! Repository Module
//!
//! Provides CRUD operations for the SurrealDB tables.

// Auth
pub mod role;
pub mod user;

// Catalog Domain
pub mod category;
pub mod food_item;
pub mod menu;

// Ordering
pub mod counter;
pub mod order;
pub mod payment;
pub mod timeframe;

// Re-exports
pub use category::CategoryRepository;
pub use counter::PaymentCounterRepository;
pub use food_item::FoodItemRepository;
pub use menu::MenuRepository;
pub use order::OrderRepository;
pub use payment::PaymentRepository;
pub use role::RoleRepository;
pub use timeframe::TimeframeRepository;
pub use user::UserRepository;

use shared::{AppError, ErrorCode};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Parse a `"table:id"` string into a RecordId, rejecting garbage early
pub fn parse_record_id(id: &str) -> RepoResult<surrealdb::RecordId> {
    id.parse()
        .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))
}
