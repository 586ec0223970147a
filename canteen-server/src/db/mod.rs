//! Database Module
//!
//! Embedded SurrealDB: RocksDB-backed on disk, in-memory for tests.

pub mod bootstrap;
pub mod models;
pub mod repository;

use shared::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "canteen";
const DATABASE: &str = "canteen";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the on-disk database at the given path
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {}", e)))?;
        Self::init(db).await
    }

    /// Open an in-memory database (tests)
    pub async fn new_in_memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {}", e)))?;
        Self::init(db).await
    }

    async fn init(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {}", e)))?;

        define_schema(&db).await?;

        tracing::info!("Database connection established");
        Ok(Self { db })
    }
}

/// Define the unique indexes the business rules rely on
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        r#"
        DEFINE INDEX IF NOT EXISTS idx_user_username ON TABLE user FIELDS username;
        DEFINE INDEX IF NOT EXISTS uniq_role_name ON TABLE role FIELDS name UNIQUE;
        DEFINE INDEX IF NOT EXISTS uniq_order_short_id ON TABLE order FIELDS short_id UNIQUE;
        DEFINE INDEX IF NOT EXISTS uniq_payment_order ON TABLE payment FIELDS order_id UNIQUE;
        DEFINE INDEX IF NOT EXISTS idx_timeframe_target ON TABLE order_timeframe FIELDS applicable_kind, applicable_id;
        "#,
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {}", e)))?;
    Ok(())
}
