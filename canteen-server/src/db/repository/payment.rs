//! Payment Repository
//!
//! One payment row per order (UNIQUE index on `order`); the pickup token is
//! written once at creation and never updated afterwards.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Payment, PaymentStatus};
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "payment";

#[derive(Clone)]
pub struct PaymentRepository {
    base: BaseRepository,
}

impl PaymentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a new payment
    pub async fn create(&self, payment: Payment) -> RepoResult<Payment> {
        let created: Option<Payment> = self.base.db().create(TABLE).content(payment).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create payment".to_string()))
    }

    /// Find payment by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Payment>> {
        let thing = parse_record_id(id)?;
        let payment: Option<Payment> = self.base.db().select(thing).await?;
        Ok(payment)
    }

    /// Find the payment linked to an order
    pub async fn find_by_order(&self, order: &RecordId) -> RepoResult<Option<Payment>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM payment WHERE order_id = $order LIMIT 1")
            .bind(("order", order.clone()))
            .await?;
        let payments: Vec<Payment> = result.take(0)?;
        Ok(payments.into_iter().next())
    }

    /// Settle a payment: status -> PAID, record the settlement time and
    /// (optionally) a corrected method
    pub async fn mark_paid(
        &self,
        id: &RecordId,
        method: Option<String>,
        now_millis: i64,
    ) -> RepoResult<Payment> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $thing SET status = 'PAID', payment_date = $now, method = $method OR method RETURN AFTER",
            )
            .bind(("thing", id.clone()))
            .bind(("now", now_millis))
            .bind(("method", method))
            .await?;
        let payments: Vec<Payment> = result.take(0)?;
        payments
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Payment {} not found", id)))
    }

    /// Cascade an order cancellation onto its payment
    pub async fn cancel_for_order(&self, order: &RecordId) -> RepoResult<Option<Payment>> {
        let mut result = self
            .base
            .db()
            .query("UPDATE payment SET status = 'CANCELLED' WHERE order_id = $order RETURN AFTER")
            .bind(("order", order.clone()))
            .await?;
        let payments: Vec<Payment> = result.take(0)?;
        Ok(payments.into_iter().next())
    }

    /// Set a payment's status
    pub async fn set_status(&self, id: &RecordId, status: PaymentStatus) -> RepoResult<Payment> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET status = $status RETURN AFTER")
            .bind(("thing", id.clone()))
            .bind(("status", status))
            .await?;
        let payments: Vec<Payment> = result.take(0)?;
        payments
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Payment {} not found", id)))
    }
}
