//! Order Repository
//!
//! Order mutations go through `ordering::OrderService`; this layer is plain
//! storage access plus the reconciliation query for orders whose payment
//! write failed mid-creation.

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Order, OrderStatus};
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a new order
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing = parse_record_id(id)?;
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    /// Find order by human-readable short id
    pub async fn find_by_short_id(&self, short_id: &str) -> RepoResult<Option<Order>> {
        let short_id_owned = short_id.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE short_id = $short_id LIMIT 1")
            .bind(("short_id", short_id_owned))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Page through orders, newest first
    pub async fn find_page(&self, page: u32, per_page: u32) -> RepoResult<Vec<Order>> {
        let start = (page.saturating_sub(1) as i64) * per_page as i64;
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC LIMIT $limit START $start")
            .bind(("limit", per_page as i64))
            .bind(("start", start))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Total order count (pagination metadata)
    pub async fn count_all(&self) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM order GROUP ALL")
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }

    /// Orders of one customer, newest first
    pub async fn find_by_customer(&self, customer: &RecordId) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE customer = $customer ORDER BY created_at DESC")
            .bind(("customer", customer.clone()))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Mark an order cancelled
    pub async fn mark_cancelled(
        &self,
        id: &RecordId,
        reason: Option<String>,
        now_millis: i64,
    ) -> RepoResult<Order> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $thing SET status = 'CANCELLED', cancelled_at = $now, cancel_reason = $reason RETURN AFTER",
            )
            .bind(("thing", id.clone()))
            .bind(("now", now_millis))
            .bind(("reason", reason))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Transition an order's status
    pub async fn set_status(&self, id: &RecordId, status: OrderStatus) -> RepoResult<Order> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET status = $status RETURN AFTER")
            .bind(("thing", id.clone()))
            .bind(("status", status))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Orders with no linked payment row
    ///
    /// Order creation is best-effort sequential (order, then token, then
    /// payment); a crash between the writes leaves an order here until an
    /// operator reconciles it.
    pub async fn find_missing_payment(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query(
                "SELECT * FROM order WHERE array::len((SELECT VALUE id FROM payment WHERE order_id = $parent.id)) = 0 ORDER BY created_at",
            )
            .await?
            .take(0)?;
        Ok(orders)
    }
}
