//! Order Model

use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type OrderId = RecordId;

/// Order status
///
/// Transitions only move forward, except into `Cancelled` which is terminal:
/// `Created -> {Processing, Completed, Cancelled}`,
/// `Processing -> {Completed, Cancelled}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Created,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// A single order line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineItem {
    /// The ordered food item
    #[serde(with = "serde_helpers::record_id")]
    pub food_item: RecordId,
    /// Item name at order time (menu edits must not rewrite history)
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub line_total: Decimal,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OrderId>,
    /// Human-readable id, date-prefixed with a random suffix
    pub short_id: String,
    /// Ordering customer
    #[serde(with = "serde_helpers::record_id")]
    pub customer: RecordId,
    pub items: Vec<OrderLineItem>,
    pub total_price: Decimal,
    pub status: OrderStatus,
    /// Unix millis
    pub created_at: i64,
    #[serde(default)]
    pub cancelled_at: Option<i64>,
    #[serde(default)]
    pub cancel_reason: Option<String>,
}

// =============================================================================
// API Request Types
// =============================================================================

/// One requested line in an order creation request
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemRequest {
    /// Food item id ("food_item:xxx")
    pub food_item_id: String,
    pub quantity: i32,
}

/// Create order payload
#[derive(Debug, Clone, Deserialize)]
pub struct OrderCreateRequest {
    pub items: Vec<OrderItemRequest>,
    /// Payment method ("cash", "card", ...)
    pub payment_method: String,
    /// Direct-pay: settle immediately, order starts out completed
    #[serde(default)]
    pub pay_now: bool,
    /// Order on behalf of another customer (staff only)
    pub customer_id: Option<String>,
}

/// Cancel order payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderCancelRequest {
    pub reason: Option<String>,
}
