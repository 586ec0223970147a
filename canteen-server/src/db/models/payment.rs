//! Payment Model
//!
//! Exactly one payment row per order; the pickup token is assigned when the
//! payment is created and is immutable afterwards.

use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type PaymentId = RecordId;

/// Payment status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refund,
    Cancelled,
}

/// Payment entity (1:1 with an order)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<PaymentId>,
    /// The paid order
    #[serde(with = "serde_helpers::record_id")]
    pub order_id: RecordId,
    pub amount: Decimal,
    /// Payment method ("cash", "card", ...)
    pub method: String,
    pub status: PaymentStatus,
    /// Daily-sequential pickup token, immutable once assigned
    pub token: String,
    /// Unix millis of settlement, set when status becomes Paid
    #[serde(default)]
    pub payment_date: Option<i64>,
    /// Unix millis
    pub created_at: i64,
}

/// Per-day pickup token counter
///
/// One row per calendar day (server-local), created lazily by the first
/// order of the day. Mutated exclusively through the atomic
/// increment-or-create in the counter repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCounter {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Date stamp "YYYY-MM-DD" (doubles as the record key)
    pub counter_date: String,
    pub sequence: i64,
}

/// Settle payment payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessPaymentRequest {
    /// Override the payment method recorded at creation
    pub payment_method: Option<String>,
}
