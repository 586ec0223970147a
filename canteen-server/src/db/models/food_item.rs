//! Food Item Model

use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type FoodItemId = RecordId;

/// Food item model
///
/// `is_available` is the manual on/off switch (sold out, kitchen closed);
/// time-window restrictions live in the order_timeframe table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<FoodItemId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    /// Parent category
    #[serde(with = "serde_helpers::record_id")]
    pub category: RecordId,
    /// Optional menu membership
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub menu: Option<RecordId>,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_available: bool,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct FoodItemCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    /// Parent category id ("category:xxx")
    pub category: String,
    /// Optional menu id ("menu:xxx")
    pub menu: Option<String>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FoodItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub menu: Option<String>,
    pub is_available: Option<bool>,
    pub is_active: Option<bool>,
}
