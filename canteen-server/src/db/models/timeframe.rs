//! Ordering Timeframe Model
//!
//! A timeframe gates when an entity may be ordered: a daily window in
//! seconds since local midnight, attached to a category, menu or food item.
//! No record (or an inactive one) means the entity is always orderable.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use std::fmt;
use surrealdb::RecordId;

pub type TimeframeId = RecordId;

/// Last second of a day (23:59:59)
pub const MAX_DAY_SECONDS: u32 = 86_399;

/// Which kind of entity a timeframe applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicableKind {
    Category,
    Menu,
    FoodItem,
}

impl ApplicableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Menu => "menu",
            Self::FoodItem => "fooditem",
        }
    }
}

impl fmt::Display for ApplicableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering window record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderTimeFrame {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<TimeframeId>,
    /// Window start, seconds since local midnight (0..=86399)
    pub ordering_start_seconds: u32,
    /// Window end, seconds since local midnight (0..=86399), inclusive.
    /// `end < start` denotes an overnight window wrapping past midnight.
    pub ordering_end_seconds: u32,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    pub applicable_kind: ApplicableKind,
    /// The category/menu/fooditem record this window applies to
    #[serde(with = "serde_helpers::record_id")]
    pub applicable_id: RecordId,
}

fn default_true() -> bool {
    true
}

impl OrderTimeFrame {
    /// Validate window bounds
    pub fn validate(&self) -> Result<(), String> {
        if self.ordering_start_seconds > MAX_DAY_SECONDS {
            return Err(format!(
                "ordering_start_seconds {} out of range 0..={}",
                self.ordering_start_seconds, MAX_DAY_SECONDS
            ));
        }
        if self.ordering_end_seconds > MAX_DAY_SECONDS {
            return Err(format!(
                "ordering_end_seconds {} out of range 0..={}",
                self.ordering_end_seconds, MAX_DAY_SECONDS
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimeframeCreate {
    pub ordering_start_seconds: u32,
    pub ordering_end_seconds: u32,
    pub applicable_kind: ApplicableKind,
    /// Target record id ("category:xxx", "menu:xxx" or "food_item:xxx")
    pub applicable_id: String,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimeframeUpdate {
    pub ordering_start_seconds: Option<u32>,
    pub ordering_end_seconds: Option<u32>,
    pub is_active: Option<bool>,
}
