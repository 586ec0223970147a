//! Pickup Token Sequencer
//!
//! Issues the daily-sequential pickup numbers printed on receipts. The
//! sequence lives in one `payment_counter` row per calendar day
//! (server-local) and is advanced with a single atomic UPSERT, so any number
//! of concurrent order-creation tasks receive distinct, gap-free values.
//! A new day starts a fresh sequence; there is no cross-day uniqueness.

use chrono::NaiveDate;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::repository::{PaymentCounterRepository, RepoResult};

/// Sequential pickup token issuer
#[derive(Clone)]
pub struct TokenSequencer {
    counters: PaymentCounterRepository,
    base_offset: i64,
}

impl TokenSequencer {
    pub fn new(db: Surreal<Db>, base_offset: i64) -> Self {
        Self {
            counters: PaymentCounterRepository::new(db),
            base_offset,
        }
    }

    /// Issue the next token for today
    ///
    /// Concurrent callers each get a distinct value; the first token of a
    /// day is `base_offset + 1`.
    pub async fn next_token(&self) -> RepoResult<String> {
        let key = counter_key(chrono::Local::now().date_naive());
        self.next_token_for_key(&key).await
    }

    /// Issue the next token for an explicit date key (testable date seam)
    pub async fn next_token_for_key(&self, date_key: &str) -> RepoResult<String> {
        let sequence = self.counters.increment(date_key).await?;
        Ok(format_token(self.base_offset, sequence))
    }
}

/// Counter record key for a date: "2026-08-07"
pub fn counter_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Render a token: base offset plus the day's sequence number
pub fn format_token(base_offset: i64, sequence: i64) -> String {
    (base_offset + sequence).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_key_format() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        assert_eq!(counter_key(date), "2026-08-07");
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(counter_key(date), "2026-01-01");
    }

    #[test]
    fn test_format_token() {
        assert_eq!(format_token(101, 1), "102");
        assert_eq!(format_token(101, 42), "143");
        assert_eq!(format_token(0, 1), "1");
    }

    #[tokio::test]
    async fn test_sequence_starts_fresh_per_day() {
        let db = crate::db::DbService::new_in_memory().await.unwrap().db;
        let sequencer = TokenSequencer::new(db, 101);

        assert_eq!(
            sequencer.next_token_for_key("2026-08-07").await.unwrap(),
            "102"
        );
        assert_eq!(
            sequencer.next_token_for_key("2026-08-07").await.unwrap(),
            "103"
        );
        // Next calendar day starts over
        assert_eq!(
            sequencer.next_token_for_key("2026-08-08").await.unwrap(),
            "102"
        );
        // And the first day's counter is untouched
        assert_eq!(
            sequencer.next_token_for_key("2026-08-07").await.unwrap(),
            "104"
        );
    }
}
