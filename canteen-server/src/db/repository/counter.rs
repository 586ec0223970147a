//! Payment Counter Repository
//!
//! Backs the pickup token sequencer. The per-day counter row is only ever
//! touched through [`increment`](PaymentCounterRepository::increment), a
//! single UPSERT statement, so concurrent order creation cannot lose an
//! update or hand out the same sequence twice.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::PaymentCounter;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct PaymentCounterRepository {
    base: BaseRepository,
}

impl PaymentCounterRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Atomically increment-or-create the counter for a date key
    ///
    /// Returns the new sequence value: 1 for the first call of a day, then
    /// 2, 3, ... with no duplicates and no gaps. The statement either fully
    /// applies or not at all, so a failed attempt never consumes a sequence
    /// number; optimistic write conflicts between concurrent callers are
    /// retried here.
    pub async fn increment(&self, date_key: &str) -> RepoResult<i64> {
        const MAX_ATTEMPTS: u32 = 64;

        let mut attempt = 0;
        loop {
            match self.try_increment(date_key).await {
                Err(RepoError::Database(msg))
                    if attempt < MAX_ATTEMPTS && is_retryable_conflict(&msg) =>
                {
                    attempt += 1;
                    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
                }
                other => return other,
            }
        }
    }

    async fn try_increment(&self, date_key: &str) -> RepoResult<i64> {
        let mut result = self
            .base
            .db()
            .query(
                "UPSERT type::thing('payment_counter', $day) SET counter_date = $day, sequence += 1 RETURN AFTER",
            )
            .bind(("day", date_key.to_string()))
            .await?;
        let counters: Vec<PaymentCounter> = result.take(0)?;
        counters
            .into_iter()
            .next()
            .map(|counter| counter.sequence)
            .ok_or_else(|| {
                RepoError::Database(format!("Counter upsert for {} returned no row", date_key))
            })
    }

    /// Read the current sequence for a date key without incrementing
    pub async fn current(&self, date_key: &str) -> RepoResult<Option<i64>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM type::thing('payment_counter', $day)")
            .bind(("day", date_key.to_string()))
            .await?;
        let counters: Vec<PaymentCounter> = result.take(0)?;
        Ok(counters.into_iter().next().map(|counter| counter.sequence))
    }
}

/// Whether a transaction failure is a retryable optimistic conflict
///
/// SurrealDB reports these as "... due to a read or write conflict. This
/// transaction can be retried".
fn is_retryable_conflict(msg: &str) -> bool {
    let msg = msg.to_lowercase();
    msg.contains("can be retried") || msg.contains("write conflict")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable_conflict() {
        assert!(is_retryable_conflict(
            "Failed to commit transaction due to a read or write conflict. This transaction can be retried"
        ));
        assert!(!is_retryable_conflict("Parse error: unexpected token"));
    }
}

