//! Ordering Timeframe Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{ApplicableKind, OrderTimeFrame, TimeframeCreate, TimeframeUpdate};
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "order_timeframe";

#[derive(Clone)]
pub struct TimeframeRepository {
    base: BaseRepository,
}

impl TimeframeRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all timeframes
    pub async fn find_all(&self) -> RepoResult<Vec<OrderTimeFrame>> {
        let frames: Vec<OrderTimeFrame> = self
            .base
            .db()
            .query("SELECT * FROM order_timeframe ORDER BY applicable_kind, ordering_start_seconds")
            .await?
            .take(0)?;
        Ok(frames)
    }

    /// Find timeframe by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<OrderTimeFrame>> {
        let thing = parse_record_id(id)?;
        let frame: Option<OrderTimeFrame> = self.base.db().select(thing).await?;
        Ok(frame)
    }

    /// Find the active window for a `(kind, entity)` pair
    ///
    /// At most one active record per pair is meaningful; the first match is
    /// returned.
    pub async fn find_active_for(
        &self,
        kind: ApplicableKind,
        applicable_id: &RecordId,
    ) -> RepoResult<Option<OrderTimeFrame>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM order_timeframe WHERE applicable_kind = $kind AND applicable_id = $target AND is_active = true LIMIT 1",
            )
            .bind(("kind", kind))
            .bind(("target", applicable_id.clone()))
            .await?;
        let frames: Vec<OrderTimeFrame> = result.take(0)?;
        Ok(frames.into_iter().next())
    }

    /// Create a new timeframe
    ///
    /// Creating an active window deactivates any previous active window for
    /// the same `(kind, entity)` pair, keeping evaluation unambiguous.
    pub async fn create(&self, data: TimeframeCreate) -> RepoResult<OrderTimeFrame> {
        let applicable_id = parse_record_id(&data.applicable_id)?;

        let frame = OrderTimeFrame {
            id: None,
            ordering_start_seconds: data.ordering_start_seconds,
            ordering_end_seconds: data.ordering_end_seconds,
            is_active: data.is_active.unwrap_or(true),
            applicable_kind: data.applicable_kind,
            applicable_id: applicable_id.clone(),
        };
        frame.validate().map_err(RepoError::Validation)?;

        if frame.is_active {
            self.base
                .db()
                .query(
                    "UPDATE order_timeframe SET is_active = false WHERE applicable_kind = $kind AND applicable_id = $target AND is_active = true",
                )
                .bind(("kind", data.applicable_kind))
                .bind(("target", applicable_id))
                .await?;
        }

        let created: Option<OrderTimeFrame> =
            self.base.db().create(TABLE).content(frame).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create timeframe".to_string()))
    }

    /// Update a timeframe's window or active flag
    pub async fn update(&self, id: &str, data: TimeframeUpdate) -> RepoResult<OrderTimeFrame> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Timeframe {} not found", id)))?;

        let merged = OrderTimeFrame {
            ordering_start_seconds: data
                .ordering_start_seconds
                .unwrap_or(existing.ordering_start_seconds),
            ordering_end_seconds: data
                .ordering_end_seconds
                .unwrap_or(existing.ordering_end_seconds),
            is_active: data.is_active.unwrap_or(existing.is_active),
            ..existing
        };
        merged.validate().map_err(RepoError::Validation)?;

        let thing = parse_record_id(id)?;
        self.base
            .db()
            .query(
                "UPDATE $thing SET ordering_start_seconds = $start, ordering_end_seconds = $end, is_active = $active",
            )
            .bind(("thing", thing))
            .bind(("start", merged.ordering_start_seconds))
            .bind(("end", merged.ordering_end_seconds))
            .bind(("active", merged.is_active))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Timeframe {} not found", id)))
    }

    /// Delete a timeframe
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Timeframe {} not found", id)))?;

        let thing = parse_record_id(id)?;
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
