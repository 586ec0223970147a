//! Availability Engine
//!
//! Decides whether an entity (category, menu or food item) may currently be
//! ordered, from its active [`OrderTimeFrame`] and the local wall clock.
//!
//! Rules:
//! - no active window record means unrestricted ordering
//! - an active window allows ordering iff the current time-of-day falls
//!   inside `[start, end]`, both ends inclusive
//! - `start > end` is an overnight window wrapping past midnight
//!   (e.g. 22:00-02:00): allowed iff `now >= start || now <= end`
//!
//! The engine is single-entity-scoped; composing an item's window with its
//! category's window (logical AND) is the caller's job.

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{ApplicableKind, OrderTimeFrame};
use crate::db::repository::{RepoResult, TimeframeRepository};
use crate::utils::time::local_day_seconds;

/// Read-only availability decisions
#[derive(Clone)]
pub struct AvailabilityEngine {
    timeframes: TimeframeRepository,
}

impl AvailabilityEngine {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            timeframes: TimeframeRepository::new(db),
        }
    }

    /// Fetch the active window for `(kind, entity)` and evaluate it now
    ///
    /// Storage failures propagate; they are never treated as "disallowed".
    pub async fn is_ordering_allowed_for(
        &self,
        kind: ApplicableKind,
        entity: &RecordId,
    ) -> RepoResult<bool> {
        let frame = self.timeframes.find_active_for(kind, entity).await?;
        Ok(Self::is_ordering_allowed_given(frame.as_ref()))
    }

    /// Evaluate an already-fetched window against the current local time
    pub fn is_ordering_allowed_given(frame: Option<&OrderTimeFrame>) -> bool {
        Self::allowed_at(frame, local_day_seconds())
    }

    /// Evaluate a window at an explicit time-of-day (testable clock seam)
    pub fn allowed_at(frame: Option<&OrderTimeFrame>, now_seconds: u32) -> bool {
        match frame {
            None => true,
            Some(frame) if !frame.is_active => true,
            Some(frame) => window_allows(
                frame.ordering_start_seconds,
                frame.ordering_end_seconds,
                now_seconds,
            ),
        }
    }
}

/// Whether `now` falls inside the daily window `[start, end]` (inclusive)
///
/// `start > end` wraps past midnight.
pub fn window_allows(start: u32, end: u32, now: u32) -> bool {
    if start <= end {
        start <= now && now <= end
    } else {
        now >= start || now <= end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(start: u32, end: u32, is_active: bool) -> OrderTimeFrame {
        OrderTimeFrame {
            id: None,
            ordering_start_seconds: start,
            ordering_end_seconds: end,
            is_active,
            applicable_kind: ApplicableKind::Category,
            applicable_id: "category:breakfast".parse().unwrap(),
        }
    }

    #[test]
    fn test_no_window_allows() {
        assert!(AvailabilityEngine::allowed_at(None, 0));
        assert!(AvailabilityEngine::allowed_at(None, 86_399));
    }

    #[test]
    fn test_inactive_window_allows() {
        let f = frame(32_400, 39_600, false);
        assert!(AvailabilityEngine::allowed_at(Some(&f), 0));
        assert!(AvailabilityEngine::allowed_at(Some(&f), 50_000));
    }

    #[test]
    fn test_window_bounds_inclusive() {
        // 09:00-11:00
        let f = frame(32_400, 39_600, true);
        assert!(!AvailabilityEngine::allowed_at(Some(&f), 32_399));
        assert!(AvailabilityEngine::allowed_at(Some(&f), 32_400));
        assert!(AvailabilityEngine::allowed_at(Some(&f), 36_000)); // 10:00:00
        assert!(AvailabilityEngine::allowed_at(Some(&f), 39_600));
        assert!(!AvailabilityEngine::allowed_at(Some(&f), 39_601)); // 11:00:01
    }

    #[test]
    fn test_before_window_disallows() {
        // 08:00 against a 09:00-11:00 window
        let f = frame(32_400, 39_600, true);
        assert!(!AvailabilityEngine::allowed_at(Some(&f), 28_800));
    }

    #[test]
    fn test_overnight_window_wraps() {
        // 22:00-02:00
        let f = frame(79_200, 7_200, true);
        assert!(AvailabilityEngine::allowed_at(Some(&f), 79_200)); // 22:00
        assert!(AvailabilityEngine::allowed_at(Some(&f), 82_800)); // 23:00
        assert!(AvailabilityEngine::allowed_at(Some(&f), 0)); // midnight
        assert!(AvailabilityEngine::allowed_at(Some(&f), 7_200)); // 02:00
        assert!(!AvailabilityEngine::allowed_at(Some(&f), 7_201)); // 02:00:01
        assert!(!AvailabilityEngine::allowed_at(Some(&f), 43_200)); // noon
        assert!(!AvailabilityEngine::allowed_at(Some(&f), 79_199)); // 21:59:59
    }

    #[test]
    fn test_single_second_window() {
        let f = frame(36_000, 36_000, true);
        assert!(AvailabilityEngine::allowed_at(Some(&f), 36_000));
        assert!(!AvailabilityEngine::allowed_at(Some(&f), 35_999));
        assert!(!AvailabilityEngine::allowed_at(Some(&f), 36_001));
    }

    #[test]
    fn test_full_day_window() {
        let f = frame(0, 86_399, true);
        assert!(AvailabilityEngine::allowed_at(Some(&f), 0));
        assert!(AvailabilityEngine::allowed_at(Some(&f), 43_200));
        assert!(AvailabilityEngine::allowed_at(Some(&f), 86_399));
    }
}
