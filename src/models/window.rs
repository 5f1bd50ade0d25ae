// Absolute time windows for fetches and history queries

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive `[start, end]` range. A window with `start > end` matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Window of `duration` ending at `end`. A start before the representable range
    /// saturates to the earliest instant.
    pub fn ending_at(end: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            start: end
                .checked_sub_signed(duration)
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
            end,
        }
    }

    /// Window of `duration` ending now.
    pub fn last(duration: Duration) -> Self {
        Self::ending_at(Utc::now(), duration)
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts <= self.end
    }

    /// Bounds as unix nanoseconds, the resolution the history store keeps.
    /// Bounds outside the i64 nanosecond range clamp to `i64::MIN` / `i64::MAX`.
    pub fn as_nanos(&self) -> (i64, i64) {
        (clamped_nanos(self.start), clamped_nanos(self.end))
    }
}

fn clamped_nanos(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_nanos_opt().unwrap_or(if ts.timestamp() < 0 {
        i64::MIN
    } else {
        i64::MAX
    })
}
