// Managed database inventory models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status reported by the provider for an instance that is up and serving.
pub const STATUS_AVAILABLE: &str = "available";

/// One managed database instance as seen at fetch time.
///
/// Rows are appended per fetch, so the same `instance_id` shows up once per
/// collection pass in the history store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSnapshot {
    pub instance_id: String,
    pub engine: String,
    pub instance_class: String,
    pub status: String,
    /// Allocated storage in GB.
    pub allocated_storage: i64,
    pub endpoint: Option<String>,
    pub multi_az: bool,
    pub publicly_accessible: bool,
    /// Write time; `None` on fresh fetches, filled in by the history store.
    #[serde(default)]
    pub captured_at: Option<DateTime<Utc>>,
}

impl ResourceSnapshot {
    pub fn is_available(&self) -> bool {
        self.status.eq_ignore_ascii_case(STATUS_AVAILABLE)
    }
}

/// Fleet-wide totals shown above the instance table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetSummary {
    pub total_instances: usize,
    pub available_instances: usize,
    /// Sum of allocated storage in GB.
    pub total_storage: i64,
}

impl FleetSummary {
    pub fn from_snapshots(snapshots: &[ResourceSnapshot]) -> Self {
        Self {
            total_instances: snapshots.len(),
            available_instances: snapshots.iter().filter(|s| s.is_available()).count(),
            total_storage: snapshots.iter().map(|s| s.allocated_storage).sum(),
        }
    }
}
