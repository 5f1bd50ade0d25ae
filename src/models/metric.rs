// Time-series metric models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provider namespace for managed database metrics.
pub const METRIC_NAMESPACE: &str = "AWS/RDS";

/// Dimension that scopes a metric to one instance.
pub const INSTANCE_DIMENSION: &str = "DBInstanceIdentifier";

/// Metrics collected when the config does not list any.
pub const DEFAULT_METRICS: &[&str] = &[
    "CPUUtilization",
    "FreeableMemory",
    "FreeStorageSpace",
    "DatabaseConnections",
    "ReadIOPS",
    "WriteIOPS",
];

/// One data point of a named metric for one instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSample {
    pub instance_id: String,
    pub metric_name: String,
    pub value: f64,
    /// Provider timestamp of the data point (not the insert time).
    pub sampled_at: DateTime<Utc>,
}

/// Aggregation the provider applies within each sampling period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statistic {
    #[default]
    Average,
    Maximum,
    Minimum,
    Sum,
    SampleCount,
}

impl Statistic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Statistic::Average => "Average",
            Statistic::Maximum => "Maximum",
            Statistic::Minimum => "Minimum",
            Statistic::Sum => "Sum",
            Statistic::SampleCount => "SampleCount",
        }
    }
}

impl std::fmt::Display for Statistic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
