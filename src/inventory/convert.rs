// Turn raw provider records into snapshots, samples and events.

use super::records::{DbInstanceRecord, EventRecord, MetricDataResult};
use crate::error::FetchError;
use crate::models::{MetricSample, ResourceEvent, ResourceSnapshot};
use chrono::{DateTime, Utc};

const NOT_AVAILABLE: &str = "N/A";

/// Snapshot for one describe record. `None` when the record carries no identifier.
pub(crate) fn snapshot_from_record(r: &DbInstanceRecord) -> Option<ResourceSnapshot> {
    let instance_id = r
        .db_instance_identifier
        .as_deref()
        .filter(|id| !id.is_empty())?
        .to_string();
    let endpoint = r
        .endpoint
        .as_ref()
        .and_then(|e| e.address.clone())
        .filter(|a| !a.is_empty());

    Some(ResourceSnapshot {
        instance_id,
        engine: or_na(r.engine.as_deref()),
        instance_class: or_na(r.db_instance_class.as_deref()),
        status: or_na(r.db_instance_status.as_deref()),
        allocated_storage: r.allocated_storage.unwrap_or(0),
        endpoint,
        multi_az: r.multi_az.unwrap_or(false),
        publicly_accessible: r.publicly_accessible.unwrap_or(false),
        captured_at: None,
    })
}

fn or_na(s: Option<&str>) -> String {
    s.filter(|v| !v.is_empty()).unwrap_or(NOT_AVAILABLE).to_string()
}

/// Zip a metric-data series into samples, oldest first.
pub(crate) fn samples_from_result(
    instance_id: &str,
    metric_name: &str,
    result: &MetricDataResult,
) -> Result<Vec<MetricSample>, FetchError> {
    if result.timestamps.len() != result.values.len() {
        return Err(FetchError::InvalidResponse(format!(
            "{} for {}: {} timestamps but {} values",
            metric_name,
            instance_id,
            result.timestamps.len(),
            result.values.len()
        )));
    }
    let mut samples: Vec<MetricSample> = result
        .timestamps
        .iter()
        .zip(&result.values)
        .map(|(ts, value)| MetricSample {
            instance_id: instance_id.to_string(),
            metric_name: metric_name.to_string(),
            value: *value,
            sampled_at: *ts,
        })
        .collect();
    samples.sort_by_key(|s| s.sampled_at);
    Ok(samples)
}

/// Event with provider gaps filled in; a missing date falls back to `fetched_at`.
pub(crate) fn event_from_record(r: &EventRecord, fetched_at: DateTime<Utc>) -> ResourceEvent {
    ResourceEvent {
        source_identifier: or_na(r.source_identifier.as_deref()),
        source_type: or_na(r.source_type.as_deref()),
        message: or_na(r.message.as_deref()),
        date: r.date.unwrap_or(fetched_at),
        categories: r.event_categories.clone(),
    }
}
