// Inventory fetcher: read-only queries against the resource provider.
// No state between calls and no retries; FetchError kinds tell the caller what to do.

mod convert;
pub mod http;
pub mod records;

use crate::error::FetchError;
use crate::models::{
    INSTANCE_DIMENSION, METRIC_NAMESPACE, MetricSample, ProviderTarget, ResourceEvent,
    ResourceSnapshot, Statistic, TimeWindow,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use records::{DbInstanceRecord, EventRecord, MetricDataResult};
use tracing::instrument;

pub use http::HttpProvider;

/// One metric-data request: a (namespace, metric, dimension) series over a window.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricQuery {
    pub namespace: String,
    pub metric_name: String,
    pub dimension_name: String,
    pub dimension_value: String,
    pub period_secs: u32,
    pub statistic: Statistic,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// The provider's query surface. Implementations return raw records and map their
/// transport failures onto `FetchError`.
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    /// Describe database instances, optionally only the one named `instance_id`.
    /// An unknown `instance_id` is an empty vec, not an error.
    async fn describe_db_instances(
        &self,
        target: &ProviderTarget,
        instance_id: Option<&str>,
    ) -> Result<Vec<DbInstanceRecord>, FetchError>;

    /// Series for the query; an empty vec when the provider has nothing.
    async fn get_metric_data(
        &self,
        target: &ProviderTarget,
        query: &MetricQuery,
    ) -> Result<Vec<MetricDataResult>, FetchError>;

    /// Events for one instance over the last `duration_minutes`.
    async fn describe_events(
        &self,
        target: &ProviderTarget,
        instance_id: &str,
        duration_minutes: i64,
    ) -> Result<Vec<EventRecord>, FetchError>;
}

pub struct InventoryFetcher<P> {
    provider: P,
}

impl<P: ResourceProvider> InventoryFetcher<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// All database instances visible to `target`.
    #[instrument(skip(self, target), fields(repo = "inventory", operation = "list_resources", provider_target = %target))]
    pub async fn list_resources(
        &self,
        target: &ProviderTarget,
    ) -> Result<Vec<ResourceSnapshot>, FetchError> {
        let records = self.provider.describe_db_instances(target, None).await?;
        Ok(to_snapshots(&records))
    }

    /// Like `list_resources`, restricted to `instance_id`. Empty when it does not exist.
    #[instrument(skip(self, target), fields(repo = "inventory", operation = "list_resources_matching", provider_target = %target))]
    pub async fn list_resources_matching(
        &self,
        target: &ProviderTarget,
        instance_id: &str,
    ) -> Result<Vec<ResourceSnapshot>, FetchError> {
        let records = self
            .provider
            .describe_db_instances(target, Some(instance_id))
            .await?;
        let mut snapshots = to_snapshots(&records);
        snapshots.retain(|s| s.instance_id == instance_id);
        Ok(snapshots)
    }

    /// Averaged samples of `metric_name` for one instance, oldest first.
    /// No data points in `window` is an empty vec, not an error.
    pub async fn get_metric(
        &self,
        target: &ProviderTarget,
        instance_id: &str,
        metric_name: &str,
        period_secs: u32,
        window: TimeWindow,
    ) -> Result<Vec<MetricSample>, FetchError> {
        self.get_metric_with_statistic(
            target,
            instance_id,
            metric_name,
            period_secs,
            window,
            Statistic::Average,
        )
        .await
    }

    #[instrument(skip(self, target), fields(repo = "inventory", operation = "get_metric", provider_target = %target))]
    pub async fn get_metric_with_statistic(
        &self,
        target: &ProviderTarget,
        instance_id: &str,
        metric_name: &str,
        period_secs: u32,
        window: TimeWindow,
        statistic: Statistic,
    ) -> Result<Vec<MetricSample>, FetchError> {
        if window.is_empty() {
            return Ok(Vec::new());
        }
        let query = MetricQuery {
            namespace: METRIC_NAMESPACE.to_string(),
            metric_name: metric_name.to_string(),
            dimension_name: INSTANCE_DIMENSION.to_string(),
            dimension_value: instance_id.to_string(),
            period_secs,
            statistic,
            start: window.start,
            end: window.end,
        };
        let results = self.provider.get_metric_data(target, &query).await?;
        let Some(first) = results.first() else {
            return Ok(Vec::new());
        };
        let mut samples = convert::samples_from_result(instance_id, metric_name, first)?;
        samples.retain(|s| window.contains(s.sampled_at));
        Ok(samples)
    }

    /// Provider events for `instance_id` within the last `duration`.
    #[instrument(skip(self, target), fields(repo = "inventory", operation = "list_events", provider_target = %target))]
    pub async fn list_events(
        &self,
        target: &ProviderTarget,
        instance_id: &str,
        duration: chrono::Duration,
    ) -> Result<Vec<ResourceEvent>, FetchError> {
        let minutes = duration.num_minutes().max(1);
        let records = self
            .provider
            .describe_events(target, instance_id, minutes)
            .await?;
        let fetched_at = Utc::now();
        Ok(records
            .iter()
            .map(|r| convert::event_from_record(r, fetched_at))
            .collect())
    }
}

fn to_snapshots(records: &[DbInstanceRecord]) -> Vec<ResourceSnapshot> {
    let snapshots: Vec<ResourceSnapshot> = records
        .iter()
        .filter_map(convert::snapshot_from_record)
        .collect();
    if snapshots.len() < records.len() {
        tracing::debug!(
            skipped = records.len() - snapshots.len(),
            "describe records without identifier skipped"
        );
    }
    snapshots
}
