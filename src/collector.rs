// One collection pass: for each configured target, snapshot the inventory and pull the
// lookback window of every configured metric into the history store.
// Failures are logged per target / per series and the pass moves on; nothing is retried here.

use crate::config::CollectionConfig;
use crate::history_repo::HistoryRepo;
use crate::inventory::{InventoryFetcher, ResourceProvider};
use crate::models::{ProviderTarget, TimeWindow};
use serde::Serialize;
use tracing::{info, warn};

/// Counters for one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionReport {
    pub targets_ok: usize,
    pub targets_failed: usize,
    pub snapshots_stored: u64,
    pub samples_stored: u64,
    pub metric_failures: usize,
}

pub async fn collect_once<P: ResourceProvider>(
    fetcher: &InventoryFetcher<P>,
    repo: &HistoryRepo,
    config: &CollectionConfig,
    targets: &[ProviderTarget],
) -> CollectionReport {
    let mut report = CollectionReport::default();
    let lookback = i64::try_from(config.lookback_secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .unwrap_or(chrono::Duration::MAX);

    for target in targets {
        let snapshots = match fetcher.list_resources(target).await {
            Ok(s) => s,
            Err(e) => {
                warn!(
                    error = %e,
                    retryable = e.is_retryable(),
                    operation = "list_resources",
                    provider_target = %target,
                    "inventory fetch failed"
                );
                report.targets_failed += 1;
                continue;
            }
        };

        match repo.store_resources(&snapshots).await {
            Ok(n) => report.snapshots_stored += n,
            Err(e) => {
                warn!(
                    error = %e,
                    operation = "store_resources",
                    provider_target = %target,
                    "failed to store snapshots"
                );
                report.targets_failed += 1;
                continue;
            }
        }

        let window = TimeWindow::last(lookback);
        for snapshot in &snapshots {
            for metric_name in &config.metrics {
                let samples = match fetcher
                    .get_metric_with_statistic(
                        target,
                        &snapshot.instance_id,
                        metric_name,
                        config.period_secs,
                        window,
                        config.statistic,
                    )
                    .await
                {
                    Ok(s) => s,
                    Err(e) => {
                        warn!(
                            error = %e,
                            retryable = e.is_retryable(),
                            operation = "get_metric",
                            instance_id = %snapshot.instance_id,
                            metric_name = %metric_name,
                            "metric fetch failed"
                        );
                        report.metric_failures += 1;
                        continue;
                    }
                };
                match repo
                    .store_metrics(&snapshot.instance_id, metric_name, &samples)
                    .await
                {
                    Ok(n) => report.samples_stored += n,
                    Err(e) => {
                        warn!(
                            error = %e,
                            operation = "store_metrics",
                            instance_id = %snapshot.instance_id,
                            metric_name = %metric_name,
                            "failed to store samples"
                        );
                        report.metric_failures += 1;
                    }
                }
            }
        }

        info!(
            provider_target = %target,
            instances = snapshots.len(),
            "target collected"
        );
        report.targets_ok += 1;
    }

    report
}
