use anyhow::Result;
use rdswatch::*;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    tracing::info!(
        name = version::NAME,
        version = version::VERSION,
        targets = app_config.targets.len(),
        metrics = app_config.collection.metrics.len(),
        "starting collection pass"
    );

    let history_repo = history_repo::HistoryRepo::new(&app_config.database.path)?
        .with_metric_dedup(app_config.database.dedupe_metrics);
    history_repo.init().await?;

    let provider = inventory::HttpProvider::from_config(&app_config.provider)?;
    let fetcher = inventory::InventoryFetcher::new(provider);

    let report = collector::collect_once(
        &fetcher,
        &history_repo,
        &app_config.collection,
        &app_config.targets,
    )
    .await;

    tracing::info!(
        targets_ok = report.targets_ok,
        targets_failed = report.targets_failed,
        snapshots_stored = report.snapshots_stored,
        samples_stored = report.samples_stored,
        metric_failures = report.metric_failures,
        "collection pass finished"
    );

    anyhow::ensure!(
        report.targets_ok > 0,
        "no target could be collected ({} failed)",
        report.targets_failed
    );
    Ok(())
}
