// Print stored history as JSON: known instances, their metrics, and recent samples.
//
// Usage: cargo run --example history_report -- [DB_PATH] [HOURS]
//   DB_PATH  default: ./data/rds_history.db
//   HOURS    default: 24

use rdswatch::history_repo::HistoryRepo;
use rdswatch::models::{FleetSummary, TimeWindow};
use std::collections::HashSet;
use std::env;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let path = args
        .get(1)
        .map(String::as_str)
        .unwrap_or("./data/rds_history.db");
    let hours: i64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(24);

    let repo = HistoryRepo::new(path)?;
    repo.init().await?;
    let window = TimeWindow::last(chrono::Duration::try_hours(hours).unwrap_or(chrono::Duration::MAX));

    let snapshots = repo.query_resources(window).await?;
    // Newest first, so the first row per instance is its latest state.
    let mut seen = HashSet::new();
    let latest: Vec<_> = snapshots
        .iter()
        .filter(|s| seen.insert(s.instance_id.clone()))
        .cloned()
        .collect();
    let mut instances = Vec::new();
    for instance_id in repo.list_known_instances().await? {
        let mut metrics = serde_json::Map::new();
        for metric_name in repo.list_known_metrics(&instance_id).await? {
            let samples = repo.query_metrics(&instance_id, &metric_name, window).await?;
            metrics.insert(metric_name, serde_json::to_value(samples)?);
        }
        instances.push(serde_json::json!({
            "instanceId": instance_id,
            "metrics": metrics,
        }));
    }

    let report = serde_json::json!({
        "window": window,
        "summary": FleetSummary::from_snapshots(&latest),
        "latest": latest,
        "instances": instances,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
