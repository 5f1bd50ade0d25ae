// Model tests: JSON shape, windows, fleet summary

use chrono::{DateTime, Duration, TimeZone, Utc};
use rdswatch::models::*;

fn snapshot(id: &str, status: &str, storage: i64) -> ResourceSnapshot {
    ResourceSnapshot {
        instance_id: id.into(),
        engine: "postgres".into(),
        instance_class: "db.t3.micro".into(),
        status: status.into(),
        allocated_storage: storage,
        endpoint: None,
        multi_az: false,
        publicly_accessible: false,
        captured_at: None,
    }
}

#[test]
fn test_snapshot_serialization_camel_case() {
    let s = snapshot("db-1", "available", 20);
    let json = serde_json::to_string(&s).unwrap();
    assert!(json.contains("\"instanceId\""));
    assert!(json.contains("\"allocatedStorage\""));
    assert!(json.contains("\"publiclyAccessible\""));
    let back: ResourceSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, s);
}

#[test]
fn test_metric_sample_serialization() {
    let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let m = MetricSample {
        instance_id: "db-1".into(),
        metric_name: "CPUUtilization".into(),
        value: 12.5,
        sampled_at: at,
    };
    let json = serde_json::to_string(&m).unwrap();
    assert!(json.contains("\"sampledAt\":\"2026-03-01T12:00:00Z\""));
    let back: MetricSample = serde_json::from_str(&json).unwrap();
    assert_eq!(back, m);
}

#[test]
fn test_statistic_names() {
    assert_eq!(Statistic::default(), Statistic::Average);
    assert_eq!(Statistic::SampleCount.as_str(), "SampleCount");
    assert_eq!(Statistic::Maximum.to_string(), "Maximum");
    let s: Statistic = serde_json::from_str("\"Minimum\"").unwrap();
    assert_eq!(s, Statistic::Minimum);
}

#[test]
fn test_time_window_bounds_are_inclusive() {
    let end = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let w = TimeWindow::ending_at(end, Duration::minutes(30));
    assert_eq!(w.start, end - Duration::minutes(30));
    assert!(w.contains(w.start));
    assert!(w.contains(w.end));
    assert!(!w.contains(end + Duration::milliseconds(1)));
    assert!(!w.is_empty());
    assert_eq!(
        w.as_nanos(),
        (
            w.start.timestamp_nanos_opt().unwrap(),
            end.timestamp_nanos_opt().unwrap()
        )
    );

    let inverted = TimeWindow::new(end, w.start);
    assert!(inverted.is_empty());
    assert!(!inverted.contains(end));
}

#[test]
fn test_time_window_saturates_instead_of_overflowing() {
    let end = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let w = TimeWindow::ending_at(end, Duration::MAX);
    assert_eq!(w.start, DateTime::<Utc>::MIN_UTC);
    assert!(w.contains(end - Duration::days(365 * 100)));

    // far outside the nanosecond range: bounds clamp, they do not wrap
    assert_eq!(w.as_nanos(), (i64::MIN, end.timestamp_nanos_opt().unwrap()));
    let far = TimeWindow::new(end, DateTime::<Utc>::MAX_UTC);
    assert_eq!(far.as_nanos().1, i64::MAX);
}

#[test]
fn test_time_window_last_ends_now() {
    let before = Utc::now();
    let w = TimeWindow::last(Duration::hours(1));
    assert!(w.end >= before);
    assert_eq!(w.end - w.start, Duration::hours(1));
}

#[test]
fn test_fleet_summary() {
    let fleet = vec![
        snapshot("a", "available", 20),
        snapshot("b", "Available", 100),
        snapshot("c", "stopped", 50),
    ];
    let summary = FleetSummary::from_snapshots(&fleet);
    assert_eq!(summary.total_instances, 3);
    assert_eq!(summary.available_instances, 2);
    assert_eq!(summary.total_storage, 170);
    assert_eq!(FleetSummary::from_snapshots(&[]), FleetSummary::default());
}

#[test]
fn test_provider_target_display() {
    let t = ProviderTarget::new("prod", "eu-west-1");
    assert_eq!(t.to_string(), "prod@eu-west-1");
}
