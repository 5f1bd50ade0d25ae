// Shared test helpers: sample models and an in-memory provider fake

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rdswatch::error::FetchError;
use rdswatch::history_repo::HistoryRepo;
use rdswatch::inventory::records::{
    DbInstanceRecord, EndpointRecord, EventRecord, MetricDataResult,
};
use rdswatch::inventory::{MetricQuery, ResourceProvider};
use rdswatch::models::*;
use std::collections::HashMap;
use std::sync::Mutex;
use tempfile::TempDir;

pub fn snapshot(instance_id: &str) -> ResourceSnapshot {
    ResourceSnapshot {
        instance_id: instance_id.into(),
        engine: "postgres".into(),
        instance_class: "db.t3.micro".into(),
        status: "available".into(),
        allocated_storage: 20,
        endpoint: Some(format!("{}.x", instance_id)),
        multi_az: false,
        publicly_accessible: false,
        captured_at: None,
    }
}

pub fn sample(instance_id: &str, metric_name: &str, value: f64, at: DateTime<Utc>) -> MetricSample {
    MetricSample {
        instance_id: instance_id.into(),
        metric_name: metric_name.into(),
        value,
        sampled_at: at,
    }
}

/// Fixed reference time, on a whole second.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

/// Fresh, initialized store in a temp dir. Keep the TempDir alive for the test's duration.
pub async fn temp_repo() -> (TempDir, HistoryRepo) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.db");
    let repo = HistoryRepo::new(path.to_str().unwrap()).unwrap();
    repo.init().await.unwrap();
    (dir, repo)
}

pub fn instance_record(id: &str, status: &str) -> DbInstanceRecord {
    DbInstanceRecord {
        db_instance_identifier: Some(id.into()),
        engine: Some("mysql".into()),
        db_instance_class: Some("db.r5.large".into()),
        db_instance_status: Some(status.into()),
        allocated_storage: Some(100),
        endpoint: Some(EndpointRecord {
            address: Some(format!("{}.abc.eu-west-1.rds.amazonaws.com", id)),
            port: Some(3306),
        }),
        multi_az: Some(true),
        publicly_accessible: Some(false),
    }
}

pub enum Failure {
    Auth,
    Denied,
    Transient,
}

impl Failure {
    fn to_error(&self, what: &str) -> FetchError {
        match self {
            Failure::Auth => FetchError::Authentication(what.into()),
            Failure::Denied => FetchError::AccessDenied(what.into()),
            Failure::Transient => FetchError::Transient(what.into()),
        }
    }
}

/// Provider fake: per-profile instance lists, per-(instance, metric) series, canned failures.
#[derive(Default)]
pub struct FakeProvider {
    pub instances: HashMap<String, Vec<DbInstanceRecord>>,
    pub series: HashMap<(String, String), MetricDataResult>,
    pub events: Vec<EventRecord>,
    pub failing_profiles: HashMap<String, Failure>,
    pub failing_metrics: HashMap<String, Failure>,
    pub metric_queries: Mutex<Vec<MetricQuery>>,
    pub event_durations: Mutex<Vec<i64>>,
}

impl FakeProvider {
    pub fn with_instances(mut self, profile: &str, records: Vec<DbInstanceRecord>) -> Self {
        self.instances.insert(profile.into(), records);
        self
    }

    pub fn with_series(
        mut self,
        instance_id: &str,
        metric_name: &str,
        points: &[(DateTime<Utc>, f64)],
    ) -> Self {
        self.series.insert(
            (instance_id.into(), metric_name.into()),
            MetricDataResult {
                id: Some("m1".into()),
                timestamps: points.iter().map(|(t, _)| *t).collect(),
                values: points.iter().map(|(_, v)| *v).collect(),
            },
        );
        self
    }

    pub fn failing_profile(mut self, profile: &str, failure: Failure) -> Self {
        self.failing_profiles.insert(profile.into(), failure);
        self
    }

    pub fn failing_metric(mut self, metric_name: &str, failure: Failure) -> Self {
        self.failing_metrics.insert(metric_name.into(), failure);
        self
    }
}

#[async_trait]
impl ResourceProvider for FakeProvider {
    async fn describe_db_instances(
        &self,
        target: &ProviderTarget,
        instance_id: Option<&str>,
    ) -> Result<Vec<DbInstanceRecord>, FetchError> {
        if let Some(f) = self.failing_profiles.get(&target.profile) {
            return Err(f.to_error(&target.profile));
        }
        let all = self.instances.get(&target.profile).cloned().unwrap_or_default();
        Ok(match instance_id {
            Some(id) => all
                .into_iter()
                .filter(|r| r.db_instance_identifier.as_deref() == Some(id))
                .collect(),
            None => all,
        })
    }

    async fn get_metric_data(
        &self,
        target: &ProviderTarget,
        query: &MetricQuery,
    ) -> Result<Vec<MetricDataResult>, FetchError> {
        self.metric_queries.lock().unwrap().push(query.clone());
        if let Some(f) = self.failing_profiles.get(&target.profile) {
            return Err(f.to_error(&target.profile));
        }
        if let Some(f) = self.failing_metrics.get(&query.metric_name) {
            return Err(f.to_error(&query.metric_name));
        }
        Ok(self
            .series
            .get(&(query.dimension_value.clone(), query.metric_name.clone()))
            .cloned()
            .into_iter()
            .collect())
    }

    async fn describe_events(
        &self,
        _target: &ProviderTarget,
        instance_id: &str,
        duration_minutes: i64,
    ) -> Result<Vec<EventRecord>, FetchError> {
        self.event_durations.lock().unwrap().push(duration_minutes);
        Ok(self
            .events
            .iter()
            .filter(|e| e.source_identifier.as_deref() == Some(instance_id))
            .cloned()
            .collect())
    }
}
