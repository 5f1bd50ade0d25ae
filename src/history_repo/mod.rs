// SQLite history of inventory snapshots and metric samples. Append-only.
// Every operation opens its own connection and closes it before returning; a failed
// operation drops (and so closes) its connection on the way out.

mod schema;

use crate::error::StoreError;
use crate::models::{MetricSample, ResourceSnapshot, TimeWindow};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{ConnectOptions, Connection, Row};
use std::path::Path;
use std::str::FromStr;
use tracing::instrument;

pub struct HistoryRepo {
    options: SqliteConnectOptions,
    dedupe_metrics: bool,
}

impl HistoryRepo {
    /// Prepare a store at `path`. Creates the parent dir; the database file itself is
    /// created by the first operation (normally `init`).
    pub fn new(path: &str) -> Result<Self, StoreError> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        Ok(Self {
            options,
            dedupe_metrics: false,
        })
    }

    /// Skip metric samples whose (instance_id, metric_name, sampled_at) is already stored.
    pub fn with_metric_dedup(mut self, enabled: bool) -> Self {
        self.dedupe_metrics = enabled;
        self
    }

    async fn connect(&self) -> Result<SqliteConnection, StoreError> {
        Ok(self.options.connect().await?)
    }

    #[instrument(skip(self), fields(repo = "history", operation = "init"))]
    pub async fn init(&self) -> Result<(), StoreError> {
        let mut conn = self.connect().await?;
        schema::create_tables(&mut conn).await?;
        conn.close().await?;
        Ok(())
    }

    /// Append one row per snapshot, all in one transaction. Snapshots without
    /// `captured_at` get the write time, never earlier than the newest store-assigned
    /// time, so store-assigned times are non-decreasing in insert order. An explicit
    /// `captured_at` is kept as given and does not move that floor.
    #[instrument(skip(self, snapshots), fields(repo = "history", operation = "store_resources", snapshots_count = snapshots.len()))]
    pub async fn store_resources(&self, snapshots: &[ResourceSnapshot]) -> Result<u64, StoreError> {
        if snapshots.is_empty() {
            return Ok(0);
        }
        let mut conn = self.connect().await?;
        let mut tx = conn.begin().await?;

        let newest = sqlx::query_scalar::<_, Option<i64>>(
            "SELECT MAX(timestamp) FROM resources WHERE store_stamped = 1",
        )
        .fetch_one(&mut *tx)
        .await?;
        let now = to_nanos(Utc::now())?;
        let write_ts = newest.map_or(now, |n| now.max(n));

        let mut inserted = 0;
        for s in snapshots {
            let (captured_at, store_stamped) = match s.captured_at {
                Some(t) => (to_nanos(t)?, false),
                None => (write_ts, true),
            };
            let r = sqlx::query(
                "INSERT INTO resources (instance_id, engine, instance_class, status, allocated_storage, endpoint, multi_az, publicly_accessible, timestamp, store_stamped) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
            )
            .bind(&s.instance_id)
            .bind(&s.engine)
            .bind(&s.instance_class)
            .bind(&s.status)
            .bind(s.allocated_storage)
            .bind(s.endpoint.as_deref())
            .bind(s.multi_az)
            .bind(s.publicly_accessible)
            .bind(captured_at)
            .bind(store_stamped)
            .execute(&mut *tx)
            .await?;
            inserted += r.rows_affected();
        }
        tx.commit().await?;
        conn.close().await?;
        Ok(inserted)
    }

    /// Append samples for one series in one transaction. `instance_id` and `metric_name`
    /// come from the call, not from the samples. Returns the number of rows written.
    #[instrument(skip(self, samples), fields(repo = "history", operation = "store_metrics", samples_count = samples.len()))]
    pub async fn store_metrics(
        &self,
        instance_id: &str,
        metric_name: &str,
        samples: &[MetricSample],
    ) -> Result<u64, StoreError> {
        if samples.is_empty() {
            return Ok(0);
        }
        let sql = if self.dedupe_metrics {
            "INSERT INTO metrics (instance_id, metric_name, value, timestamp)
             SELECT $1, $2, $3, $4
             WHERE NOT EXISTS (
                 SELECT 1 FROM metrics WHERE instance_id = $1 AND metric_name = $2 AND timestamp = $4
             )"
        } else {
            "INSERT INTO metrics (instance_id, metric_name, value, timestamp) VALUES ($1, $2, $3, $4)"
        };

        let mut conn = self.connect().await?;
        let mut tx = conn.begin().await?;
        let mut inserted = 0;
        for s in samples {
            let r = sqlx::query(sql)
                .bind(instance_id)
                .bind(metric_name)
                .bind(s.value)
                .bind(to_nanos(s.sampled_at)?)
                .execute(&mut *tx)
                .await?;
            inserted += r.rows_affected();
        }
        tx.commit().await?;
        conn.close().await?;

        if inserted < samples.len() as u64 {
            tracing::debug!(
                skipped = samples.len() as u64 - inserted,
                "duplicate metric samples skipped"
            );
        }
        Ok(inserted)
    }

    /// Snapshots captured in `window` (inclusive), newest first.
    #[instrument(skip(self), fields(repo = "history", operation = "query_resources"))]
    pub async fn query_resources(
        &self,
        window: TimeWindow,
    ) -> Result<Vec<ResourceSnapshot>, StoreError> {
        let (from_ts, to_ts) = window.as_nanos();
        let mut conn = self.connect().await?;
        let rows = sqlx::query(
            "SELECT instance_id, engine, instance_class, status, allocated_storage, endpoint, multi_az, publicly_accessible, timestamp
             FROM resources WHERE timestamp >= $1 AND timestamp <= $2
             ORDER BY timestamp DESC, id DESC",
        )
        .bind(from_ts)
        .bind(to_ts)
        .fetch_all(&mut conn)
        .await?;
        conn.close().await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(parse_resource_row(&row)?);
        }
        Ok(out)
    }

    /// Samples of one series with `sampled_at` in `window` (inclusive), newest first.
    #[instrument(skip(self), fields(repo = "history", operation = "query_metrics"))]
    pub async fn query_metrics(
        &self,
        instance_id: &str,
        metric_name: &str,
        window: TimeWindow,
    ) -> Result<Vec<MetricSample>, StoreError> {
        let (from_ts, to_ts) = window.as_nanos();
        let mut conn = self.connect().await?;
        let rows = sqlx::query(
            "SELECT instance_id, metric_name, value, timestamp
             FROM metrics
             WHERE instance_id = $1 AND metric_name = $2 AND timestamp >= $3 AND timestamp <= $4
             ORDER BY timestamp DESC, id DESC",
        )
        .bind(instance_id)
        .bind(metric_name)
        .bind(from_ts)
        .bind(to_ts)
        .fetch_all(&mut conn)
        .await?;
        conn.close().await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(parse_metric_row(&row)?);
        }
        Ok(out)
    }

    /// Every instance id seen in either table, ascending.
    #[instrument(skip(self), fields(repo = "history", operation = "list_known_instances"))]
    pub async fn list_known_instances(&self) -> Result<Vec<String>, StoreError> {
        let mut conn = self.connect().await?;
        let ids = sqlx::query_scalar::<_, String>(
            "SELECT instance_id FROM resources
             UNION
             SELECT instance_id FROM metrics
             ORDER BY instance_id ASC",
        )
        .fetch_all(&mut conn)
        .await?;
        conn.close().await?;
        Ok(ids)
    }

    /// Metric names stored for `instance_id`, ascending.
    #[instrument(skip(self), fields(repo = "history", operation = "list_known_metrics"))]
    pub async fn list_known_metrics(&self, instance_id: &str) -> Result<Vec<String>, StoreError> {
        let mut conn = self.connect().await?;
        let names = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT metric_name FROM metrics WHERE instance_id = $1 ORDER BY metric_name ASC",
        )
        .bind(instance_id)
        .fetch_all(&mut conn)
        .await?;
        conn.close().await?;
        Ok(names)
    }
}

fn parse_resource_row(row: &SqliteRow) -> Result<ResourceSnapshot, StoreError> {
    let timestamp: i64 = row.try_get("timestamp")?;
    Ok(ResourceSnapshot {
        instance_id: row.try_get("instance_id")?,
        engine: row.try_get("engine")?,
        instance_class: row.try_get("instance_class")?,
        status: row.try_get("status")?,
        allocated_storage: row.try_get("allocated_storage")?,
        endpoint: row.try_get("endpoint")?,
        multi_az: row.try_get("multi_az")?,
        publicly_accessible: row.try_get("publicly_accessible")?,
        captured_at: Some(DateTime::<Utc>::from_timestamp_nanos(timestamp)),
    })
}

fn parse_metric_row(row: &SqliteRow) -> Result<MetricSample, StoreError> {
    let timestamp: i64 = row.try_get("timestamp")?;
    Ok(MetricSample {
        instance_id: row.try_get("instance_id")?,
        metric_name: row.try_get("metric_name")?,
        value: row.try_get("value")?,
        sampled_at: DateTime::<Utc>::from_timestamp_nanos(timestamp),
    })
}

/// Unix nanoseconds, the column resolution. Covers 1677-09-21 through 2262-04-11.
fn to_nanos(ts: DateTime<Utc>) -> Result<i64, StoreError> {
    ts.timestamp_nanos_opt().ok_or_else(|| {
        StoreError::Unavailable(sqlx::Error::Encode(
            format!("timestamp out of range: {}", ts).into(),
        ))
    })
}
