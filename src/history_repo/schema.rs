// Table layout for the history store. Migrations only add or convert: init never drops data.
//
// v1: resources / metrics with INTEGER unix-millisecond timestamps.
// v2: timestamps in unix nanoseconds; resources.store_stamped marks rows whose
//     timestamp the store assigned at write time.

use sqlx::{Connection, SqliteConnection};
use tracing::info;

const SCHEMA_VERSION: i64 = 2;

pub(super) async fn create_tables(conn: &mut SqliteConnection) -> sqlx::Result<()> {
    let mut tx = conn.begin().await?;

    sqlx::query("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY)")
        .execute(&mut *tx)
        .await?;
    let current: i64 = sqlx::query_scalar::<_, Option<i64>>("SELECT MAX(version) FROM schema_version")
        .fetch_one(&mut *tx)
        .await?
        .unwrap_or(0);

    if current >= SCHEMA_VERSION {
        tx.commit().await?;
        return Ok(());
    }
    info!(from = current, to = SCHEMA_VERSION, "migrating history schema");

    if current < 1 {
        migrate_to_v1(&mut *tx).await?;
    }
    if current < 2 {
        migrate_to_v2(&mut *tx).await?;
    }

    sqlx::query("DELETE FROM schema_version")
        .execute(&mut *tx)
        .await?;
    sqlx::query("INSERT INTO schema_version (version) VALUES ($1)")
        .bind(SCHEMA_VERSION)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

/// Base tables. IF NOT EXISTS, so databases written before versioning keep their rows.
async fn migrate_to_v1(conn: &mut SqliteConnection) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS resources (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            instance_id TEXT NOT NULL,
            engine TEXT NOT NULL,
            instance_class TEXT NOT NULL,
            status TEXT NOT NULL,
            allocated_storage INTEGER NOT NULL,
            endpoint TEXT,
            multi_az INTEGER NOT NULL,
            publicly_accessible INTEGER NOT NULL,
            timestamp INTEGER NOT NULL
        )
        "#,
    )
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS metrics (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            instance_id TEXT NOT NULL,
            metric_name TEXT NOT NULL,
            value REAL NOT NULL,
            timestamp INTEGER NOT NULL
        )
        "#,
    )
    .execute(&mut *conn)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_resources_timestamp ON resources(timestamp)")
        .execute(&mut *conn)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_resources_instance_id ON resources(instance_id)")
        .execute(&mut *conn)
        .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_metrics_series ON metrics(instance_id, metric_name, timestamp)",
    )
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Millisecond timestamps become nanoseconds. Existing resource rows count as
/// store-stamped so the write-time floor carries over.
async fn migrate_to_v2(conn: &mut SqliteConnection) -> sqlx::Result<()> {
    sqlx::query("UPDATE resources SET timestamp = timestamp * 1000000")
        .execute(&mut *conn)
        .await?;
    sqlx::query("UPDATE metrics SET timestamp = timestamp * 1000000")
        .execute(&mut *conn)
        .await?;

    sqlx::query("ALTER TABLE resources ADD COLUMN store_stamped INTEGER NOT NULL DEFAULT 0")
        .execute(&mut *conn)
        .await?;
    sqlx::query("UPDATE resources SET store_stamped = 1")
        .execute(&mut *conn)
        .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_resources_store_stamped ON resources(store_stamped, timestamp)",
    )
    .execute(&mut *conn)
    .await?;

    Ok(())
}
