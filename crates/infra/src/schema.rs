//! Idempotent schema bootstrap.

use sqlx::SqlitePool;

use bistro_loader::SourceResult;

use crate::error::map_sqlx;

/// Create the day-bucketed tables and their indexes if missing.
pub async fn init_schema(pool: &SqlitePool) -> SourceResult<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS operations (
            id           TEXT PRIMARY KEY,
            bucket_day   TEXT NOT NULL,
            kind         TEXT NOT NULL,
            amount_cents INTEGER NOT NULL,
            motif        TEXT NOT NULL,
            occurred_at  TEXT NOT NULL,
            recorded_by  TEXT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(map_sqlx)?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_operations_bucket_day ON operations(bucket_day)")
        .execute(pool)
        .await
        .map_err(map_sqlx)?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS stock_items (
            id           TEXT PRIMARY KEY,
            bucket_day   TEXT NOT NULL,
            denomination TEXT NOT NULL,
            category     TEXT NOT NULL,
            quantity     INTEGER NOT NULL,
            unit         TEXT NOT NULL,
            updated_at   TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(map_sqlx)?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_stock_items_bucket_day ON stock_items(bucket_day)")
        .execute(pool)
        .await
        .map_err(map_sqlx)?;

    Ok(())
}
