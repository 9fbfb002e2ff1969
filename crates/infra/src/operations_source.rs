//! SQLite source for the accounting-operations screen.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use bistro_core::RecordId;
use bistro_loader::{RecordSource, SourceError, SourceResult};
use bistro_operations::{Operation, OperationKind};

use crate::error::map_sqlx;

/// Day-bucketed operations behind [`RecordSource`].
#[derive(Debug, Clone)]
pub struct SqliteOperationSource {
    pool: SqlitePool,
}

impl SqliteOperationSource {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert an operation into the bucket of its local day in `tz`.
    /// Seeding/back-office write path; the screens only read.
    pub async fn insert<Tz: TimeZone>(&self, op: &Operation, tz: &Tz) -> SourceResult<()> {
        let bucket_day = op.occurred_at.with_timezone(tz).date_naive();
        sqlx::query(
            r#"
            INSERT INTO operations (id, bucket_day, kind, amount_cents, motif, occurred_at, recorded_by)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(op.id.to_string())
        .bind(bucket_day.to_string())
        .bind(op.kind.as_str())
        .bind(op.amount_cents)
        .bind(&op.motif)
        .bind(op.occurred_at.to_rfc3339())
        .bind(op.recorded_by.as_deref())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }
}

#[async_trait]
impl RecordSource for SqliteOperationSource {
    type Record = Operation;

    async fn fetch_day(&self, day: NaiveDate) -> SourceResult<Vec<Operation>> {
        debug!(%day, "fetching operations bucket");
        let rows = sqlx::query(
            r#"
            SELECT id, kind, amount_cents, motif, occurred_at, recorded_by
            FROM operations
            WHERE bucket_day = ?1
            "#,
        )
        .bind(day.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        rows.into_iter().map(decode_operation).collect()
    }

    async fn fetch_categories(&self) -> SourceResult<Vec<OperationKind>> {
        let rows = sqlx::query("SELECT DISTINCT kind FROM operations ORDER BY kind")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        rows.into_iter()
            .map(|row| {
                let kind: String = row.try_get("kind").map_err(map_sqlx)?;
                kind.parse::<OperationKind>()
                    .map_err(|e| SourceError::corrupt(e.to_string()))
            })
            .collect()
    }
}

fn decode_operation(row: SqliteRow) -> SourceResult<Operation> {
    let id: String = row.try_get("id").map_err(map_sqlx)?;
    let kind: String = row.try_get("kind").map_err(map_sqlx)?;
    let amount_cents: i64 = row.try_get("amount_cents").map_err(map_sqlx)?;
    let motif: String = row.try_get("motif").map_err(map_sqlx)?;
    let occurred_at: String = row.try_get("occurred_at").map_err(map_sqlx)?;
    let recorded_by: Option<String> = row.try_get("recorded_by").map_err(map_sqlx)?;

    Ok(Operation {
        id: id
            .parse::<RecordId>()
            .map_err(|e| SourceError::corrupt(e.to_string()))?,
        kind: kind
            .parse::<OperationKind>()
            .map_err(|e| SourceError::corrupt(e.to_string()))?,
        amount_cents,
        motif,
        occurred_at: parse_instant(&occurred_at)?,
        recorded_by,
    })
}

pub(crate) fn parse_instant(raw: &str) -> SourceResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| SourceError::corrupt(format!("bad timestamp {raw:?}: {e}")))
}
