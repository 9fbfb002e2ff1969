//! SQLite source for the stock-management screen.

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use bistro_core::RecordId;
use bistro_loader::{RecordSource, SourceError, SourceResult};
use bistro_stock::{StockCategory, StockItem, StockUnit};

use crate::error::map_sqlx;
use crate::operations_source::parse_instant;

/// Day-bucketed stock items behind [`RecordSource`].
#[derive(Debug, Clone)]
pub struct SqliteStockSource {
    pool: SqlitePool,
}

impl SqliteStockSource {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a stock item into the bucket of its local day in `tz`.
    pub async fn insert<Tz: TimeZone>(&self, item: &StockItem, tz: &Tz) -> SourceResult<()> {
        let bucket_day = item.updated_at.with_timezone(tz).date_naive();
        sqlx::query(
            r#"
            INSERT INTO stock_items (id, bucket_day, denomination, category, quantity, unit, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(item.id.to_string())
        .bind(bucket_day.to_string())
        .bind(&item.denomination)
        .bind(item.category.as_str())
        .bind(item.quantity)
        .bind(item.unit.as_str())
        .bind(item.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }
}

#[async_trait]
impl RecordSource for SqliteStockSource {
    type Record = StockItem;

    async fn fetch_day(&self, day: NaiveDate) -> SourceResult<Vec<StockItem>> {
        debug!(%day, "fetching stock bucket");
        let rows = sqlx::query(
            r#"
            SELECT id, denomination, category, quantity, unit, updated_at
            FROM stock_items
            WHERE bucket_day = ?1
            "#,
        )
        .bind(day.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        rows.into_iter().map(decode_stock_item).collect()
    }

    async fn fetch_categories(&self) -> SourceResult<Vec<StockCategory>> {
        let rows = sqlx::query("SELECT DISTINCT category FROM stock_items ORDER BY category")
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        rows.into_iter()
            .map(|row| {
                let category: String = row.try_get("category").map_err(map_sqlx)?;
                category
                    .parse::<StockCategory>()
                    .map_err(|e| SourceError::corrupt(e.to_string()))
            })
            .collect()
    }
}

fn decode_stock_item(row: SqliteRow) -> SourceResult<StockItem> {
    let id: String = row.try_get("id").map_err(map_sqlx)?;
    let denomination: String = row.try_get("denomination").map_err(map_sqlx)?;
    let category: String = row.try_get("category").map_err(map_sqlx)?;
    let quantity: i64 = row.try_get("quantity").map_err(map_sqlx)?;
    let unit: String = row.try_get("unit").map_err(map_sqlx)?;
    let updated_at: String = row.try_get("updated_at").map_err(map_sqlx)?;

    Ok(StockItem {
        id: id
            .parse::<RecordId>()
            .map_err(|e| SourceError::corrupt(e.to_string()))?,
        denomination,
        category: category
            .parse::<StockCategory>()
            .map_err(|e| SourceError::corrupt(e.to_string()))?,
        quantity,
        unit: unit
            .parse::<StockUnit>()
            .map_err(|e| SourceError::corrupt(e.to_string()))?,
        updated_at: parse_instant(&updated_at)?,
    })
}
