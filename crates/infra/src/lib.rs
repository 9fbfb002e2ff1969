//! SQLite-backed record sources.
//!
//! The backing store keeps one bucket per local calendar day (`bucket_day`,
//! `YYYY-MM-DD`, indexed), so a day fetch is a single indexed query. All
//! queries use the runtime `sqlx::query` API.

pub mod error;
pub mod operations_source;
pub mod schema;
pub mod stock_source;


pub use error::map_sqlx;
pub use operations_source::SqliteOperationSource;
pub use schema::init_schema;
pub use stock_source::SqliteStockSource;
