//! sqlx-to-source error mapping.

use bistro_loader::SourceError;

/// Map a database error onto the fetch-boundary taxonomy.
pub fn map_sqlx(err: sqlx::Error) -> SourceError {
    match err {
        sqlx::Error::Io(e) => SourceError::connection(e.to_string()),
        sqlx::Error::PoolTimedOut => SourceError::connection("connection pool timed out"),
        sqlx::Error::PoolClosed => SourceError::connection("connection pool closed"),
        sqlx::Error::ColumnDecode { .. } => SourceError::corrupt(err.to_string()),
        other => SourceError::backend(other.to_string()),
    }
}
