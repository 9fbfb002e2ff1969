//! The fetch contract with the backing store.

use async_trait::async_trait;
use chrono::NaiveDate;

use bistro_core::Record;

use crate::error::SourceResult;

/// Read-only, day-bucketed access to one screen's records.
///
/// Implementations fail with a generic [`crate::SourceError`] on
/// connectivity or permission problems; no retry is built in here.
#[async_trait]
pub trait RecordSource: Send + Sync {
    type Record: Record + Send;

    /// Fetch one calendar day's bucket. An absent bucket is an empty `Vec`,
    /// not an error.
    async fn fetch_day(&self, day: NaiveDate) -> SourceResult<Vec<Self::Record>>;

    /// Fetch the categories available for the screen's category filter.
    async fn fetch_categories(&self)
    -> SourceResult<Vec<<Self::Record as Record>::Category>>;
}
