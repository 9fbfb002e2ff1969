//! In-memory day-bucketed source.
//!
//! Intended for tests/dev. Supports per-day failure injection so callers can
//! exercise the all-or-nothing load semantics.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone};

use bistro_core::Record;

use crate::error::{SourceError, SourceResult};
use crate::source::RecordSource;

pub struct InMemorySource<R: Record> {
    buckets: RwLock<HashMap<NaiveDate, Vec<R>>>,
    categories: Vec<R::Category>,
    failing_days: RwLock<HashSet<NaiveDate>>,
}

impl<R: Record> InMemorySource<R> {
    pub fn new(categories: Vec<R::Category>) -> Self {
        Self {
            buckets: RwLock::new(HashMap::new()),
            categories,
            failing_days: RwLock::new(HashSet::new()),
        }
    }

    /// Insert a record into the bucket of its local calendar day in `tz`.
    pub fn insert<Tz: TimeZone>(&self, record: R, tz: &Tz) {
        let day = record.occurred_at().with_timezone(tz).date_naive();
        let mut buckets = self.buckets.write().expect("bucket lock poisoned");
        buckets.entry(day).or_default().push(record);
    }

    /// Make every subsequent fetch of `day` fail with a connection error.
    pub fn fail_day(&self, day: NaiveDate) {
        let mut failing = self.failing_days.write().expect("failure lock poisoned");
        failing.insert(day);
    }

    /// Clear all injected failures.
    pub fn clear_failures(&self) {
        let mut failing = self.failing_days.write().expect("failure lock poisoned");
        failing.clear();
    }
}

#[async_trait]
impl<R> RecordSource for InMemorySource<R>
where
    R: Record + Clone + Send + Sync,
{
    type Record = R;

    async fn fetch_day(&self, day: NaiveDate) -> SourceResult<Vec<R>> {
        let failing = self
            .failing_days
            .read()
            .map_err(|_| SourceError::backend("failure lock poisoned"))?;
        if failing.contains(&day) {
            return Err(SourceError::connection(format!(
                "injected failure for {day}"
            )));
        }
        drop(failing);

        let buckets = self
            .buckets
            .read()
            .map_err(|_| SourceError::backend("bucket lock poisoned"))?;
        Ok(buckets.get(&day).cloned().unwrap_or_default())
    }

    async fn fetch_categories(&self) -> SourceResult<Vec<R::Category>> {
        Ok(self.categories.clone())
    }
}
