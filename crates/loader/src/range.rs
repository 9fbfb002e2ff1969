//! Concurrent date-range loading with a deterministic merge.

use chrono::TimeZone;
use futures_util::future;
use tracing::debug;

use bistro_core::{DateRange, Record};

use crate::error::SourceResult;
use crate::source::RecordSource;

/// Result of a range load: the merged records plus how many distinct
/// calendar days were queried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeLoad<R> {
    pub records: Vec<R>,
    pub days_loaded: usize,
}

/// Load every record whose occurrence instant falls within `range`.
///
/// The range is partitioned into calendar-day buckets in `tz`; all buckets
/// are fetched concurrently and the load is all-or-nothing: a single failed
/// day fails the whole call, with no partial result.
///
/// The merge is deterministic: records are sorted by `(occurred_at, id)`,
/// so the output never depends on fetch completion order. Records sitting
/// in an edge bucket but outside the instant bounds are trimmed.
pub async fn load_range<S, Tz>(
    source: &S,
    range: DateRange,
    tz: &Tz,
) -> SourceResult<RangeLoad<S::Record>>
where
    S: RecordSource,
    Tz: TimeZone,
{
    let days = range.days(tz);
    debug!(days = days.len(), "loading date range");

    let buckets = future::try_join_all(days.iter().map(|day| source.fetch_day(*day))).await?;

    let mut records: Vec<S::Record> = buckets
        .into_iter()
        .flatten()
        .filter(|record| range.contains(record.occurred_at()))
        .collect();
    records.sort_by_key(|record| (record.occurred_at(), record.id()));

    debug!(records = records.len(), days = days.len(), "date range loaded");
    Ok(RangeLoad {
        records,
        days_loaded: days.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

    use bistro_core::RecordId;
    use bistro_operations::{Operation, OperationKind};

    use crate::error::SourceError;
    use crate::memory::InMemorySource;

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn op_on(d: u32, hour: u32, cents: i64) -> Operation {
        let at: DateTime<Utc> = tz()
            .with_ymd_and_hms(2024, 5, d, hour, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        Operation {
            id: RecordId::new(),
            kind: OperationKind::Entree,
            amount_cents: cents,
            motif: format!("jour {d}"),
            occurred_at: at,
            recorded_by: None,
        }
    }

    fn source_with(ops: &[Operation]) -> InMemorySource<Operation> {
        let source = InMemorySource::new(OperationKind::ALL.to_vec());
        for op in ops {
            source.insert(op.clone(), &tz());
        }
        source
    }

    #[tokio::test]
    async fn merges_buckets_and_counts_days() {
        let ops = vec![op_on(16, 9, 100), op_on(17, 9, 200), op_on(18, 9, 300)];
        let source = source_with(&ops);
        let range = DateRange::over_days(day(16), day(18), &tz());

        let load = load_range(&source, range, &tz()).await.unwrap();
        assert_eq!(load.days_loaded, 3);
        assert_eq!(load.records.len(), 3);
    }

    #[tokio::test]
    async fn empty_days_still_count_as_loaded() {
        let source = source_with(&[op_on(16, 9, 100)]);
        let range = DateRange::over_days(day(16), day(18), &tz());

        let load = load_range(&source, range, &tz()).await.unwrap();
        assert_eq!(load.days_loaded, 3);
        assert_eq!(load.records.len(), 1);
    }

    #[tokio::test]
    async fn merge_is_independent_of_insertion_order() {
        let ops = vec![
            op_on(16, 9, 100),
            op_on(16, 18, 150),
            op_on(17, 7, 200),
            op_on(18, 12, 300),
        ];
        let mut reversed = ops.clone();
        reversed.reverse();

        let range = DateRange::over_days(day(16), day(18), &tz());
        let forward = load_range(&source_with(&ops), range, &tz()).await.unwrap();
        let backward = load_range(&source_with(&reversed), range, &tz()).await.unwrap();

        assert_eq!(forward, backward);
        let mut sorted = forward.records.clone();
        sorted.sort_by_key(|r| (r.occurred_at, r.id));
        assert_eq!(forward.records, sorted);
    }

    #[tokio::test]
    async fn single_failing_day_fails_the_whole_load() {
        let source = source_with(&[op_on(16, 9, 100), op_on(18, 9, 300)]);
        source.fail_day(day(17));
        let range = DateRange::over_days(day(16), day(18), &tz());

        let err = load_range(&source, range, &tz()).await.unwrap_err();
        assert!(matches!(err, SourceError::Connection(_)));
    }

    #[tokio::test]
    async fn edge_bucket_records_outside_the_instant_bounds_are_trimmed() {
        let early = op_on(16, 8, 100);
        let late = op_on(16, 15, 200);
        let source = source_with(&[early.clone(), late.clone()]);

        let start = tz()
            .with_ymd_and_hms(2024, 5, 16, 12, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let end = tz()
            .with_ymd_and_hms(2024, 5, 16, 23, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let range = DateRange::new(start, end).unwrap();

        let load = load_range(&source, range, &tz()).await.unwrap();
        assert_eq!(load.days_loaded, 1);
        assert_eq!(load.records, vec![late]);
    }
}
