//! Generic screen session: records + criteria + pagination + load lifecycle.

use chrono::{DateTime, TimeZone};
use tracing::{debug, warn};

use bistro_core::{DateRange, DomainResult, PredefinedPeriod, Record, SessionId};
use bistro_loader::{RangeLoad, RecordSource, SourceResult, load_range};
use bistro_views::{FilterCriteria, Pager};

/// Load lifecycle of a screen.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoadPhase {
    /// Nothing requested yet.
    Idle,
    /// A load is in flight; the previous records stay visible.
    Loading,
    /// The last load succeeded (possibly with an empty result).
    Loaded,
    /// The last load failed; `last_error` holds the message and the records
    /// from the previous successful load stay visible.
    Failed,
}

/// Handle for one in-flight load. Only the most recently issued ticket may
/// apply its outcome; completions of superseded loads are discarded.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// What `finish_load` did with an outcome.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoadDisposition {
    /// The outcome was applied to the session.
    Applied,
    /// A newer load had been issued; the outcome was dropped.
    Stale,
}

/// One page of the filtered view, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView<'a, R> {
    pub page: u32,
    pub total_pages: u32,
    /// Size of the whole filtered set, not just this page.
    pub total_records: usize,
    pub records: Vec<&'a R>,
}

/// State container for one filtered, paginated, date-ranged screen.
///
/// All mutation goes through `&mut self` on the driving task; the only
/// concurrency is inside `load_range`, and the [`LoadTicket`] guard makes a
/// late completion harmless.
#[derive(Debug)]
pub struct ScreenSession<R: Record> {
    id: SessionId,
    records: Vec<R>,
    criteria: FilterCriteria<R::Category>,
    pager: Pager,
    phase: LoadPhase,
    last_error: Option<String>,
    days_loaded: usize,
    category_options: Vec<R::Category>,
    next_ticket: u64,
    requested_range: DateRange,
}

impl<R: Record> ScreenSession<R> {
    /// Create a session with default criteria anchored to `now`.
    pub fn new_at<Tz: TimeZone>(page_size: usize, now: &DateTime<Tz>) -> Self {
        let criteria = FilterCriteria::default_at(now);
        let requested_range = criteria.range();
        Self {
            id: SessionId::new(),
            records: Vec::new(),
            criteria,
            pager: Pager::new(page_size),
            phase: LoadPhase::Idle,
            last_error: None,
            days_loaded: 0,
            category_options: Vec::new(),
            next_ticket: 0,
            requested_range,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Distinct calendar days covered by the last successful load.
    pub fn days_loaded(&self) -> usize {
        self.days_loaded
    }

    pub fn criteria(&self) -> &FilterCriteria<R::Category> {
        &self.criteria
    }

    /// Raw records from the last successful load, unfiltered.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Options for the category selector, as fetched from the store.
    pub fn category_options(&self) -> &[R::Category] {
        &self.category_options
    }

    // ---- load lifecycle ----------------------------------------------------

    /// Start a load for `range`. Supersedes any load still in flight.
    pub fn begin_load(&mut self, range: DateRange) -> LoadTicket {
        self.next_ticket += 1;
        self.phase = LoadPhase::Loading;
        self.requested_range = range;
        debug!(session = %self.id, ticket = self.next_ticket, "load started");
        LoadTicket(self.next_ticket)
    }

    /// Apply a load outcome, unless a newer load has been issued since.
    ///
    /// On success the record set is replaced and the current page re-clamped;
    /// on failure the previous records stay visible and `last_error` is set.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        outcome: SourceResult<RangeLoad<R>>,
    ) -> LoadDisposition {
        if ticket.0 != self.next_ticket {
            debug!(
                session = %self.id,
                ticket = ticket.0,
                newest = self.next_ticket,
                "discarding stale load completion"
            );
            return LoadDisposition::Stale;
        }

        match outcome {
            Ok(load) => {
                self.records = load.records;
                self.days_loaded = load.days_loaded;
                self.phase = LoadPhase::Loaded;
                self.last_error = None;
                let count = self.filtered_count();
                self.pager.clamp(count);
                debug!(
                    session = %self.id,
                    records = self.records.len(),
                    days = self.days_loaded,
                    "load applied"
                );
            }
            Err(err) => {
                warn!(session = %self.id, error = %err, "load failed");
                self.phase = LoadPhase::Failed;
                self.last_error = Some(err.to_string());
            }
        }
        LoadDisposition::Applied
    }

    /// The last requested range, for the manual retry action.
    pub fn retry_range(&self) -> DateRange {
        self.requested_range
    }

    /// Drive one full load for the current criteria range.
    pub async fn refresh<S, Tz>(&mut self, source: &S, tz: &Tz) -> LoadDisposition
    where
        S: RecordSource<Record = R>,
        Tz: TimeZone,
    {
        let range = self.criteria.range();
        let ticket = self.begin_load(range);
        let outcome = load_range(source, range, tz).await;
        self.finish_load(ticket, outcome)
    }

    /// Re-fetch the category selector options.
    pub async fn refresh_category_options<S>(&mut self, source: &S) -> SourceResult<()>
    where
        S: RecordSource<Record = R>,
    {
        self.category_options = source.fetch_categories().await?;
        Ok(())
    }

    // ---- criteria (every change resets to page 1) --------------------------

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.criteria.set_search_term(term);
        self.pager.reset();
    }

    pub fn set_category(&mut self, category: Option<R::Category>) {
        self.criteria.set_category(category);
        self.pager.reset();
    }

    pub fn set_amount_min(&mut self, min: Option<i64>) {
        self.criteria.set_amount_min(min);
        self.pager.reset();
    }

    pub fn set_amount_max(&mut self, max: Option<i64>) {
        self.criteria.set_amount_max(max);
        self.pager.reset();
    }

    pub fn set_amount_bounds(&mut self, min: Option<i64>, max: Option<i64>) -> DomainResult<()> {
        self.criteria.set_amount_bounds(min, max)?;
        self.pager.reset();
        Ok(())
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.criteria.set_date_range(range);
        self.pager.reset();
    }

    pub fn set_predefined_period<Tz: TimeZone>(
        &mut self,
        period: PredefinedPeriod,
        now: &DateTime<Tz>,
    ) {
        self.criteria.set_predefined_period(period, now);
        self.pager.reset();
    }

    pub fn reset_filters<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) {
        self.criteria.reset(now);
        self.pager.reset();
    }

    // ---- pagination --------------------------------------------------------

    pub fn current_page(&self) -> u32 {
        self.pager.current()
    }

    pub fn total_pages(&self) -> u32 {
        self.pager.total_pages(self.filtered_count())
    }

    pub fn set_page(&mut self, n: u32) {
        let count = self.filtered_count();
        self.pager.set_page(n, count);
    }

    pub fn next_page(&mut self) {
        let count = self.filtered_count();
        self.pager.next_page(count);
    }

    pub fn previous_page(&mut self) {
        let count = self.filtered_count();
        self.pager.previous_page(count);
    }

    // ---- derived views -----------------------------------------------------

    /// The filtered record set: a pure function of `(records, criteria)`.
    pub fn filtered(&self) -> Vec<&R> {
        self.criteria.filter_records(&self.records)
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered().len()
    }

    /// The current page of the filtered view.
    pub fn page_view(&self) -> PageView<'_, R> {
        let filtered = self.filtered();
        PageView {
            page: self.pager.current(),
            total_pages: self.pager.total_pages(filtered.len()),
            total_records: filtered.len(),
            records: self.pager.slice(&filtered).to_vec(),
        }
    }

    /// A loaded-but-empty view: rendered as "no records found", distinct from
    /// loading and from failure.
    pub fn is_empty_result(&self) -> bool {
        self.phase == LoadPhase::Loaded && self.filtered_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, TimeZone, Utc};

    use bistro_core::RecordId;
    use bistro_loader::{InMemorySource, SourceError};
    use bistro_operations::{Operation, OperationKind};

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }

    fn now() -> DateTime<FixedOffset> {
        tz().with_ymd_and_hms(2024, 5, 17, 14, 0, 0).unwrap()
    }

    fn op(cents: i64, motif: &str) -> Operation {
        Operation {
            id: RecordId::new(),
            kind: OperationKind::Entree,
            amount_cents: cents,
            motif: motif.to_string(),
            occurred_at: now().with_timezone(&Utc),
            recorded_by: None,
        }
    }

    fn ops(count: usize) -> Vec<Operation> {
        (0..count).map(|i| op(100 + i as i64, "service")).collect()
    }

    fn loaded_session(records: Vec<Operation>, page_size: usize) -> ScreenSession<Operation> {
        let mut session = ScreenSession::new_at(page_size, &now());
        let range = session.criteria().range();
        let ticket = session.begin_load(range);
        let days_loaded = range.days(&tz()).len();
        session.finish_load(ticket, Ok(RangeLoad { records, days_loaded }));
        session
    }

    #[test]
    fn successful_load_replaces_records_and_clears_errors() {
        let session = loaded_session(ops(3), 10);
        assert_eq!(session.phase(), LoadPhase::Loaded);
        assert_eq!(session.records().len(), 3);
        assert_eq!(session.days_loaded(), 1);
        assert_eq!(session.last_error(), None);
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut session: ScreenSession<Operation> = ScreenSession::new_at(10, &now());
        let range = session.criteria().range();

        let first = session.begin_load(range);
        let second = session.begin_load(range);

        let disposition = session.finish_load(
            first,
            Ok(RangeLoad { records: ops(5), days_loaded: 1 }),
        );
        assert_eq!(disposition, LoadDisposition::Stale);
        assert!(session.records().is_empty());
        assert!(session.is_loading());

        let disposition = session.finish_load(
            second,
            Ok(RangeLoad { records: ops(2), days_loaded: 1 }),
        );
        assert_eq!(disposition, LoadDisposition::Applied);
        assert_eq!(session.records().len(), 2);
    }

    #[test]
    fn failed_load_keeps_the_previous_records() {
        let mut session = loaded_session(ops(4), 10);

        let ticket = session.begin_load(session.retry_range());
        let disposition =
            session.finish_load(ticket, Err(SourceError::connection("boom")));

        assert_eq!(disposition, LoadDisposition::Applied);
        assert_eq!(session.phase(), LoadPhase::Failed);
        assert_eq!(session.records().len(), 4);
        assert!(session.last_error().unwrap().contains("boom"));
        assert!(!session.is_empty_result());
    }

    #[test]
    fn empty_result_is_loaded_not_failed() {
        let session = loaded_session(Vec::new(), 10);
        assert_eq!(session.phase(), LoadPhase::Loaded);
        assert!(session.is_empty_result());

        let view = session.page_view();
        assert_eq!(view.total_pages, 1);
        assert_eq!(view.page, 1);
        assert!(view.records.is_empty());
    }

    #[test]
    fn every_criteria_change_resets_to_page_one() {
        let mut session = loaded_session(ops(25), 10);

        session.set_page(3);
        assert_eq!(session.current_page(), 3);
        session.set_search_term("service");
        assert_eq!(session.current_page(), 1);

        session.set_page(3);
        session.set_category(None);
        assert_eq!(session.current_page(), 1);

        session.set_page(3);
        session.set_amount_min(Some(1));
        assert_eq!(session.current_page(), 1);

        session.set_page(3);
        session.set_amount_max(Some(100_000));
        assert_eq!(session.current_page(), 1);

        session.set_page(3);
        session.set_predefined_period(PredefinedPeriod::Today, &now());
        assert_eq!(session.current_page(), 1);

        session.set_page(3);
        session.reset_filters(&now());
        assert_eq!(session.current_page(), 1);
    }

    #[test]
    fn shrinking_load_reclamps_the_current_page() {
        let mut session = loaded_session(ops(25), 10);
        session.set_page(3);

        let ticket = session.begin_load(session.retry_range());
        session.finish_load(ticket, Ok(RangeLoad { records: ops(5), days_loaded: 1 }));

        assert_eq!(session.current_page(), 1);
        assert_eq!(session.total_pages(), 1);
    }

    #[test]
    fn page_view_windows_the_filtered_set() {
        let mut session = loaded_session(ops(150), 100);

        let view = session.page_view();
        assert_eq!(view.total_pages, 2);
        assert_eq!(view.total_records, 150);
        assert_eq!(view.records.len(), 100);

        session.next_page();
        let view = session.page_view();
        assert_eq!(view.page, 2);
        assert_eq!(view.records.len(), 50);
    }

    #[tokio::test]
    async fn refresh_drives_a_full_load_cycle() {
        let source = InMemorySource::new(OperationKind::ALL.to_vec());
        for record in ops(3) {
            source.insert(record, &tz());
        }

        let mut session: ScreenSession<Operation> = ScreenSession::new_at(10, &now());
        let disposition = session.refresh(&source, &tz()).await;

        assert_eq!(disposition, LoadDisposition::Applied);
        assert_eq!(session.phase(), LoadPhase::Loaded);
        assert_eq!(session.records().len(), 3);
    }

    #[tokio::test]
    async fn refresh_surfaces_failures_and_retry_succeeds_after_recovery() {
        let source = InMemorySource::new(OperationKind::ALL.to_vec());
        for record in ops(2) {
            source.insert(record, &tz());
        }
        source.fail_day(now().date_naive());

        let mut session: ScreenSession<Operation> = ScreenSession::new_at(10, &now());
        session.refresh(&source, &tz()).await;
        assert_eq!(session.phase(), LoadPhase::Failed);
        assert!(session.last_error().is_some());

        source.clear_failures();
        let range = session.retry_range();
        let ticket = session.begin_load(range);
        let outcome = load_range(&source, range, &tz()).await;
        session.finish_load(ticket, outcome);

        assert_eq!(session.phase(), LoadPhase::Loaded);
        assert_eq!(session.records().len(), 2);
    }

    #[tokio::test]
    async fn category_options_come_from_the_source() {
        let source: InMemorySource<Operation> = InMemorySource::new(OperationKind::ALL.to_vec());
        let mut session: ScreenSession<Operation> = ScreenSession::new_at(10, &now());

        session.refresh_category_options(&source).await.unwrap();
        assert_eq!(session.category_options().to_vec(), OperationKind::ALL.to_vec());
    }
}
