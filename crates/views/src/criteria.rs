//! Filter criteria and the derived filtered view.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use bistro_core::{DateRange, DomainError, DomainResult, PredefinedPeriod, Record};

/// User-chosen constraints narrowing a screen's record set.
///
/// `C` is the screen's closed category enum. `None` for the category means
/// "all". Numeric bounds are typed optionals; free-text bound input goes
/// through [`parse_amount_input`] exactly once at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria<C> {
    search_term: String,
    category: Option<C>,
    amount_min: Option<i64>,
    amount_max: Option<i64>,
    range: DateRange,
    period: Option<PredefinedPeriod>,
}

impl<C: Copy + Eq> FilterCriteria<C> {
    /// Default criteria: category "all", no bounds, empty search, date range
    /// anchored to today in `now`'s timezone.
    pub fn default_at<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        Self {
            search_term: String::new(),
            category: None,
            amount_min: None,
            amount_max: None,
            range: PredefinedPeriod::Today.resolve(now),
            period: Some(PredefinedPeriod::Today),
        }
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn category(&self) -> Option<C> {
        self.category
    }

    pub fn amount_min(&self) -> Option<i64> {
        self.amount_min
    }

    pub fn amount_max(&self) -> Option<i64> {
        self.amount_max
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    /// The predefined period the current range came from, if any. Cleared by
    /// a manual `set_date_range`.
    pub fn period(&self) -> Option<PredefinedPeriod> {
        self.period
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// `None` selects "all".
    pub fn set_category(&mut self, category: Option<C>) {
        self.category = category;
    }

    pub fn set_amount_min(&mut self, min: Option<i64>) {
        self.amount_min = min;
    }

    pub fn set_amount_max(&mut self, max: Option<i64>) {
        self.amount_max = max;
    }

    /// Set both bounds at once. Invariant: `min <= max` when both are set.
    pub fn set_amount_bounds(&mut self, min: Option<i64>, max: Option<i64>) -> DomainResult<()> {
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return Err(DomainError::validation(format!(
                    "amount bounds inverted: min {lo} > max {hi}"
                )));
            }
        }
        self.amount_min = min;
        self.amount_max = max;
        Ok(())
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.range = range;
        self.period = None;
    }

    /// Expand a named period relative to `now` and apply it as the range.
    pub fn set_predefined_period<Tz: TimeZone>(
        &mut self,
        period: PredefinedPeriod,
        now: &DateTime<Tz>,
    ) {
        self.range = period.resolve(now);
        self.period = Some(period);
    }

    /// Restore defaults: category "all", bounds and search cleared, range
    /// back to today.
    pub fn reset<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) {
        *self = Self::default_at(now);
    }

    /// Whether `record` passes every active predicate.
    ///
    /// Predicates are AND-combined in a fixed order: category, amount
    /// containment, case-insensitive substring search, date containment
    /// (inclusive).
    pub fn matches<R>(&self, record: &R) -> bool
    where
        R: Record<Category = C>,
    {
        self.matches_with_needle(record, &self.search_term.to_lowercase())
    }

    /// Derive the filtered view: a pure function of `(records, self)`.
    /// Returns borrows in input order; never adds a record.
    pub fn filter_records<'a, R>(&self, records: &'a [R]) -> Vec<&'a R>
    where
        R: Record<Category = C>,
    {
        let needle = self.search_term.to_lowercase();
        records
            .iter()
            .filter(|r| self.matches_with_needle(*r, &needle))
            .collect()
    }

    fn matches_with_needle<R>(&self, record: &R, needle: &str) -> bool
    where
        R: Record<Category = C>,
    {
        if let Some(category) = self.category {
            if record.category() != category {
                return false;
            }
        }

        let amount = record.amount();
        if let Some(min) = self.amount_min {
            if amount < min {
                return false;
            }
        }
        if let Some(max) = self.amount_max {
            if amount > max {
                return false;
            }
        }

        if !needle.is_empty() && !record.search_text().to_lowercase().contains(needle) {
            return false;
        }

        self.range.contains(record.occurred_at())
    }
}

/// Parse a free-text amount field into a typed bound.
///
/// Empty or non-numeric input means "unbounded" (`None`), never an error:
/// a half-typed bound must not reject the form.
pub fn parse_amount_input(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|cents| *cents >= 0)
}
