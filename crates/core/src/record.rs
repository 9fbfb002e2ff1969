//! Record trait: the common surface every screen's entity exposes to the
//! filtering, pagination and loading layers.

use chrono::{DateTime, Utc};

use crate::id::RecordId;

/// A business record fetched from the backing store.
///
/// Records are immutable once fetched into a session; a screen only replaces
/// its record set by re-fetching.
pub trait Record {
    /// Closed categorical kind of the record (e.g. entree/sortie for an
    /// accounting operation). Categories cross task boundaries during loads,
    /// hence the thread-safety bounds.
    type Category: Copy + Eq + core::fmt::Debug + Send + Sync + 'static;

    /// Returns the record identifier.
    fn id(&self) -> RecordId;

    /// Occurrence instant of the record (creation date for operations, last
    /// movement for stock items).
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Numeric magnitude: cents for monetary records, units for quantities.
    fn amount(&self) -> i64;

    /// The designated free-text field searched by the text filter
    /// (motif, denomination, ...).
    fn search_text(&self) -> &str;

    /// Returns the record's category.
    fn category(&self) -> Self::Category;
}
