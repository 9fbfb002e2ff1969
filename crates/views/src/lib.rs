//! Filtered, paginated views over in-memory record sets.
//!
//! Everything here is a pure function of `(records, criteria)`: no IO and
//! no hidden state. Loading is the `bistro-loader` crate's job; holding the
//! pieces together per screen is `bistro-screens`.

pub mod criteria;
pub mod page;

pub use criteria::{FilterCriteria, parse_amount_input};
pub use page::{OPERATIONS_PAGE_SIZE, Pager, STOCK_PAGE_SIZE};
