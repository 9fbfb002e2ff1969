//! Accounting-operations domain module.
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod operation;

pub use operation::{Operation, OperationKind, TreasuryTotals};
