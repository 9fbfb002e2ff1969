//! Per-screen state containers.
//!
//! One [`ScreenSession`] instance per active screen, explicitly constructed
//! and passed to whoever drives it. Never a module-level singleton: two open
//! screens (or two terminals) must not leak state into each other.

pub mod screens;
pub mod session;

pub use screens::{OperationsScreen, StockScreen, operations_screen, stock_screen};
pub use session::{LoadDisposition, LoadPhase, LoadTicket, PageView, ScreenSession};
