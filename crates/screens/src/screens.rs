//! Concrete screen sessions for the back-office screens.

use chrono::{DateTime, TimeZone};

use bistro_operations::Operation;
use bistro_stock::StockItem;
use bistro_views::{OPERATIONS_PAGE_SIZE, STOCK_PAGE_SIZE};

use crate::session::ScreenSession;

/// The accounting-operations screen (100 records per page).
pub type OperationsScreen = ScreenSession<Operation>;

/// The stock-management screen (50 records per page).
pub type StockScreen = ScreenSession<StockItem>;

/// Session for the accounting-operations screen, anchored to `now`.
pub fn operations_screen<Tz: TimeZone>(now: &DateTime<Tz>) -> OperationsScreen {
    ScreenSession::new_at(OPERATIONS_PAGE_SIZE, now)
}

/// Session for the stock-management screen, anchored to `now`.
pub fn stock_screen<Tz: TimeZone>(now: &DateTime<Tz>) -> StockScreen {
    ScreenSession::new_at(STOCK_PAGE_SIZE, now)
}
