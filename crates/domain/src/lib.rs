//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod activity;
mod diagnostics;
mod metrics;
mod product;

pub use activity::{ActivityRecord, NewActivityRecord};
pub use diagnostics::{ErrorHint, ErrorKind, ErrorReport, ErrorSummary};
pub use metrics::{StockStatus, sale_price, stock_status};
pub use product::{Product, SubscriptionDuration};
