//! Application services and ports.

#![forbid(unsafe_code)]

mod activity_log_ports;
mod activity_log_service;
mod error_aggregator;
mod list_query;
mod product_catalog_ports;
mod product_catalog_service;

pub use activity_log_ports::{ActivityFilter, ActivityLogRepository, LogActivityInput};
pub use activity_log_service::ActivityLogService;
pub use error_aggregator::{ERROR_BUFFER_CAPACITY, ErrorAggregator, RECENT_REPORT_COUNT};
pub use product_catalog_ports::{ProductFilter, ProductRepository};
pub use product_catalog_service::ProductCatalogService;
