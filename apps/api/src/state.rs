use std::sync::Arc;

use backoffice_application::{ActivityLogService, ErrorAggregator, ProductCatalogService};
use sqlx::PgPool;

use crate::api_config::PaginationConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub activity_log_service: ActivityLogService,
    pub product_catalog_service: ProductCatalogService,
    pub error_aggregator: Arc<ErrorAggregator>,
    pub pagination: PaginationConfig,
    /// `None` when the services run on in-memory storage.
    pub postgres_pool: Option<PgPool>,
}
