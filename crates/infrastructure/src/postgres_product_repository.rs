use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tracing::warn;

use backoffice_application::{ProductFilter, ProductRepository};
use backoffice_core::{AppError, AppResult, Page};
use backoffice_domain::{Product, SubscriptionDuration};

use crate::filtered_query::{FilteredQuery, PredicateValue};

const PRODUCT_COLUMNS: &str = "id, name, category, duration, stock, alert_threshold, purchase_cost, margin_percent, created_at";
const PRODUCT_ORDER: &str = "created_at DESC, id DESC";

/// PostgreSQL-backed repository for the subscription product catalog.
#[derive(Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    category: String,
    duration: String,
    stock: i32,
    alert_threshold: i32,
    purchase_cost: Option<Decimal>,
    margin_percent: Option<Decimal>,
    created_at: DateTime<Utc>,
}

fn product_from_row(row: ProductRow) -> AppResult<Product> {
    let duration = SubscriptionDuration::from_str(row.duration.as_str()).map_err(|error| {
        AppError::Internal(format!(
            "invalid stored duration for product '{}': {error}",
            row.id
        ))
    })?;
    let stock = u32::try_from(row.stock).map_err(|error| {
        AppError::Internal(format!("invalid stored stock for product '{}': {error}", row.id))
    })?;
    let alert_threshold = u32::try_from(row.alert_threshold).map_err(|error| {
        AppError::Internal(format!(
            "invalid stored alert threshold for product '{}': {error}",
            row.id
        ))
    })?;

    Ok(Product {
        id: row.id,
        name: row.name,
        category: row.category,
        duration,
        stock,
        alert_threshold,
        purchase_cost: non_negative_or_zero(row.id, "purchase_cost", row.purchase_cost),
        margin_percent: non_negative_or_zero(row.id, "margin_percent", row.margin_percent),
        created_at: row.created_at,
    })
}

/// Pricing inputs that are missing or negative count as zero.
fn non_negative_or_zero(product_id: i64, field: &'static str, value: Option<Decimal>) -> Decimal {
    match value {
        Some(value) if value.is_sign_negative() => {
            warn!(product_id, field, %value, "negative pricing input stored, using zero");
            Decimal::ZERO
        }
        Some(value) => value,
        None => Decimal::ZERO,
    }
}

fn product_query(filter: &ProductFilter) -> FilteredQuery {
    FilteredQuery::new("products")
        .contains("name", filter.search.as_deref())
        .equals(
            "category",
            filter.category.clone().map(PredicateValue::Text),
        )
        .equals(
            "duration",
            filter
                .duration
                .map(|duration| PredicateValue::Text(duration.as_str().to_owned())),
        )
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn list_products(&self, filter: &ProductFilter, page: Page) -> AppResult<Vec<Product>> {
        let mut builder = product_query(filter).list_query(PRODUCT_COLUMNS, PRODUCT_ORDER, page)?;

        let rows = builder
            .build_query_as::<ProductRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list products: {error}")))?;

        rows.into_iter().map(product_from_row).collect()
    }

    async fn count_products(&self, filter: &ProductFilter) -> AppResult<u64> {
        let mut builder = product_query(filter).count_query();

        let total = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to count products: {error}")))?;

        u64::try_from(total).map_err(|error| {
            AppError::Internal(format!("invalid product count '{total}': {error}"))
        })
    }
}
