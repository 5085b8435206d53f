use async_trait::async_trait;

use backoffice_core::{AppResult, Page};
use backoffice_domain::{Product, SubscriptionDuration};

/// Optional constraints narrowing a product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive substring of the product name.
    pub search: Option<String>,
    /// Exact category.
    pub category: Option<String>,
    /// Exact subscription duration.
    pub duration: Option<SubscriptionDuration>,
}

impl ProductFilter {
    /// Returns whether a product satisfies every present constraint.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.search.as_deref().is_none_or(|search| {
            product
                .name
                .to_lowercase()
                .contains(search.to_lowercase().as_str())
        }) && self
            .category
            .as_deref()
            .is_none_or(|category| product.category == category)
            && self
                .duration
                .is_none_or(|duration| product.duration == duration)
    }
}

/// Repository port for the subscription product catalog.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Lists one page of matching products, most recently added first.
    async fn list_products(&self, filter: &ProductFilter, page: Page) -> AppResult<Vec<Product>>;

    /// Counts all products matching the filter.
    async fn count_products(&self, filter: &ProductFilter) -> AppResult<u64>;
}
