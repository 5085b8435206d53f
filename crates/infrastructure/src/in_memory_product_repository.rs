use async_trait::async_trait;
use tokio::sync::RwLock;

use backoffice_application::{ProductFilter, ProductRepository};
use backoffice_core::{AppResult, Page};
use backoffice_domain::Product;

/// In-memory product catalog implementation.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductRepository {
    /// Creates a repository holding the given products.
    #[must_use]
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: RwLock::new(products),
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn list_products(&self, filter: &ProductFilter, page: Page) -> AppResult<Vec<Product>> {
        let products = self.products.read().await;
        let mut matches: Vec<Product> = products
            .iter()
            .filter(|product| filter.matches(product))
            .cloned()
            .collect();
        matches.sort_by(|left, right| {
            right
                .created_at
                .cmp(&left.created_at)
                .then_with(|| right.id.cmp(&left.id))
        });

        Ok(matches
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(page.limit() as usize)
            .collect())
    }

    async fn count_products(&self, filter: &ProductFilter) -> AppResult<u64> {
        let products = self.products.read().await;
        Ok(products
            .iter()
            .filter(|product| filter.matches(product))
            .count() as u64)
    }
}
