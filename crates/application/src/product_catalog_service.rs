use std::sync::Arc;

use backoffice_core::{AppResult, ListResult, Page};
use backoffice_domain::Product;

use crate::list_query::fetch_page;
use crate::product_catalog_ports::{ProductFilter, ProductRepository};

/// Application service for browsing subscription inventory.
#[derive(Clone)]
pub struct ProductCatalogService {
    repository: Arc<dyn ProductRepository>,
}

impl ProductCatalogService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    /// Lists one page of products together with the filtered total.
    pub async fn list_products(
        &self,
        filter: ProductFilter,
        page: Page,
    ) -> AppResult<ListResult<Product>> {
        fetch_page(
            page,
            self.repository.list_products(&filter, page),
            self.repository.count_products(&filter),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal::Decimal;

    use backoffice_core::{AppResult, Page};
    use backoffice_domain::{Product, StockStatus, SubscriptionDuration};

    use super::ProductCatalogService;
    use crate::product_catalog_ports::{ProductFilter, ProductRepository};

    struct FakeProductRepository {
        products: Vec<Product>,
    }

    #[async_trait]
    impl ProductRepository for FakeProductRepository {
        async fn list_products(
            &self,
            filter: &ProductFilter,
            page: Page,
        ) -> AppResult<Vec<Product>> {
            Ok(self
                .products
                .iter()
                .filter(|product| filter.matches(product))
                .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
                .take(page.limit() as usize)
                .cloned()
                .collect())
        }

        async fn count_products(&self, filter: &ProductFilter) -> AppResult<u64> {
            Ok(self
                .products
                .iter()
                .filter(|product| filter.matches(product))
                .count() as u64)
        }
    }

    fn product(id: i64, name: &str, duration: SubscriptionDuration, stock: u32) -> Product {
        Product {
            id,
            name: name.to_owned(),
            category: "standard".to_owned(),
            duration,
            stock,
            alert_threshold: 5,
            purchase_cost: Decimal::from(10),
            margin_percent: Decimal::from(30),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn lists_products_with_derived_metrics() {
        let service = ProductCatalogService::new(Arc::new(FakeProductRepository {
            products: vec![
                product(1, "Starter 1M", SubscriptionDuration::OneMonth, 0),
                product(2, "Starter 3M", SubscriptionDuration::ThreeMonths, 4),
                product(3, "Family 12M", SubscriptionDuration::TwelveMonths, 40),
            ],
        }));

        let Ok(page) = Page::new(1, 10) else {
            panic!("valid page rejected");
        };
        let result = service
            .list_products(
                ProductFilter {
                    search: Some("starter".to_owned()),
                    ..ProductFilter::default()
                },
                page,
            )
            .await;

        let Ok(result) = result else {
            panic!("listing failed");
        };
        assert_eq!(result.total(), 2);
        let statuses: Vec<StockStatus> = result
            .items()
            .iter()
            .map(Product::stock_status)
            .collect();
        assert_eq!(statuses, vec![StockStatus::Out, StockStatus::Low]);
        assert!(
            result
                .items()
                .iter()
                .all(|product| product.sale_price() == Decimal::from(13))
        );
    }

    #[tokio::test]
    async fn duration_filter_is_exact() {
        let service = ProductCatalogService::new(Arc::new(FakeProductRepository {
            products: vec![
                product(1, "Weekly pass", SubscriptionDuration::OneWeek, 9),
                product(2, "Starter 1M", SubscriptionDuration::OneMonth, 9),
            ],
        }));

        let Ok(page) = Page::new(1, 10) else {
            panic!("valid page rejected");
        };
        let result = service
            .list_products(
                ProductFilter {
                    duration: Some(SubscriptionDuration::OneWeek),
                    ..ProductFilter::default()
                },
                page,
            )
            .await;

        let Ok(result) = result else {
            panic!("listing failed");
        };
        assert_eq!(result.total(), 1);
        assert_eq!(result.items()[0].name, "Weekly pass");
    }
}
