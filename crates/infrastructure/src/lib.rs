//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod filtered_query;
mod in_memory_activity_log_repository;
mod in_memory_product_repository;
mod postgres_activity_log_repository;
mod postgres_product_repository;

pub use in_memory_activity_log_repository::InMemoryActivityLogRepository;
pub use in_memory_product_repository::InMemoryProductRepository;
pub use postgres_activity_log_repository::PostgresActivityLogRepository;
pub use postgres_product_repository::PostgresProductRepository;

/// Embedded SQL migrations for the back-office schema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
