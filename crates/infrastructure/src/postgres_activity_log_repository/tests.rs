use backoffice_application::{ActivityFilter, ActivityLogRepository};
use backoffice_core::Page;
use backoffice_domain::NewActivityRecord;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::{PostgresActivityLogRepository, activity_query};
use crate::MIGRATOR;

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres activity log tests: {error}");
    }

    Some(pool)
}

fn page(page: u32, limit: u32) -> Page {
    match Page::new(page, limit) {
        Ok(page) => page,
        Err(error) => panic!("valid page rejected: {error}"),
    }
}

fn new_activity(actor_id: i64, action: &str) -> NewActivityRecord {
    match NewActivityRecord::new(
        Some(actor_id),
        Some(action.to_owned()),
        None,
        Some("127.0.0.1".to_owned()),
        Some("integration-test".to_owned()),
    ) {
        Ok(input) => input,
        Err(error) => panic!("valid activity rejected: {error}"),
    }
}

/// Actor ids unique to one test run so parallel tests do not see each other's rows.
fn unique_actor_id() -> i64 {
    Utc::now().timestamp_micros().rem_euclid(1_000_000_000) + 1_000_000
}

#[test]
fn activity_filter_binds_every_value() {
    let filter = ActivityFilter {
        actor_id: Some(12),
        action: Some("o'brien%".to_owned()),
        created_from: Some(Utc::now()),
        created_to: None,
    };

    let count_query = activity_query(&filter).count_query();
    assert_eq!(
        count_query.sql(),
        "SELECT COUNT(*) FROM admin_activity_logs WHERE id_admin = $1 AND action ILIKE $2 ESCAPE '\\' AND created_at >= $3"
    );
}

#[tokio::test]
async fn inserted_entry_is_read_back_with_store_fields() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresActivityLogRepository::new(pool);
    let actor_id = unique_actor_id();

    let inserted = repository
        .insert_activity(&new_activity(actor_id, "subscription.sold"))
        .await;
    let Ok(id) = inserted else {
        panic!("insert failed");
    };

    let found = repository.find_activity(id).await;
    let Ok(Some(record)) = found else {
        panic!("inserted row not found");
    };
    assert_eq!(record.actor_id, actor_id);
    assert_eq!(record.action, "subscription.sold");
    assert_eq!(record.source_address.as_deref(), Some("127.0.0.1"));
}

#[tokio::test]
async fn list_and_count_agree_under_the_same_filter() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresActivityLogRepository::new(pool);
    let actor_id = unique_actor_id();
    for action in ["login", "subscription.sold", "subscription.sold", "logout"] {
        assert!(
            repository
                .insert_activity(&new_activity(actor_id, action))
                .await
                .is_ok()
        );
    }

    let filter = ActivityFilter {
        actor_id: Some(actor_id),
        action: Some("SOLD".to_owned()),
        created_from: Some(Utc::now() - Duration::hours(1)),
        created_to: None,
    };

    let listed = repository.list_activity(&filter, page(1, 1)).await;
    let counted = repository.count_activity(&filter).await;

    let (Ok(listed), Ok(counted)) = (listed, counted) else {
        panic!("filtered queries failed");
    };
    assert_eq!(listed.len(), 1);
    assert_eq!(counted, 2);
    assert!(listed.iter().all(|record| record.actor_id == actor_id));
}

#[tokio::test]
async fn upper_bound_in_the_past_excludes_new_rows() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresActivityLogRepository::new(pool);
    let actor_id = unique_actor_id();
    assert!(
        repository
            .insert_activity(&new_activity(actor_id, "login"))
            .await
            .is_ok()
    );

    let counted = repository
        .count_activity(&ActivityFilter {
            actor_id: Some(actor_id),
            created_to: Some(Utc::now() - Duration::days(1)),
            ..ActivityFilter::default()
        })
        .await;
    assert_eq!(counted.unwrap_or(u64::MAX), 0);
}
