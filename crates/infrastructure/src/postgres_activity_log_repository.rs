use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use backoffice_application::{ActivityFilter, ActivityLogRepository};
use backoffice_core::{AppError, AppResult, Page};
use backoffice_domain::{ActivityRecord, NewActivityRecord};

use crate::filtered_query::{FilteredQuery, PredicateValue};

#[cfg(test)]
mod tests;

const ACTIVITY_COLUMNS: &str = "id, id_admin, action, description, ip_address, user_agent, created_at";
const ACTIVITY_ORDER: &str = "created_at DESC, id DESC";

/// PostgreSQL-backed repository for the administrator activity log.
#[derive(Clone)]
pub struct PostgresActivityLogRepository {
    pool: PgPool,
}

impl PostgresActivityLogRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ActivityRow {
    id: i64,
    id_admin: i64,
    action: String,
    description: Option<String>,
    ip_address: Option<String>,
    user_agent: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<ActivityRow> for ActivityRecord {
    fn from(row: ActivityRow) -> Self {
        Self {
            id: row.id,
            actor_id: row.id_admin,
            action: row.action,
            description: row.description,
            source_address: row.ip_address,
            agent_string: row.user_agent,
            created_at: row.created_at,
        }
    }
}

fn activity_query(filter: &ActivityFilter) -> FilteredQuery {
    FilteredQuery::new("admin_activity_logs")
        .equals("id_admin", filter.actor_id.map(PredicateValue::Integer))
        .contains("action", filter.action.as_deref())
        .at_least(
            "created_at",
            filter.created_from.map(PredicateValue::Timestamp),
        )
        .at_most("created_at", filter.created_to.map(PredicateValue::Timestamp))
}

#[async_trait]
impl ActivityLogRepository for PostgresActivityLogRepository {
    async fn list_activity(
        &self,
        filter: &ActivityFilter,
        page: Page,
    ) -> AppResult<Vec<ActivityRecord>> {
        let mut builder = activity_query(filter).list_query(ACTIVITY_COLUMNS, ACTIVITY_ORDER, page)?;

        let rows = builder
            .build_query_as::<ActivityRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to list admin activity: {error}"))
            })?;

        Ok(rows.into_iter().map(ActivityRecord::from).collect())
    }

    async fn count_activity(&self, filter: &ActivityFilter) -> AppResult<u64> {
        let mut builder = activity_query(filter).count_query();

        let total = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to count admin activity: {error}"))
            })?;

        u64::try_from(total).map_err(|error| {
            AppError::Internal(format!("invalid admin activity count '{total}': {error}"))
        })
    }

    async fn insert_activity(&self, input: &NewActivityRecord) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO admin_activity_logs (
                id_admin,
                action,
                description,
                ip_address,
                user_agent
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(input.actor_id())
        .bind(input.action().as_str())
        .bind(input.description())
        .bind(input.source_address())
        .bind(input.agent_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to log admin activity: {error}")))
    }

    async fn find_activity(&self, id: i64) -> AppResult<Option<ActivityRecord>> {
        let row = sqlx::query_as::<_, ActivityRow>(
            r#"
            SELECT id, id_admin, action, description, ip_address, user_agent, created_at
            FROM admin_activity_logs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find admin activity '{id}': {error}"))
        })?;

        Ok(row.map(ActivityRecord::from))
    }
}
