use async_trait::async_trait;
use chrono::{DateTime, Utc};

use backoffice_core::{AppResult, Page};
use backoffice_domain::{ActivityRecord, NewActivityRecord};

/// Optional constraints narrowing an activity listing.
///
/// Every field defaults to `None`, meaning no constraint on that column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityFilter {
    /// Exact acting administrator.
    pub actor_id: Option<i64>,
    /// Case-insensitive substring of the action identifier.
    pub action: Option<String>,
    /// Inclusive lower bound on the creation time.
    pub created_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the creation time.
    pub created_to: Option<DateTime<Utc>>,
}

impl ActivityFilter {
    /// Returns whether a record satisfies every present constraint.
    #[must_use]
    pub fn matches(&self, record: &ActivityRecord) -> bool {
        self.actor_id
            .is_none_or(|actor_id| record.actor_id == actor_id)
            && self.action.as_deref().is_none_or(|action| {
                record
                    .action
                    .to_lowercase()
                    .contains(action.to_lowercase().as_str())
            })
            && self
                .created_from
                .is_none_or(|created_from| record.created_at >= created_from)
            && self
                .created_to
                .is_none_or(|created_to| record.created_at <= created_to)
    }
}

/// Raw input for appending one activity entry, validated by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogActivityInput {
    /// Acting administrator; required.
    pub actor_id: Option<i64>,
    /// Action identifier; required.
    pub action: Option<String>,
    /// Optional free-text detail.
    pub description: Option<String>,
    /// Optional client network address.
    pub source_address: Option<String>,
    /// Optional client user agent.
    pub agent_string: Option<String>,
}

/// Repository port for the administrator activity log.
#[async_trait]
pub trait ActivityLogRepository: Send + Sync {
    /// Lists one page of matching entries, most recent first.
    async fn list_activity(
        &self,
        filter: &ActivityFilter,
        page: Page,
    ) -> AppResult<Vec<ActivityRecord>>;

    /// Counts all entries matching the filter.
    async fn count_activity(&self, filter: &ActivityFilter) -> AppResult<u64>;

    /// Appends one entry and returns its identifier.
    async fn insert_activity(&self, input: &NewActivityRecord) -> AppResult<i64>;

    /// Finds one entry by identifier.
    async fn find_activity(&self, id: i64) -> AppResult<Option<ActivityRecord>>;
}
