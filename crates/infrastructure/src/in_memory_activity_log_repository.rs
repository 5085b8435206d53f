use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use backoffice_application::{ActivityFilter, ActivityLogRepository};
use backoffice_core::{AppResult, Page};
use backoffice_domain::{ActivityRecord, NewActivityRecord};

/// In-memory activity log implementation.
#[derive(Debug, Default)]
pub struct InMemoryActivityLogRepository {
    records: RwLock<Vec<ActivityRecord>>,
}

impl InMemoryActivityLogRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Creates a repository holding the given entries as already persisted.
    #[must_use]
    pub fn with_records(records: Vec<ActivityRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    async fn sorted_matches(&self, filter: &ActivityFilter) -> Vec<ActivityRecord> {
        let records = self.records.read().await;
        let mut matches: Vec<ActivityRecord> = records
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        matches.sort_by(|left, right| {
            right
                .created_at
                .cmp(&left.created_at)
                .then_with(|| right.id.cmp(&left.id))
        });
        matches
    }
}

#[async_trait]
impl ActivityLogRepository for InMemoryActivityLogRepository {
    async fn list_activity(
        &self,
        filter: &ActivityFilter,
        page: Page,
    ) -> AppResult<Vec<ActivityRecord>> {
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);

        Ok(self
            .sorted_matches(filter)
            .await
            .into_iter()
            .skip(offset)
            .take(page.limit() as usize)
            .collect())
    }

    async fn count_activity(&self, filter: &ActivityFilter) -> AppResult<u64> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|record| filter.matches(record)).count() as u64)
    }

    async fn insert_activity(&self, input: &NewActivityRecord) -> AppResult<i64> {
        let mut records = self.records.write().await;
        let id = records.iter().map(|record| record.id).max().unwrap_or(0) + 1;

        records.push(ActivityRecord {
            id,
            actor_id: input.actor_id(),
            action: input.action().as_str().to_owned(),
            description: input.description().map(str::to_owned),
            source_address: input.source_address().map(str::to_owned),
            agent_string: input.agent_string().map(str::to_owned),
            created_at: Utc::now(),
        });

        Ok(id)
    }

    async fn find_activity(&self, id: i64) -> AppResult<Option<ActivityRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|record| record.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use backoffice_application::{ActivityFilter, ActivityLogRepository};
    use backoffice_core::Page;
    use backoffice_domain::ActivityRecord;

    use super::InMemoryActivityLogRepository;

    #[tokio::test]
    async fn lists_most_recent_first_with_ties_broken_by_id() {
        let now = Utc::now();
        let record = |id: i64, minutes_ago: i64| ActivityRecord {
            id,
            actor_id: 1,
            action: "login".to_owned(),
            description: None,
            source_address: None,
            agent_string: None,
            created_at: now - Duration::minutes(minutes_ago),
        };
        let repository = InMemoryActivityLogRepository::with_records(vec![
            record(1, 10),
            record(2, 0),
            record(3, 10),
        ]);

        let Ok(page) = Page::new(1, 10) else {
            panic!("valid page rejected");
        };
        let listed = repository
            .list_activity(&ActivityFilter::default(), page)
            .await
            .unwrap_or_default();
        let ids: Vec<i64> = listed.iter().map(|record| record.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
