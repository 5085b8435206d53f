use std::sync::Arc;

use backoffice_core::{AppError, AppResult, ListResult, Page};
use backoffice_domain::{ActivityRecord, NewActivityRecord};

use crate::activity_log_ports::{ActivityFilter, ActivityLogRepository, LogActivityInput};
use crate::list_query::fetch_page;


/// Application service for the administrator activity log.
#[derive(Clone)]
pub struct ActivityLogService {
    repository: Arc<dyn ActivityLogRepository>,
}

impl ActivityLogService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(repository: Arc<dyn ActivityLogRepository>) -> Self {
        Self { repository }
    }

    /// Lists one page of activity together with the filtered total.
    pub async fn list_activity(
        &self,
        filter: ActivityFilter,
        page: Page,
    ) -> AppResult<ListResult<ActivityRecord>> {
        fetch_page(
            page,
            self.repository.list_activity(&filter, page),
            self.repository.count_activity(&filter),
        )
        .await
    }

    /// Validates and appends one entry, then returns it as persisted.
    pub async fn log_activity(&self, input: LogActivityInput) -> AppResult<ActivityRecord> {
        let input = NewActivityRecord::new(
            input.actor_id,
            input.action,
            input.description,
            input.source_address,
            input.agent_string,
        )?;
        let id = self.repository.insert_activity(&input).await?;

        self.repository.find_activity(id).await?.ok_or_else(|| {
            AppError::Internal(format!(
                "activity entry '{id}' was not readable after insert"
            ))
        })
    }
}
