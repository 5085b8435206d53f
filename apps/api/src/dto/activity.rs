use backoffice_domain::ActivityRecord;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for logging one administrator action.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/log-activity-request.ts"
)]
pub struct LogActivityRequest {
    #[ts(type = "number | null")]
    pub id_admin: Option<i64>,
    pub action: Option<String>,
    pub description: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// API representation of an activity log entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/activity-record-response.ts"
)]
pub struct ActivityRecordResponse {
    #[ts(type = "number")]
    pub id: i64,
    #[ts(type = "number")]
    pub id_admin: i64,
    pub action: String,
    pub description: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: String,
}

impl From<ActivityRecord> for ActivityRecordResponse {
    fn from(value: ActivityRecord) -> Self {
        Self {
            id: value.id,
            id_admin: value.actor_id,
            action: value.action,
            description: value.description,
            ip_address: value.source_address,
            user_agent: value.agent_string,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}
