use std::collections::BTreeMap;

use backoffice_domain::{ErrorReport, ErrorSummary};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

/// Failure reported by a client for operator inspection.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/client-error-report-request.ts"
)]
pub struct ClientErrorReportRequest {
    pub message: Option<String>,
    pub stack: Option<String>,
    pub source_url: Option<String>,
    #[ts(type = "\"runtime\" | \"rejectedPromise\" | \"componentFailure\" | null")]
    pub kind: Option<String>,
    #[ts(type = "Record<string, unknown> | null")]
    pub context: Option<Value>,
}

/// API representation of a captured failure.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-report-response.ts"
)]
pub struct ErrorReportResponse {
    pub message: String,
    pub stack: Option<String>,
    pub source_url: String,
    pub timestamp: String,
    pub agent_string: String,
    #[ts(type = "\"runtime\" | \"rejectedPromise\" | \"componentFailure\"")]
    pub kind: String,
    pub hint: String,
    #[ts(type = "Record<string, unknown> | null")]
    pub context: Option<Value>,
}

impl From<ErrorReport> for ErrorReportResponse {
    fn from(value: ErrorReport) -> Self {
        Self {
            kind: value.kind.as_str().to_owned(),
            hint: value.hint().as_str().to_owned(),
            timestamp: value.timestamp.to_rfc3339(),
            message: value.message,
            stack: value.stack,
            source_url: value.source_url,
            agent_string: value.agent_string,
            context: value.context,
        }
    }
}

/// Aggregate view of retained failures.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-summary-response.ts"
)]
pub struct ErrorSummaryResponse {
    pub total: usize,
    #[serde(rename = "byType")]
    pub by_type: BTreeMap<String, usize>,
    pub recent: Vec<ErrorReportResponse>,
}

impl From<ErrorSummary> for ErrorSummaryResponse {
    fn from(value: ErrorSummary) -> Self {
        Self {
            total: value.total,
            by_type: value
                .by_type
                .into_iter()
                .map(|(kind, count)| (kind.as_str().to_owned(), count))
                .collect(),
            recent: value
                .recent
                .into_iter()
                .map(ErrorReportResponse::from)
                .collect(),
        }
    }
}

/// Result of clearing the diagnostics buffer.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/cleared-errors-response.ts"
)]
pub struct ClearedErrorsResponse {
    pub cleared: usize,
}
