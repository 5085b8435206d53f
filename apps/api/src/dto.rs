mod activity;
mod common;
mod diagnostics;
mod products;

pub use activity::{ActivityRecordResponse, LogActivityRequest};
pub use common::{DataResponse, HealthDependencyStatus, HealthResponse, ListResponse};
pub use diagnostics::{
    ClearedErrorsResponse, ClientErrorReportRequest, ErrorReportResponse, ErrorSummaryResponse,
};
pub use products::ProductResponse;
