use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::header::USER_AGENT;
use axum::http::{HeaderMap, StatusCode};
use backoffice_core::AppError;
use backoffice_domain::{ErrorKind, ErrorReport};

use crate::dto::{
    ClearedErrorsResponse, ClientErrorReportRequest, DataResponse, ErrorReportResponse,
    ErrorSummaryResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

use super::query::{optional_text, parse_optional};

pub async fn error_summary_handler(
    State(state): State<AppState>,
) -> Json<DataResponse<ErrorSummaryResponse>> {
    Json(DataResponse::new(ErrorSummaryResponse::from(
        state.error_aggregator.summary(),
    )))
}

pub async fn error_reports_handler(
    State(state): State<AppState>,
) -> Json<DataResponse<Vec<ErrorReportResponse>>> {
    let reports = state
        .error_aggregator
        .reports()
        .into_iter()
        .map(ErrorReportResponse::from)
        .collect();

    Json(DataResponse::new(reports))
}

/// Captures a failure reported by a client. Kind defaults to `runtime`.
pub async fn capture_error_report_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<ClientErrorReportRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<DataResponse<ErrorReportResponse>>)> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::Validation(format!("invalid error report: {}", rejection.body_text()))
    })?;

    let message = optional_text(payload.message)
        .ok_or_else(|| AppError::Validation("message is required".to_owned()))?;
    let kind = parse_optional::<ErrorKind>("kind", payload.kind.as_deref())?
        .unwrap_or(ErrorKind::Runtime);

    let mut report = ErrorReport::new(kind, message)
        .with_source_url(optional_text(payload.source_url).unwrap_or_default())
        .with_agent_string(
            headers
                .get(USER_AGENT)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default(),
        );
    if let Some(stack) = optional_text(payload.stack) {
        report = report.with_stack(stack);
    }
    if let Some(context) = payload.context {
        report = report.with_context(context);
    }

    state.error_aggregator.capture(report.clone());

    Ok((
        StatusCode::ACCEPTED,
        Json(DataResponse::new(ErrorReportResponse::from(report))),
    ))
}

pub async fn clear_error_reports_handler(
    State(state): State<AppState>,
) -> Json<DataResponse<ClearedErrorsResponse>> {
    let cleared = state.error_aggregator.clear();

    Json(DataResponse::new(ClearedErrorsResponse { cleared }))
}
