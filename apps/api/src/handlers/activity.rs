use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::header::USER_AGENT;
use axum::http::{HeaderMap, StatusCode};
use backoffice_application::{ActivityFilter, LogActivityInput};
use backoffice_core::{AppError, AppResult, Page};
use serde::Deserialize;

use crate::dto::{ActivityRecordResponse, DataResponse, ListResponse, LogActivityRequest};
use crate::error::ApiResult;
use crate::state::AppState;

use super::query::{DayBound, optional_text, parse_date_bound, parse_optional, query_params};

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Raw query string of the activity listing.
#[derive(Debug, Default, Deserialize)]
pub struct ActivityListQuery {
    pub id_admin: Option<String>,
    pub action: Option<String>,
    pub date_debut: Option<String>,
    pub date_fin: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ActivityListQuery {
    fn into_filter(self, state: &AppState) -> AppResult<(ActivityFilter, Page)> {
        let filter = ActivityFilter {
            actor_id: parse_optional("id_admin", self.id_admin.as_deref())?,
            action: optional_text(self.action),
            created_from: parse_date_bound(
                "date_debut",
                self.date_debut.as_deref(),
                DayBound::Start,
            )?,
            created_to: parse_date_bound("date_fin", self.date_fin.as_deref(), DayBound::End)?,
        };
        let page = state.pagination.page(
            parse_optional("page", self.page.as_deref())?,
            parse_optional("limit", self.limit.as_deref())?,
        )?;

        Ok((filter, page))
    }
}

pub async fn list_activity_handler(
    State(state): State<AppState>,
    query: Result<Query<ActivityListQuery>, QueryRejection>,
) -> ApiResult<Json<DataResponse<ListResponse<ActivityRecordResponse>>>> {
    let (filter, page) = query_params(query)?.into_filter(&state)?;
    let records = state
        .activity_log_service
        .list_activity(filter, page)
        .await?;

    Ok(Json(DataResponse::new(ListResponse::from_list(records))))
}

pub async fn log_activity_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<LogActivityRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<DataResponse<ActivityRecordResponse>>)> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::Validation(format!("invalid activity payload: {}", rejection.body_text()))
    })?;

    let record = state
        .activity_log_service
        .log_activity(LogActivityInput {
            actor_id: payload.id_admin,
            action: payload.action,
            description: payload.description,
            source_address: optional_text(payload.ip_address)
                .or_else(|| forwarded_client_address(&headers)),
            agent_string: optional_text(payload.user_agent)
                .or_else(|| header_text(&headers, USER_AGENT.as_str())),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(ActivityRecordResponse::from(record))),
    ))
}

fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .and_then(|value| optional_text(Some(value)))
}

/// First hop of `X-Forwarded-For`, the original client.
fn forwarded_client_address(headers: &HeaderMap) -> Option<String> {
    header_text(headers, FORWARDED_FOR).and_then(|value| {
        value
            .split(',')
            .next()
            .and_then(|first| optional_text(Some(first.to_owned())))
    })
}
