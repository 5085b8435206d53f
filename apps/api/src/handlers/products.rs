use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use backoffice_application::ProductFilter;
use backoffice_domain::SubscriptionDuration;
use serde::Deserialize;

use crate::dto::{DataResponse, ListResponse, ProductResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::query::{optional_text, parse_optional, query_params};

#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub duration: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

pub async fn list_products_handler(
    State(state): State<AppState>,
    query: Result<Query<ProductListQuery>, QueryRejection>,
) -> ApiResult<Json<DataResponse<ListResponse<ProductResponse>>>> {
    let query = query_params(query)?;
    let filter = ProductFilter {
        search: optional_text(query.search),
        category: optional_text(query.category),
        duration: parse_optional::<SubscriptionDuration>("duration", query.duration.as_deref())?,
    };
    let page = state.pagination.page(
        parse_optional("page", query.page.as_deref())?,
        parse_optional("limit", query.limit.as_deref())?,
    )?;

    let products = state
        .product_catalog_service
        .list_products(filter, page)
        .await?;

    Ok(Json(DataResponse::new(ListResponse::from_list(products))))
}
