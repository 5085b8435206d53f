use serde::Serialize;
use ts_rs::TS;

/// Success envelope wrapping every payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/data-response.ts"
)]
pub struct DataResponse<T: TS> {
    pub success: bool,
    pub data: T,
}

impl<T: TS> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// One page of a filtered listing.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/list-response.ts"
)]
pub struct ListResponse<T: TS> {
    pub items: Vec<T>,
    #[ts(type = "number")]
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    #[serde(rename = "totalPages")]
    #[ts(type = "number")]
    pub total_pages: u64,
}

impl<T: TS> ListResponse<T> {
    pub fn from_list<U>(list: backoffice_core::ListResult<U>) -> Self
    where
        T: From<U>,
    {
        let total = list.total();
        let page = list.page();
        let limit = list.limit();
        let total_pages = list.total_pages();

        Self {
            items: list.into_items().into_iter().map(T::from).collect(),
            total,
            page,
            limit,
            total_pages,
        }
    }
}

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ready: bool,
    pub postgres: HealthDependencyStatus,
}

/// One runtime dependency health status.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-dependency-status.ts"
)]
pub struct HealthDependencyStatus {
    pub status: &'static str,
    pub detail: Option<String>,
}
