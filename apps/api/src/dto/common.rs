use rolegate_domain::{Page, Pagination};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub storage: &'static str,
}

/// Paging parameters shared by every list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub descending: Option<bool>,
}

impl From<PageParams> for Pagination {
    fn from(value: PageParams) -> Self {
        Pagination::new(
            value.limit,
            value.offset,
            value.descending.unwrap_or_default(),
        )
    }
}

/// One page of a listing together with the unpaged total.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/page-response.ts"
)]
pub struct PageResponse<T: TS> {
    pub items: Vec<T>,
    #[ts(type = "number")]
    pub total: u64,
}

impl<T: TS> PageResponse<T> {
    pub fn from_page<S>(page: Page<S>) -> Self
    where
        T: From<S>,
    {
        Self {
            items: page.items.into_iter().map(T::from).collect(),
            total: page.total,
        }
    }
}

/// Number of rows touched by a bulk permission operation.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/affected-count-response.ts"
)]
pub struct AffectedCountResponse {
    #[ts(type = "number")]
    pub affected: u64,
}
