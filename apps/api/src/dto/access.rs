use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for an access decision.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/access-check-request.ts"
)]
pub struct AccessCheckRequest {
    pub permissions: Vec<String>,
    /// `AND` (default) or `OR`.
    pub join_type: Option<String>,
    pub entity_id: Option<String>,
    pub entity_type: Option<String>,
}

/// Outcome of an access decision.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/access-check-response.ts"
)]
pub struct AccessCheckResponse {
    pub allowed: bool,
}
