use axum::Json;
use axum::extract::{Extension, State};
use rolegate_domain::{EntityScope, JoinType};

use crate::dto::{AccessCheckRequest, AccessCheckResponse};
use crate::error::ApiResult;
use crate::middleware::CurrentPrincipal;
use crate::state::AppState;

/// POST /api/access/check - Decide whether the caller holds a set of permissions.
///
/// Anonymous callers are checked against the root role.
pub async fn check_access_handler(
    State(state): State<AppState>,
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
    Json(payload): Json<AccessCheckRequest>,
) -> ApiResult<Json<AccessCheckResponse>> {
    let join_type = payload
        .join_type
        .as_deref()
        .map(str::parse::<JoinType>)
        .transpose()?
        .unwrap_or_default();
    let scope = EntityScope::from_parts(payload.entity_id, payload.entity_type)?;

    let allowed = match scope.as_ref() {
        Some(scope) => {
            state
                .access_decision_service
                .check_entity_access(
                    principal.as_ref(),
                    payload.permissions.as_slice(),
                    join_type,
                    scope,
                )
                .await
        }
        None => {
            state
                .access_decision_service
                .check_access(principal.as_ref(), payload.permissions.as_slice(), join_type)
                .await
        }
    };

    Ok(Json(AccessCheckResponse { allowed }))
}
