use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use rolegate_core::AppError;
use rolegate_domain::UserId;

use crate::dto::ChangePasswordRequest;
use crate::error::ApiResult;
use crate::middleware::CurrentPrincipal;
use crate::state::AppState;

/// POST /auth/password - Change the logged-in user's password.
pub async fn change_password_handler(
    State(state): State<AppState>,
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<StatusCode> {
    let principal =
        principal.ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    state
        .user_service
        .change_password(
            UserId::new(principal.user_id()),
            payload.current_password.as_str(),
            payload.new_password.as_str(),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
