use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use rolegate_core::{AppError, Principal};
use rolegate_domain::UserId;
use tower_sessions::Session;
use tracing::{info, warn};

use crate::dto::{LoginRequest, UserResponse};
use crate::error::ApiResult;
use crate::middleware::CurrentPrincipal;
use crate::state::AppState;

use super::SESSION_PRINCIPAL_KEY;

/// POST /auth/login - Verify credentials and start a session.
pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = match state
        .user_service
        .login(payload.login.as_str(), payload.password.as_str())
        .await
    {
        Ok(user) => user,
        Err(error) => {
            warn!(login = %payload.login, error = %error, "login rejected");
            return Err(error.into());
        }
    };

    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;

    session
        .insert(
            SESSION_PRINCIPAL_KEY,
            Principal::new(user.id.as_i64(), user.login.as_str()),
        )
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session principal: {error}"))
        })?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(UserResponse::from(user)))
}

/// POST /auth/logout - End the current session.
pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/me - Return the logged-in user.
pub async fn me_handler(
    State(state): State<AppState>,
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
) -> ApiResult<Json<UserResponse>> {
    let principal =
        principal.ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let user = state
        .user_service
        .get(UserId::new(principal.user_id()))
        .await?;

    Ok(Json(UserResponse::from(user)))
}
