use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use rolegate_core::{AppError, Principal};
use tower_sessions::Session;

use crate::auth::SESSION_PRINCIPAL_KEY;
use crate::error::ApiResult;

/// Caller attached to every request; `None` for anonymous requests.
#[derive(Debug, Clone, Default)]
pub struct CurrentPrincipal(pub Option<Principal>);

/// Attaches the session principal when one exists.
///
/// Requests without a session continue unauthenticated so that endpoints can
/// fall back to the root role's permissions.
pub async fn attach_principal(
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let principal = session
        .get::<Principal>(SESSION_PRINCIPAL_KEY)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to read session principal: {error}"))
        })?;

    request.extensions_mut().insert(CurrentPrincipal(principal));
    Ok(next.run(request).await)
}
