use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use rolegate_application::UserQuery;
use rolegate_domain::{RoleId, UserId};

use crate::admin_permission::AdminPermission;
use crate::dto::{
    PageParams, PageResponse, RegisterUserRequest, RoleResponse, UserListParams, UserResponse,
};
use crate::error::ApiResult;
use crate::middleware::CurrentPrincipal;
use crate::state::AppState;

use super::require_admin;

pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
    Query(filter): Query<UserListParams>,
    Query(page): Query<PageParams>,
) -> ApiResult<Json<PageResponse<UserResponse>>> {
    require_admin(&state, principal.as_ref(), AdminPermission::UserManage).await?;

    let users = state
        .user_service
        .list(UserQuery {
            search: filter.search,
            pagination: page.into(),
        })
        .await?;

    Ok(Json(PageResponse::from_page(users)))
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<UserResponse>> {
    require_admin(&state, principal.as_ref(), AdminPermission::UserManage).await?;

    let user = state.user_service.get(UserId::new(user_id)).await?;
    Ok(Json(UserResponse::from(user)))
}

pub async fn register_user_handler(
    State(state): State<AppState>,
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
    Json(payload): Json<RegisterUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    require_admin(&state, principal.as_ref(), AdminPermission::UserManage).await?;

    let user = state
        .user_service
        .register(payload.login.as_str(), payload.password.as_str())
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

pub async fn delete_user_handler(
    State(state): State<AppState>,
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
    Path(user_id): Path<i64>,
) -> ApiResult<StatusCode> {
    require_admin(&state, principal.as_ref(), AdminPermission::UserManage).await?;

    state.user_service.delete_user(UserId::new(user_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_user_roles_handler(
    State(state): State<AppState>,
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    require_admin(&state, principal.as_ref(), AdminPermission::UserManage).await?;

    let roles = state
        .user_service
        .list_roles(UserId::new(user_id))
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn assign_role_handler(
    State(state): State<AppState>,
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
    Path((user_id, role_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    require_admin(&state, principal.as_ref(), AdminPermission::UserManage).await?;

    state
        .user_service
        .assign_role(UserId::new(user_id), RoleId::new(role_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn unassign_role_handler(
    State(state): State<AppState>,
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
    Path((user_id, role_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    require_admin(&state, principal.as_ref(), AdminPermission::UserManage).await?;

    state
        .user_service
        .unassign_role(UserId::new(user_id), RoleId::new(role_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
