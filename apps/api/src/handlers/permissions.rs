use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use rolegate_application::{AddPermissionInput, PermissionFilter, PermissionQuery};
use rolegate_core::AppError;
use rolegate_domain::{PermissionId, PermissionOwner, RoleId, UserId};

use crate::admin_permission::AdminPermission;
use crate::dto::{
    AddPermissionRequest, PageParams, PageResponse, PermissionListParams, PermissionResponse,
};
use crate::error::ApiResult;
use crate::middleware::CurrentPrincipal;
use crate::state::AppState;

use super::require_admin;

pub async fn list_permissions_handler(
    State(state): State<AppState>,
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
    Query(filter): Query<PermissionListParams>,
    Query(page): Query<PageParams>,
) -> ApiResult<Json<PageResponse<PermissionResponse>>> {
    require_admin(&state, principal.as_ref(), AdminPermission::PermissionManage).await?;

    let permissions = state
        .permission_service
        .list(PermissionQuery {
            filter: PermissionFilter {
                role_id: filter.role_id.map(RoleId::new),
                user_id: filter.user_id.map(UserId::new),
                inherited_only: filter.inherited_only.unwrap_or_default(),
                search: filter.search,
            },
            pagination: page.into(),
        })
        .await?;

    Ok(Json(PageResponse::from_page(permissions)))
}

pub async fn get_permission_handler(
    State(state): State<AppState>,
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
    Path(permission_id): Path<i64>,
) -> ApiResult<Json<PermissionResponse>> {
    require_admin(&state, principal.as_ref(), AdminPermission::PermissionManage).await?;

    let permission = state
        .permission_service
        .get(PermissionId::new(permission_id))
        .await?;

    Ok(Json(PermissionResponse::from(permission)))
}

pub async fn add_permission_handler(
    State(state): State<AppState>,
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
    Json(payload): Json<AddPermissionRequest>,
) -> ApiResult<(StatusCode, Json<PermissionResponse>)> {
    require_admin(&state, principal.as_ref(), AdminPermission::PermissionManage).await?;

    let owner = match (payload.role_id, payload.user_id) {
        (Some(role_id), None) => PermissionOwner::Role(RoleId::new(role_id)),
        (None, Some(user_id)) => PermissionOwner::User(UserId::new(user_id)),
        _ => {
            return Err(AppError::Validation(
                "exactly one of role_id and user_id must be given".to_owned(),
            )
            .into());
        }
    };

    let permission = state
        .permission_service
        .add_permission(AddPermissionInput {
            owner,
            name: payload.name,
            entity_id: payload.entity_id,
            entity_type: payload.entity_type,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(PermissionResponse::from(permission))))
}

pub async fn remove_permission_handler(
    State(state): State<AppState>,
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
    Path(permission_id): Path<i64>,
) -> ApiResult<StatusCode> {
    require_admin(&state, principal.as_ref(), AdminPermission::PermissionManage).await?;

    state
        .permission_service
        .remove_permission(PermissionId::new(permission_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
