use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use rolegate_application::{CreateRoleInput, RoleQuery, UpdateRoleInput};
use rolegate_domain::RoleId;

use crate::admin_permission::AdminPermission;
use crate::dto::{
    AffectedCountResponse, CopyPermissionsRequest, CreateRoleRequest, PageParams, PageResponse,
    ReparentRoleRequest, RoleListParams, RoleResponse, UpdateRoleRequest,
};
use crate::error::ApiResult;
use crate::middleware::CurrentPrincipal;
use crate::state::AppState;

use super::require_admin;

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
    Query(filter): Query<RoleListParams>,
    Query(page): Query<PageParams>,
) -> ApiResult<Json<PageResponse<RoleResponse>>> {
    require_admin(&state, principal.as_ref(), AdminPermission::RoleManage).await?;

    let roles = state
        .role_service
        .list(RoleQuery {
            parent_id: filter.parent_id.map(RoleId::new),
            search: filter.search,
            pagination: page.into(),
        })
        .await?;

    Ok(Json(PageResponse::from_page(roles)))
}

pub async fn root_role_handler(
    State(state): State<AppState>,
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
) -> ApiResult<Json<RoleResponse>> {
    require_admin(&state, principal.as_ref(), AdminPermission::RoleManage).await?;

    let root = state.role_service.root().await?;
    Ok(Json(RoleResponse::from(root)))
}

pub async fn get_role_handler(
    State(state): State<AppState>,
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
    Path(role_id): Path<i64>,
) -> ApiResult<Json<RoleResponse>> {
    require_admin(&state, principal.as_ref(), AdminPermission::RoleManage).await?;

    let role = state.role_service.get(RoleId::new(role_id)).await?;
    Ok(Json(RoleResponse::from(role)))
}

pub async fn create_role_handler(
    State(state): State<AppState>,
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
    Json(payload): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    require_admin(&state, principal.as_ref(), AdminPermission::RoleManage).await?;

    let role = state
        .role_service
        .add_role(CreateRoleInput {
            name: payload.name,
            parent_id: payload.parent_id.map(RoleId::new),
            entity_id: payload.entity_id,
            entity_type: payload.entity_type,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}

pub async fn update_role_handler(
    State(state): State<AppState>,
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
    Path(role_id): Path<i64>,
    Json(payload): Json<UpdateRoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    require_admin(&state, principal.as_ref(), AdminPermission::RoleManage).await?;

    let role = state
        .role_service
        .update_role(
            RoleId::new(role_id),
            UpdateRoleInput {
                name: payload.name,
                parent_id: payload.parent_id.map(RoleId::new),
            },
        )
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn reparent_role_handler(
    State(state): State<AppState>,
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
    Path(role_id): Path<i64>,
    Json(payload): Json<ReparentRoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    require_admin(&state, principal.as_ref(), AdminPermission::RoleManage).await?;

    let role = state
        .role_service
        .reparent_role(RoleId::new(role_id), RoleId::new(payload.parent_id))
        .await?;

    Ok(Json(RoleResponse::from(role)))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
    Path(role_id): Path<i64>,
) -> ApiResult<StatusCode> {
    require_admin(&state, principal.as_ref(), AdminPermission::RoleManage).await?;

    state.role_service.delete_role(RoleId::new(role_id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn copy_permissions_handler(
    State(state): State<AppState>,
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
    Path(role_id): Path<i64>,
    Json(payload): Json<CopyPermissionsRequest>,
) -> ApiResult<Json<AffectedCountResponse>> {
    require_admin(&state, principal.as_ref(), AdminPermission::RoleManage).await?;

    let affected = state
        .role_service
        .copy_permissions(RoleId::new(payload.from_role_id), RoleId::new(role_id))
        .await?;

    Ok(Json(AffectedCountResponse { affected }))
}

pub async fn remove_inherited_permissions_handler(
    State(state): State<AppState>,
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
    Path(role_id): Path<i64>,
) -> ApiResult<Json<AffectedCountResponse>> {
    require_admin(&state, principal.as_ref(), AdminPermission::RoleManage).await?;

    let affected = state
        .role_service
        .remove_inherited_permissions(RoleId::new(role_id))
        .await?;

    Ok(Json(AffectedCountResponse { affected }))
}

pub async fn resync_inherited_permissions_handler(
    State(state): State<AppState>,
    Extension(CurrentPrincipal(principal)): Extension<CurrentPrincipal>,
    Path(role_id): Path<i64>,
) -> ApiResult<Json<RoleResponse>> {
    require_admin(&state, principal.as_ref(), AdminPermission::RoleManage).await?;

    let role = state
        .role_service
        .resync_inherited_permissions(RoleId::new(role_id))
        .await?;

    Ok(Json(RoleResponse::from(role)))
}
