use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use rolegate_core::{AppError, Principal};

use crate::api_config::BootstrapAdmin;
use crate::api_services::build_memory_state;
use crate::bootstrap::bootstrap_access;
use crate::dto::{
    AccessCheckRequest, AddPermissionRequest, CreateRoleRequest, PageParams,
    PermissionListParams, RegisterUserRequest,
};
use crate::error::ApiError;
use crate::middleware::CurrentPrincipal;
use crate::state::AppState;

use super::access::check_access_handler;
use super::health::health_handler;
use super::permissions::{add_permission_handler, list_permissions_handler};
use super::roles::create_role_handler;
use super::users::{assign_role_handler, register_user_handler};

const ADMIN_LOGIN: &str = "admin";

async fn bootstrapped_state() -> (AppState, Principal) {
    let state = build_memory_state();
    let admin = BootstrapAdmin {
        login: ADMIN_LOGIN.to_owned(),
        password: "admin-password".to_owned(),
    };

    let bootstrapped = bootstrap_access(&state, "root", Some(&admin)).await;
    assert!(bootstrapped.is_ok());

    let user = state
        .user_service
        .get_by_login(ADMIN_LOGIN)
        .await
        .unwrap_or_else(|_| unreachable!())
        .unwrap_or_else(|| unreachable!());

    (state, Principal::new(user.id.as_i64(), user.login))
}

fn caller(principal: &Principal) -> Extension<CurrentPrincipal> {
    Extension(CurrentPrincipal(Some(principal.clone())))
}

fn anonymous() -> Extension<CurrentPrincipal> {
    Extension(CurrentPrincipal(None))
}

fn check_request(permissions: &[&str], join_type: Option<&str>) -> Json<AccessCheckRequest> {
    Json(AccessCheckRequest {
        permissions: permissions.iter().map(|name| (*name).to_owned()).collect(),
        join_type: join_type.map(ToOwned::to_owned),
        entity_id: None,
        entity_type: None,
    })
}

#[tokio::test]
async fn bootstrap_is_idempotent() {
    let (state, admin) = bootstrapped_state().await;
    let again = bootstrap_access(
        &state,
        "root",
        Some(&BootstrapAdmin {
            login: ADMIN_LOGIN.to_owned(),
            password: "admin-password".to_owned(),
        }),
    )
    .await;
    assert!(again.is_ok());

    let listed = list_permissions_handler(
        State(state),
        caller(&admin),
        Query(PermissionListParams {
            user_id: Some(admin.user_id()),
            ..PermissionListParams::default()
        }),
        Query(PageParams::default()),
    )
    .await;

    assert!(matches!(listed, Ok(Json(page)) if page.total == 3));
}

#[tokio::test]
async fn administration_requires_a_principal_and_the_permission() {
    let (state, _) = bootstrapped_state().await;
    let outsider = state
        .user_service
        .register("mallory", "mallory-password")
        .await
        .unwrap_or_else(|_| unreachable!());
    let outsider = Principal::new(outsider.id.as_i64(), outsider.login);

    let anonymous_result = create_role_handler(
        State(state.clone()),
        anonymous(),
        Json(CreateRoleRequest {
            name: "staff".to_owned(),
            parent_id: Some(1),
            entity_id: None,
            entity_type: None,
        }),
    )
    .await;
    let outsider_result = create_role_handler(
        State(state),
        caller(&outsider),
        Json(CreateRoleRequest {
            name: "staff".to_owned(),
            parent_id: Some(1),
            entity_id: None,
            entity_type: None,
        }),
    )
    .await;

    assert!(matches!(
        anonymous_result,
        Err(ApiError(AppError::Unauthorized(_)))
    ));
    assert!(matches!(
        outsider_result,
        Err(ApiError(AppError::Forbidden(message))) if message.contains("security.role.manage")
    ));
}

#[tokio::test]
async fn granted_role_permission_reaches_members() {
    let (state, admin) = bootstrapped_state().await;
    let root = state
        .role_service
        .root()
        .await
        .unwrap_or_else(|_| unreachable!());

    let created = create_role_handler(
        State(state.clone()),
        caller(&admin),
        Json(CreateRoleRequest {
            name: "staff".to_owned(),
            parent_id: Some(root.id.as_i64()),
            entity_id: None,
            entity_type: None,
        }),
    )
    .await;
    let Ok((status, Json(staff))) = created else {
        unreachable!();
    };
    assert_eq!(status, StatusCode::CREATED);

    let granted = add_permission_handler(
        State(state.clone()),
        caller(&admin),
        Json(AddPermissionRequest {
            name: "VIEW".to_owned(),
            role_id: Some(staff.id),
            user_id: None,
            entity_id: None,
            entity_type: None,
        }),
    )
    .await;
    assert!(granted.is_ok());

    let registered = register_user_handler(
        State(state.clone()),
        caller(&admin),
        Json(RegisterUserRequest {
            login: "alice".to_owned(),
            password: "alice-password".to_owned(),
        }),
    )
    .await;
    let Ok((_, Json(alice))) = registered else {
        unreachable!();
    };
    let alice_principal = Principal::new(alice.id, alice.login);

    let before = check_access_handler(
        State(state.clone()),
        caller(&alice_principal),
        check_request(&["VIEW"], None),
    )
    .await;
    assert!(matches!(before, Ok(Json(response)) if !response.allowed));

    let assigned = assign_role_handler(
        State(state.clone()),
        caller(&admin),
        Path((alice.id, staff.id)),
    )
    .await;
    assert!(matches!(assigned, Ok(status) if status == StatusCode::NO_CONTENT));

    let after = check_access_handler(
        State(state.clone()),
        caller(&alice_principal),
        check_request(&["VIEW", "EDIT"], Some("or")),
    )
    .await;
    let anonymous_check =
        check_access_handler(State(state), anonymous(), check_request(&["VIEW"], None)).await;

    assert!(matches!(after, Ok(Json(response)) if response.allowed));
    assert!(matches!(anonymous_check, Ok(Json(response)) if !response.allowed));
}

#[tokio::test]
async fn permission_owner_must_be_exactly_one() {
    let (state, admin) = bootstrapped_state().await;

    let result = add_permission_handler(
        State(state),
        caller(&admin),
        Json(AddPermissionRequest {
            name: "VIEW".to_owned(),
            role_id: Some(1),
            user_id: Some(admin.user_id()),
            entity_id: None,
            entity_type: None,
        }),
    )
    .await;

    assert!(matches!(result, Err(ApiError(AppError::Validation(_)))));
}

#[tokio::test]
async fn access_check_rejects_malformed_input() {
    let (state, admin) = bootstrapped_state().await;

    let bad_join = check_access_handler(
        State(state.clone()),
        caller(&admin),
        check_request(&["VIEW"], Some("XOR")),
    )
    .await;
    let half_scope = check_access_handler(
        State(state),
        caller(&admin),
        Json(AccessCheckRequest {
            permissions: vec!["VIEW".to_owned()],
            join_type: None,
            entity_id: Some("42".to_owned()),
            entity_type: None,
        }),
    )
    .await;

    assert!(matches!(bad_join, Err(ApiError(AppError::Validation(_)))));
    assert!(matches!(half_scope, Err(ApiError(AppError::Validation(_)))));
}

#[tokio::test]
async fn memory_backend_reports_healthy() {
    let (status, Json(response)) = health_handler(State(build_memory_state())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response.storage, "memory");
}
