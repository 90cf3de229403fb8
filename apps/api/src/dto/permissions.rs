use rolegate_domain::Permission;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for a direct permission grant.
///
/// Exactly one of `role_id` and `user_id` names the owner.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/add-permission-request.ts"
)]
pub struct AddPermissionRequest {
    pub name: String,
    #[ts(type = "number | null")]
    pub role_id: Option<i64>,
    #[ts(type = "number | null")]
    pub user_id: Option<i64>,
    pub entity_id: Option<String>,
    pub entity_type: Option<String>,
}

/// Filters accepted by the permission listing.
#[derive(Debug, Default, Deserialize)]
pub struct PermissionListParams {
    pub role_id: Option<i64>,
    pub user_id: Option<i64>,
    pub inherited_only: Option<bool>,
    pub search: Option<String>,
}

/// API representation of a permission.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-response.ts"
)]
pub struct PermissionResponse {
    #[ts(type = "number")]
    pub id: i64,
    pub name: String,
    pub inherited: bool,
    pub entity_id: Option<String>,
    pub entity_type: Option<String>,
    #[ts(type = "number | null")]
    pub role_id: Option<i64>,
    #[ts(type = "number | null")]
    pub user_id: Option<i64>,
    pub created_at: String,
}

impl From<Permission> for PermissionResponse {
    fn from(value: Permission) -> Self {
        let (entity_id, entity_type) = match value.scope {
            Some(scope) => (
                Some(scope.entity_id().to_owned()),
                Some(scope.entity_type().to_owned()),
            ),
            None => (None, None),
        };

        Self {
            id: value.id.as_i64(),
            name: value.name,
            inherited: value.inherited,
            entity_id,
            entity_type,
            role_id: value.owner.role_id().map(|role_id| role_id.as_i64()),
            user_id: value.owner.user_id().map(|user_id| user_id.as_i64()),
            created_at: value.created_at.to_rfc3339(),
        }
    }
}
