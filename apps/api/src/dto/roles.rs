use rolegate_domain::Role;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for role creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-role-request.ts"
)]
pub struct CreateRoleRequest {
    pub name: String,
    #[ts(type = "number | null")]
    pub parent_id: Option<i64>,
    pub entity_id: Option<String>,
    pub entity_type: Option<String>,
}

/// Incoming payload for a rename and/or move of a role.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-role-request.ts"
)]
pub struct UpdateRoleRequest {
    pub name: Option<String>,
    #[ts(type = "number | null")]
    pub parent_id: Option<i64>,
}

/// Incoming payload for moving a role under a new parent.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/reparent-role-request.ts"
)]
pub struct ReparentRoleRequest {
    #[ts(type = "number")]
    pub parent_id: i64,
}

/// Incoming payload for copying another role's permissions.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/copy-permissions-request.ts"
)]
pub struct CopyPermissionsRequest {
    #[ts(type = "number")]
    pub from_role_id: i64,
}

/// Filters accepted by the role listing.
#[derive(Debug, Default, Deserialize)]
pub struct RoleListParams {
    pub parent_id: Option<i64>,
    pub search: Option<String>,
}

/// API representation of a role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    #[ts(type = "number")]
    pub id: i64,
    pub name: String,
    #[ts(type = "number | null")]
    pub parent_id: Option<i64>,
    pub entity_id: Option<String>,
    pub entity_type: Option<String>,
    pub is_root: bool,
    pub created_at: String,
    pub modified_at: String,
}

impl From<Role> for RoleResponse {
    fn from(value: Role) -> Self {
        let is_root = value.is_root();
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
            parent_id: value.parent_id.map(|parent_id| parent_id.as_i64()),
            entity_id,
            entity_type,
            is_root,
            created_at: value.created_at.to_rfc3339(),
            modified_at: value.modified_at.to_rfc3339(),
        }
    }
}
