mod access;
mod auth;
mod common;
mod permissions;
mod roles;
mod users;

pub use access::{AccessCheckRequest, AccessCheckResponse};
pub use auth::{ChangePasswordRequest, LoginRequest};
pub use common::{AffectedCountResponse, HealthResponse, PageParams, PageResponse};
pub use permissions::{AddPermissionRequest, PermissionListParams, PermissionResponse};
pub use roles::{
    CopyPermissionsRequest, CreateRoleRequest, ReparentRoleRequest, RoleListParams, RoleResponse,
    UpdateRoleRequest,
};
pub use users::{RegisterUserRequest, UserListParams, UserResponse};
