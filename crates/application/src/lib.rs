//! Application services and ports.

#![forbid(unsafe_code)]

mod access_decision_service;
mod access_ports;
mod permission_resolver;
mod permission_service;
mod role_service;
mod user_service;

#[cfg(test)]
mod test_support;

pub use access_decision_service::AccessDecisionService;
pub use access_ports::{
    NewPermission, NewRole, PasswordHasher, PermissionFilter, PermissionGrant, PermissionQuery,
    PermissionRepository, RoleChanges, RoleQuery, RoleRepository, UserQuery, UserRepository,
};
pub use permission_resolver::PermissionResolver;
pub use permission_service::{AddPermissionInput, PermissionService};
pub use role_service::{CreateRoleInput, RoleService, UpdateRoleInput};
pub use user_service::UserService;
