mod permissions;
mod roles;
mod users;

pub use permissions::{
    NewPermission, PermissionFilter, PermissionGrant, PermissionQuery, PermissionRepository,
};
pub use roles::{NewRole, RoleChanges, RoleQuery, RoleRepository};
pub use users::{PasswordHasher, UserQuery, UserRepository};
