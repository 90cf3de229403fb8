//! Domain records and invariants of the role tree.

#![forbid(unsafe_code)]

mod access;
mod paging;
mod permission;
mod role;
mod scope;
mod user;

pub use access::JoinType;
pub use paging::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, Page, Pagination};
pub use permission::{Permission, PermissionId, PermissionOwner};
pub use role::{Role, RoleId};
pub use scope::EntityScope;
pub use user::{
    LOGIN_MAX_LENGTH, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, User, UserId, validate_login,
    validate_password,
};
