/// Permission names guarding the administration endpoints.
///
/// These are ordinary permissions resolved through the same role tree as any
/// application permission; granting one to a role grants the matching
/// administration surface to its members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminPermission {
    RoleManage,
    PermissionManage,
    UserManage,
}

impl AdminPermission {
    pub const ALL: [Self; 3] = [Self::RoleManage, Self::PermissionManage, Self::UserManage];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoleManage => "security.role.manage",
            Self::PermissionManage => "security.permission.manage",
            Self::UserManage => "security.user.manage",
        }
    }
}
