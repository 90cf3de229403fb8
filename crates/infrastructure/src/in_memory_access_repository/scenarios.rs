//! End-to-end access scenarios wired through the application services.

use std::sync::Arc;

use async_trait::async_trait;
use rolegate_application::{
    AccessDecisionService, AddPermissionInput, CreateRoleInput, NewRole, PermissionFilter,
    PermissionQuery, PermissionResolver, PermissionService, RoleChanges, RoleQuery,
    RoleRepository, RoleService, UserRepository,
};
use rolegate_core::{AppError, AppResult, Principal};
use rolegate_domain::{EntityScope, JoinType, Page, Pagination, PermissionOwner, Role, RoleId, User};

use super::InMemoryAccessRepository;

struct Fixture {
    repository: Arc<InMemoryAccessRepository>,
    roles: RoleService,
    permissions: PermissionService,
    access: AccessDecisionService,
    resolver: PermissionResolver,
}

impl Fixture {
    fn new() -> Self {
        let repository = Arc::new(InMemoryAccessRepository::new());
        let resolver = PermissionResolver::new(repository.clone());

        Self {
            roles: RoleService::new(repository.clone()),
            permissions: PermissionService::new(
                repository.clone(),
                repository.clone(),
                repository.clone(),
            ),
            access: AccessDecisionService::new(resolver.clone(), repository.clone()),
            resolver,
            repository,
        }
    }

    async fn role(&self, name: &str, parent: &Role) -> Role {
        self.roles
            .add_role(CreateRoleInput {
                name: name.to_owned(),
                parent_id: Some(parent.id),
                entity_id: None,
                entity_type: None,
            })
            .await
            .unwrap_or_else(|_| unreachable!())
    }

    async fn grant(&self, role: &Role, name: &str, scope: Option<(&str, &str)>) {
        let added = self
            .permissions
            .add_permission(AddPermissionInput {
                owner: PermissionOwner::Role(role.id),
                name: name.to_owned(),
                entity_id: scope.map(|(entity_id, _)| entity_id.to_owned()),
                entity_type: scope.map(|(_, entity_type)| entity_type.to_owned()),
            })
            .await;
        assert!(added.is_ok());
    }

    async fn member_of(&self, login: &str, role: &Role) -> User {
        let user = self
            .repository
            .create_user(login, "unused")
            .await
            .unwrap_or_else(|_| unreachable!());
        assert!(self.repository.add_role(user.id, role.id).await.is_ok());
        user
    }

    async fn role_permissions(&self, role_id: RoleId) -> Vec<(String, bool)> {
        let mut listed: Vec<(String, bool)> = self
            .permissions
            .list(PermissionQuery {
                filter: PermissionFilter {
                    role_id: Some(role_id),
                    ..PermissionFilter::default()
                },
                pagination: Pagination::default(),
            })
            .await
            .unwrap_or_else(|_| unreachable!())
            .items
            .into_iter()
            .map(|permission| (permission.name, permission.inherited))
            .collect();
        listed.sort();
        listed
    }
}

fn principal(user: &User) -> Principal {
    Principal::new(user.id.as_i64(), user.login.as_str())
}

fn scope(entity_id: &str, entity_type: &str) -> EntityScope {
    EntityScope::new(entity_id, entity_type).unwrap_or_else(|_| unreachable!())
}

#[tokio::test]
async fn member_access_and_root_fallback() {
    let fixture = Fixture::new();
    let root = fixture
        .roles
        .bootstrap_root("root")
        .await
        .unwrap_or_else(|_| unreachable!());
    let staff = fixture.role("staff", &root).await;
    fixture.grant(&staff, "VIEW", None).await;
    let user = fixture.member_of("alice", &staff).await;
    let caller = principal(&user);

    assert!(
        fixture
            .access
            .check_access(Some(&caller), &["VIEW"], JoinType::And)
            .await
    );
    assert!(
        !fixture
            .access
            .check_access(Some(&caller), &["EDIT"], JoinType::And)
            .await
    );
    assert!(
        !fixture
            .access
            .check_access(None, &["VIEW"], JoinType::And)
            .await
    );
}

#[tokio::test]
async fn scoped_permission_matches_only_its_entity() {
    let fixture = Fixture::new();
    let root = fixture
        .roles
        .bootstrap_root("root")
        .await
        .unwrap_or_else(|_| unreachable!());
    let editors = fixture.role("editors", &root).await;
    fixture.grant(&editors, "EDIT", Some(("42", "doc"))).await;
    let user = fixture.member_of("alice", &editors).await;

    let unscoped = fixture.resolver.check_user(user.id, "EDIT", None).await;
    let same = fixture
        .resolver
        .check_user(user.id, "EDIT", Some(&scope("42", "doc")))
        .await;
    let other_type = fixture
        .resolver
        .check_user(user.id, "EDIT", Some(&scope("42", "other")))
        .await;

    assert!(matches!(unscoped, Ok(false)));
    assert!(matches!(same, Ok(true)));
    assert!(matches!(other_type, Ok(false)));
}

#[tokio::test]
async fn create_then_reparent_refreshes_inherited_copies() {
    let fixture = Fixture::new();
    let root = fixture
        .roles
        .bootstrap_root("root")
        .await
        .unwrap_or_else(|_| unreachable!());
    let staff = fixture.role("staff", &root).await;
    fixture.grant(&staff, "VIEW", None).await;

    let interns = fixture.role("interns", &staff).await;
    assert_eq!(
        fixture.role_permissions(interns.id).await,
        vec![("VIEW".to_owned(), true)]
    );

    let moved = fixture.roles.reparent_role(interns.id, root.id).await;
    assert!(moved.is_ok());
    assert!(fixture.role_permissions(interns.id).await.is_empty());
}

#[tokio::test]
async fn reparent_keeps_direct_permissions() {
    let fixture = Fixture::new();
    let root = fixture
        .roles
        .bootstrap_root("root")
        .await
        .unwrap_or_else(|_| unreachable!());
    let staff = fixture.role("staff", &root).await;
    let guests = fixture.role("guests", &root).await;
    fixture.grant(&staff, "VIEW", None).await;
    fixture.grant(&guests, "COMMENT", Some(("1", "thread"))).await;
    let interns = fixture.role("interns", &staff).await;
    fixture.grant(&interns, "UPLOAD", None).await;

    let moved = fixture.roles.reparent_role(interns.id, guests.id).await;

    assert!(moved.is_ok());
    assert_eq!(
        fixture.role_permissions(interns.id).await,
        vec![("COMMENT".to_owned(), true), ("UPLOAD".to_owned(), false)]
    );
}

#[tokio::test]
async fn root_cannot_be_deleted_or_moved() {
    let fixture = Fixture::new();
    let root = fixture
        .roles
        .bootstrap_root("root")
        .await
        .unwrap_or_else(|_| unreachable!());
    let staff = fixture.role("staff", &root).await;

    let deleted = fixture.roles.delete_role(root.id).await;
    let moved = fixture.roles.reparent_role(root.id, staff.id).await;

    assert!(matches!(deleted, Err(AppError::RoleRootCannotBeDeleted(_))));
    assert!(matches!(moved, Err(AppError::RoleRootCannotBeDeleted(_))));
}

#[tokio::test]
async fn deleting_a_role_revokes_member_access() {
    let fixture = Fixture::new();
    let root = fixture
        .roles
        .bootstrap_root("root")
        .await
        .unwrap_or_else(|_| unreachable!());
    let staff = fixture.role("staff", &root).await;
    fixture.grant(&staff, "VIEW", None).await;
    let user = fixture.member_of("alice", &staff).await;
    let caller = principal(&user);

    assert!(fixture.roles.delete_role(staff.id).await.is_ok());

    assert!(
        !fixture
            .access
            .check_access(Some(&caller), &["VIEW"], JoinType::Or)
            .await
    );
    assert!(matches!(
        fixture.permissions.count(&PermissionFilter::default()).await,
        Ok(0)
    ));
}

#[tokio::test]
async fn join_types_over_mixed_grants() {
    let fixture = Fixture::new();
    let root = fixture
        .roles
        .bootstrap_root("root")
        .await
        .unwrap_or_else(|_| unreachable!());
    fixture.grant(&root, "PUBLIC", None).await;
    let staff = fixture.role("staff", &root).await;
    fixture.grant(&staff, "VIEW", None).await;
    let user = fixture.member_of("alice", &staff).await;
    let caller = principal(&user);

    assert!(
        fixture
            .access
            .check_access(Some(&caller), &["VIEW", "PUBLIC"], JoinType::And)
            .await
    );
    assert!(
        !fixture
            .access
            .check_access(Some(&caller), &["VIEW", "DELETE"], JoinType::And)
            .await
    );
    assert!(
        fixture
            .access
            .check_access(Some(&caller), &["DELETE", "VIEW"], JoinType::Or)
            .await
    );
    assert!(
        fixture
            .access
            .check_access(None, &["DELETE", "PUBLIC"], JoinType::Or)
            .await
    );
}

/// Yields before every role read so concurrent services interleave their
/// checks with each other's writes.
struct InterleavingRoles(Arc<InMemoryAccessRepository>);

#[async_trait]
impl RoleRepository for InterleavingRoles {
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        tokio::task::yield_now().await;
        self.0.find_role(role_id).await
    }

    async fn find_root_role(&self) -> AppResult<Option<Role>> {
        tokio::task::yield_now().await;
        self.0.find_root_role().await
    }

    async fn list_roles(&self, query: RoleQuery) -> AppResult<Page<Role>> {
        self.0.list_roles(query).await
    }

    async fn count_children(&self, role_id: RoleId) -> AppResult<u64> {
        self.0.count_children(role_id).await
    }

    async fn insert_role(&self, role: NewRole) -> AppResult<Role> {
        self.0.insert_role(role).await
    }

    async fn update_role(&self, role_id: RoleId, changes: RoleChanges) -> AppResult<Role> {
        self.0.update_role(role_id, changes).await
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<()> {
        self.0.delete_role(role_id).await
    }

    async fn copy_permissions(&self, from: RoleId, to: RoleId) -> AppResult<u64> {
        self.0.copy_permissions(from, to).await
    }

    async fn remove_inherited_permissions(&self, role_id: RoleId) -> AppResult<u64> {
        self.0.remove_inherited_permissions(role_id).await
    }
}

async fn reaches_root(repository: &InMemoryAccessRepository, start: RoleId) -> bool {
    let mut cursor = Some(start);
    for _ in 0..16 {
        let Some(role_id) = cursor else {
            return false;
        };
        match repository.find_role(role_id).await {
            Ok(Some(role)) if role.is_root() => return true,
            Ok(Some(role)) => cursor = role.parent_id,
            _ => return false,
        }
    }
    false
}

#[tokio::test]
async fn crossing_reparents_never_form_a_cycle() {
    let repository = Arc::new(InMemoryAccessRepository::new());
    let roles = RoleService::new(Arc::new(InterleavingRoles(repository.clone())));
    let root = roles
        .bootstrap_root("root")
        .await
        .unwrap_or_else(|_| unreachable!());
    let staff = roles
        .add_role(CreateRoleInput {
            name: "staff".to_owned(),
            parent_id: Some(root.id),
            ..CreateRoleInput::default()
        })
        .await
        .unwrap_or_else(|_| unreachable!());
    let guests = roles
        .add_role(CreateRoleInput {
            name: "guests".to_owned(),
            parent_id: Some(root.id),
            ..CreateRoleInput::default()
        })
        .await
        .unwrap_or_else(|_| unreachable!());

    let (staff_moved, guests_moved) = tokio::join!(
        roles.reparent_role(staff.id, guests.id),
        roles.reparent_role(guests.id, staff.id)
    );

    assert_ne!(staff_moved.is_ok(), guests_moved.is_ok());
    let rejected = if staff_moved.is_ok() {
        guests_moved
    } else {
        staff_moved
    };
    assert!(matches!(rejected, Err(AppError::RoleCannotBeItsParent(_))));
    assert!(reaches_root(&repository, staff.id).await);
    assert!(reaches_root(&repository, guests.id).await);
}
