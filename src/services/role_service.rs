//! Role service - permission bundles.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Role, RoleId, RoleInput, RolePermissions};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait RoleService: Send + Sync {
    async fn create_role(&self, input: RoleInput) -> AppResult<Role>;

    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Replace the role's permission list
    async fn assign_permissions(&self, id: RoleId, input: RolePermissions) -> AppResult<Role>;

    /// Delete the role, detaching it from every user first
    async fn delete_role(&self, id: RoleId) -> AppResult<()>;
}

pub struct RoleManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> RoleManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> RoleService for RoleManager<U> {
    async fn create_role(&self, input: RoleInput) -> AppResult<Role> {
        let role = Role::new(input.role_name.clone(), input.permissions());
        let created = self.uow.roles().create(role).await?;
        tracing::info!(role = %created.role_name, "Role created");
        Ok(created)
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.uow.roles().list().await
    }

    async fn assign_permissions(&self, id: RoleId, input: RolePermissions) -> AppResult<Role> {
        self.uow
            .roles()
            .update_permissions(id, input.permissions())
            .await?
            .ok_or_not_found("Role")
    }

    async fn delete_role(&self, id: RoleId) -> AppResult<()> {
        let detached = self.uow.roles().delete(id).await?.ok_or_not_found("Role")?;
        tracing::info!(role_id = %id, detached, "Role deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::infra::{MockRoleRepository, MockUnitOfWork};
    use mockall::predicate::*;

    fn manager(roles: MockRoleRepository) -> RoleManager<MockUnitOfWork> {
        let roles = Arc::new(roles);
        let mut uow = MockUnitOfWork::new();
        uow.expect_roles().returning(move || roles.clone());
        RoleManager::new(Arc::new(uow))
    }

    #[tokio::test]
    async fn test_create_uppercases_name() {
        let mut roles = MockRoleRepository::new();
        roles
            .expect_create()
            .withf(|role| role.role_name == "NIGHT_AUDIT")
            .returning(Ok);

        let role = manager(roles)
            .create_role(RoleInput {
                role_name: "night_audit".into(),
                permissions: vec!["purchase:read".into()],
            })
            .await
            .unwrap();
        assert_eq!(role.permissions.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_name_surfaces_repository_message() {
        let mut roles = MockRoleRepository::new();
        roles
            .expect_create()
            .returning(|_| Err(AppError::duplicate("Role already exists")));

        let err = manager(roles)
            .create_role(RoleInput {
                role_name: "desk".into(),
                permissions: vec![],
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Role already exists");
    }

    #[tokio::test]
    async fn test_delete_detaches_from_users() {
        let id = RoleId::new();
        let mut roles = MockRoleRepository::new();
        roles
            .expect_delete()
            .with(eq(id))
            .times(1)
            .returning(|_| Ok(Some(3)));

        assert!(manager(roles).delete_role(id).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_role_is_not_found() {
        let mut roles = MockRoleRepository::new();
        roles.expect_delete().returning(|_| Ok(None));
        roles.expect_update_permissions().returning(|_, _| Ok(None));

        let manager = manager(roles);
        let err = manager.delete_role(RoleId::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "Role not found");

        let err = manager
            .assign_permissions(RoleId::new(), RolePermissions { permissions: vec![] })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Role not found");
    }
}
