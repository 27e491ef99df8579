//! Role repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use super::entities::json::PermissionList;
use super::entities::role::{self, ActiveModel, Entity as RoleEntity};
use super::entities::user_role::{self, Entity as UserRoleEntity};
use crate::domain::{Permission, Role, RoleId};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Every role, oldest first
    async fn list(&self) -> AppResult<Vec<Role>>;

    async fn find_by_id(&self, id: RoleId) -> AppResult<Option<Role>>;

    /// Roles matching the given ids; unknown ids are skipped
    async fn find_by_ids(&self, ids: Vec<RoleId>) -> AppResult<Vec<Role>>;

    async fn create(&self, role: Role) -> AppResult<Role>;

    /// Replace the permission list; `None` when the role does not exist
    async fn update_permissions(
        &self,
        id: RoleId,
        permissions: Vec<Permission>,
    ) -> AppResult<Option<Role>>;

    /// Detach the role from every user and delete it.
    ///
    /// Returns the number of users it was detached from, or `None` when the
    /// role does not exist.
    async fn delete(&self, id: RoleId) -> AppResult<Option<u64>>;
}

pub struct RoleStore {
    db: DatabaseConnection,
}

impl RoleStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RoleRepository for RoleStore {
    async fn list(&self) -> AppResult<Vec<Role>> {
        let models = RoleEntity::find()
            .order_by_asc(role::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Role::from).collect())
    }

    async fn find_by_id(&self, id: RoleId) -> AppResult<Option<Role>> {
        let model = RoleEntity::find_by_id(id.into_uuid()).one(&self.db).await?;
        Ok(model.map(Role::from))
    }

    async fn find_by_ids(&self, ids: Vec<RoleId>) -> AppResult<Vec<Role>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = RoleEntity::find()
            .filter(role::Column::Id.is_in(ids.into_iter().map(RoleId::into_uuid)))
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Role::from).collect())
    }

    async fn create(&self, role: Role) -> AppResult<Role> {
        let active_model = ActiveModel {
            id: Set(role.id.into_uuid()),
            role_name: Set(role.role_name),
            permissions: Set(PermissionList(role.permissions)),
            created_at: Set(role.created_at),
            updated_at: Set(role.updated_at),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_unique_violation(e, &[("role_name", "Role already exists")]))?;
        Ok(Role::from(model))
    }

    async fn update_permissions(
        &self,
        id: RoleId,
        permissions: Vec<Permission>,
    ) -> AppResult<Option<Role>> {
        let Some(model) = RoleEntity::find_by_id(id.into_uuid()).one(&self.db).await? else {
            return Ok(None);
        };

        let mut active: ActiveModel = model.into();
        active.permissions = Set(PermissionList(permissions));
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Some(Role::from(model)))
    }

    async fn delete(&self, id: RoleId) -> AppResult<Option<u64>> {
        let txn = self.db.begin().await?;

        if RoleEntity::find_by_id(id.into_uuid())
            .count(&txn)
            .await?
            == 0
        {
            return Ok(None);
        }

        let detached = UserRoleEntity::delete_many()
            .filter(user_role::Column::RoleId.eq(id.into_uuid()))
            .exec(&txn)
            .await?
            .rows_affected;
        RoleEntity::delete_by_id(id.into_uuid()).exec(&txn).await?;

        txn.commit().await?;
        Ok(Some(detached))
    }
}
