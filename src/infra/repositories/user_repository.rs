//! User repository: users and their role links.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::base::fetch_page;
use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::entities::user_role::{self, Entity as UserRoleEntity};
use crate::domain::{RoleId, User, UserId};
use crate::errors::{AppError, AppResult};
use crate::types::PageRequest;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const UNIQUE_FIELDS: &[(&str, &str)] = &[
    ("email", "Email already exists."),
    ("phone", "Phone number already exists."),
];

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Exact match; callers pass the address through `normalize_email`
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Non-admin users, newest first, with the total count
    async fn list_non_admin(&self, page: PageRequest) -> AppResult<(Vec<User>, u64)>;

    /// Insert the user together with its role links
    async fn create(&self, user: User) -> AppResult<User>;

    /// Overwrite profile fields and replace the role links
    async fn update(&self, user: User) -> AppResult<User>;

    async fn update_password(&self, id: UserId, password_hash: String) -> AppResult<()>;

    /// Returns false when no such user existed
    async fn delete(&self, id: UserId) -> AppResult<bool>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn role_ids_of<C: ConnectionTrait>(
        conn: &C,
        user_ids: Vec<Uuid>,
    ) -> AppResult<HashMap<Uuid, Vec<RoleId>>> {
        let links = UserRoleEntity::find()
            .filter(user_role::Column::UserId.is_in(user_ids))
            .all(conn)
            .await?;

        let mut by_user: HashMap<Uuid, Vec<RoleId>> = HashMap::new();
        for link in links {
            by_user
                .entry(link.user_id)
                .or_default()
                .push(RoleId::from_uuid(link.role_id));
        }
        Ok(by_user)
    }

    async fn hydrate(&self, model: Option<user::Model>) -> AppResult<Option<User>> {
        let Some(model) = model else {
            return Ok(None);
        };
        let mut roles = Self::role_ids_of(&self.db, vec![model.id]).await?;
        let role_ids = roles.remove(&model.id).unwrap_or_default();
        Ok(Some(model.into_user(role_ids)))
    }

    async fn link_roles<C: ConnectionTrait>(conn: &C, user: &User) -> AppResult<()> {
        if user.role_ids.is_empty() {
            return Ok(());
        }
        let links = user.role_ids.iter().map(|role_id| user_role::ActiveModel {
            user_id: Set(user.id.into_uuid()),
            role_id: Set(role_id.into_uuid()),
        });
        UserRoleEntity::insert_many(links).exec(conn).await?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        let model = UserEntity::find_by_id(id.into_uuid())
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        self.hydrate(model).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let model = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        self.hydrate(model).await
    }

    async fn list_non_admin(&self, page: PageRequest) -> AppResult<(Vec<User>, u64)> {
        let select = UserEntity::find()
            .filter(user::Column::IsAdmin.eq(false))
            .order_by_desc(user::Column::CreatedAt);
        let (models, total) = fetch_page(&self.db, select, page).await?;

        let ids = models.iter().map(|m| m.id).collect();
        let mut roles = Self::role_ids_of(&self.db, ids).await?;
        let users = models
            .into_iter()
            .map(|m| {
                let role_ids = roles.remove(&m.id).unwrap_or_default();
                m.into_user(role_ids)
            })
            .collect();

        Ok((users, total))
    }

    async fn create(&self, user: User) -> AppResult<User> {
        let txn = self.db.begin().await?;

        let active_model = ActiveModel {
            id: Set(user.id.into_uuid()),
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            phone: Set(user.phone.clone()),
            password_hash: Set(user.password_hash.clone()),
            is_admin: Set(user.is_admin),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        };
        active_model
            .insert(&txn)
            .await
            .map_err(|e| AppError::from_unique_violation(e, UNIQUE_FIELDS))?;
        Self::link_roles(&txn, &user).await?;

        txn.commit().await?;
        Ok(user)
    }

    async fn update(&self, mut user: User) -> AppResult<User> {
        let txn = self.db.begin().await?;
        user.updated_at = Utc::now();

        let active_model = ActiveModel {
            id: Set(user.id.into_uuid()),
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            phone: Set(user.phone.clone()),
            updated_at: Set(user.updated_at),
            ..Default::default()
        };
        active_model
            .update(&txn)
            .await
            .map_err(|e| AppError::from_unique_violation(e, UNIQUE_FIELDS))?;

        UserRoleEntity::delete_many()
            .filter(user_role::Column::UserId.eq(user.id.into_uuid()))
            .exec(&txn)
            .await?;
        Self::link_roles(&txn, &user).await?;

        txn.commit().await?;
        Ok(user)
    }

    async fn update_password(&self, id: UserId, password_hash: String) -> AppResult<()> {
        let active_model = ActiveModel {
            id: Set(id.into_uuid()),
            password_hash: Set(password_hash),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        active_model.update(&self.db).await.map_err(AppError::from)?;
        Ok(())
    }

    async fn delete(&self, id: UserId) -> AppResult<bool> {
        let result = UserEntity::delete_by_id(id.into_uuid())
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }
}
