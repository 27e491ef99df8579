//! Refresh-token credential store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::entities::credential::{self, ActiveModel, Entity as CredentialEntity};
use crate::domain::Credential;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    async fn create(&self, credential: Credential) -> AppResult<Credential>;

    /// Exact token match
    async fn find_by_token(&self, token: &str) -> AppResult<Option<Credential>>;

    /// Returns the number of rows removed (0 or 1)
    async fn delete_by_token(&self, token: &str) -> AppResult<u64>;

    /// Purge rows whose expiry is at or before `now`
    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

pub struct CredentialStore {
    db: DatabaseConnection,
}

impl CredentialStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialRepository for CredentialStore {
    async fn create(&self, credential: Credential) -> AppResult<Credential> {
        let active_model = ActiveModel {
            id: Set(credential.id.into_uuid()),
            user_id: Set(credential.user_id.into_uuid()),
            token: Set(credential.token),
            expires_at: Set(credential.expires_at),
            created_at: Set(credential.created_at),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Credential::from(model))
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Credential>> {
        let model = CredentialEntity::find()
            .filter(credential::Column::Token.eq(token))
            .one(&self.db)
            .await?;

        Ok(model.map(Credential::from))
    }

    async fn delete_by_token(&self, token: &str) -> AppResult<u64> {
        let result = CredentialEntity::delete_many()
            .filter(credential::Column::Token.eq(token))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = CredentialEntity::delete_many()
            .filter(credential::Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected)
    }
}
