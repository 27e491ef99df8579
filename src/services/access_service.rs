//! Permission resolution for protected routes.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::role::union_permissions;
use crate::domain::{Permission, UserId};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait AccessService: Send + Sync {
    /// Pass when the user is an admin or any role grants one of `any_of`.
    async fn authorize(&self, user_id: UserId, any_of: &[Permission]) -> AppResult<()>;
}

/// Resolves grants from the database on every call; token claims are ignored.
pub struct AccessControl<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AccessControl<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> AccessService for AccessControl<U> {
    async fn authorize(&self, user_id: UserId, any_of: &[Permission]) -> AppResult<()> {
        let user = self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_not_found("User")?;

        if user.is_admin {
            return Ok(());
        }

        let roles = self.uow.roles().find_by_ids(user.role_ids).await?;
        let granted = union_permissions(&roles);
        if any_of.iter().any(|p| granted.contains(p)) {
            Ok(())
        } else {
            tracing::debug!(user_id = %user_id, required = ?any_of, "Permission denied");
            Err(AppError::forbidden("Forbidden: Insufficient permissions"))
        }
    }
}
