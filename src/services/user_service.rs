//! User service - staff accounts and self-service password changes.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;

use super::parallel;
use crate::domain::rules::normalize_email;
use crate::domain::{
    ChangePassword, CreateUser, Password, Role, RoleBadge, RoleId, UpdateUser, User, UserId,
    UserProfile, UserSummary,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{EmailJob, Mailer, UnitOfWork};
use crate::types::{PageRequest, Paginated};

/// One page of staff plus every role for the assignment picker
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDirectory {
    #[serde(flatten)]
    pub users: Paginated<UserSummary>,
    pub all_roles: Vec<RoleBadge>,
}

#[async_trait]
pub trait UserService: Send + Sync {
    async fn profile(&self, id: UserId) -> AppResult<UserProfile>;

    /// Non-admin users, newest first
    async fn list_users(&self, page: PageRequest) -> AppResult<UserDirectory>;

    async fn create_user(&self, input: CreateUser) -> AppResult<UserSummary>;

    async fn update_user(&self, id: UserId, input: UpdateUser) -> AppResult<UserSummary>;

    async fn delete_user(&self, id: UserId) -> AppResult<()>;

    /// Change the caller's own password after checking the current one
    async fn change_password(&self, id: UserId, input: ChangePassword) -> AppResult<()>;
}

pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
    mailer: Arc<dyn Mailer>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>, mailer: Arc<dyn Mailer>) -> Self {
        Self { uow, mailer }
    }

    /// Load the requested roles, failing when any id is unknown.
    async fn require_roles(&self, ids: &[RoleId]) -> AppResult<(Vec<RoleId>, Vec<Role>)> {
        let mut seen = BTreeSet::new();
        let distinct: Vec<RoleId> = ids
            .iter()
            .copied()
            .filter(|id| seen.insert(id.into_uuid()))
            .collect();

        let roles = self.uow.roles().find_by_ids(distinct.clone()).await?;
        if roles.len() != distinct.len() {
            return Err(AppError::bad_request("Invalid roles"));
        }
        Ok((distinct, roles))
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn profile(&self, id: UserId) -> AppResult<UserProfile> {
        let user = self.uow.users().find_by_id(id).await?.ok_or_not_found("User")?;
        let roles = self.uow.roles().find_by_ids(user.role_ids.clone()).await?;
        Ok(UserProfile::new(user, &roles))
    }

    async fn list_users(&self, page: PageRequest) -> AppResult<UserDirectory> {
        let (users, roles) = (self.uow.users(), self.uow.roles());
        let ((users, total), roles) =
            parallel::join2(users.list_non_admin(page), roles.list()).await?;

        let summaries = users
            .into_iter()
            .map(|user| UserSummary::new(user, &roles))
            .collect();
        Ok(UserDirectory {
            users: Paginated::new(summaries, page, total),
            all_roles: roles.iter().map(RoleBadge::from).collect(),
        })
    }

    async fn create_user(&self, input: CreateUser) -> AppResult<UserSummary> {
        let (role_ids, roles) = self.require_roles(&input.roles).await?;
        let password_hash = Password::new(&input.password)?.into_string();

        let user = User::new(
            input.name.trim().to_string(),
            normalize_email(&input.email),
            input.phone.trim().to_string(),
            password_hash,
        )
        .with_roles(role_ids);

        let created = self.uow.users().create(user).await?;
        tracing::info!(user_id = %created.id, "User created");
        Ok(UserSummary::new(created, &roles))
    }

    async fn update_user(&self, id: UserId, input: UpdateUser) -> AppResult<UserSummary> {
        let mut user = self.uow.users().find_by_id(id).await?.ok_or_not_found("User")?;
        let (role_ids, roles) = self.require_roles(&input.roles).await?;

        user.name = input.name.trim().to_string();
        user.email = normalize_email(&input.email);
        user.phone = input.phone.trim().to_string();
        user.role_ids = role_ids;
        user.updated_at = Utc::now();

        let updated = self.uow.users().update(user).await?;
        Ok(UserSummary::new(updated, &roles))
    }

    async fn delete_user(&self, id: UserId) -> AppResult<()> {
        if !self.uow.users().delete(id).await? {
            return Err(AppError::not_found("User"));
        }
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    async fn change_password(&self, id: UserId, input: ChangePassword) -> AppResult<()> {
        let user = self.uow.users().find_by_id(id).await?.ok_or_not_found("User")?;

        if !Password::from_hash(user.password_hash.clone()).verify(&input.old_password) {
            return Err(AppError::bad_request("Icorrect Password"));
        }

        let hash = Password::new(&input.new_password)?.into_string();
        self.uow.users().update_password(user.id, hash).await?;

        // The change is already stored; a lost confirmation mail is not fatal.
        if let Err(e) = self
            .mailer
            .send(EmailJob::password_changed(&user.email, Utc::now()))
            .await
        {
            tracing::warn!(error = %e, user_id = %user.id, "Password change mail failed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Permission;
    use crate::infra::{MockMailer, MockRoleRepository, MockUnitOfWork, MockUserRepository};

    fn staff(password_hash: String) -> User {
        User::new(
            "asha".into(),
            "asha@hotel.example".into(),
            "9876543210".into(),
            password_hash,
        )
    }

    fn uow_with(users: MockUserRepository, roles: MockRoleRepository) -> Arc<MockUnitOfWork> {
        let (users, roles) = (Arc::new(users), Arc::new(roles));
        let mut uow = MockUnitOfWork::new();
        uow.expect_users().returning(move || users.clone());
        uow.expect_roles().returning(move || roles.clone());
        Arc::new(uow)
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_role() {
        let known = Role::new("desk".into(), vec![Permission::GuestRead]);
        let mut roles = MockRoleRepository::new();
        let found = known.clone();
        roles
            .expect_find_by_ids()
            .returning(move |_| Ok(vec![found.clone()]));
        let mut users = MockUserRepository::new();
        users.expect_create().never();

        let manager = UserManager::new(uow_with(users, roles), Arc::new(MockMailer::new()));
        let err = manager
            .create_user(CreateUser {
                name: "ravi".into(),
                email: "ravi@hotel.example".into(),
                phone: "9123456780".into(),
                password: "SecurePass123!".into(),
                roles: vec![known.id, RoleId::new()],
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid roles");
    }

    #[tokio::test]
    async fn test_change_password_checks_current() {
        let user = staff(Password::new("SecurePass123!").unwrap().into_string());
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        users.expect_update_password().never();

        let manager = UserManager::new(
            uow_with(users, MockRoleRepository::new()),
            Arc::new(MockMailer::new()),
        );
        let err = manager
            .change_password(
                UserId::new(),
                ChangePassword {
                    old_password: "NotMyPass1!".into(),
                    new_password: "Another@Pass9".into(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Icorrect Password");
    }

    #[tokio::test]
    async fn test_change_password_stores_hash_and_mails() {
        let user = staff(Password::new("SecurePass123!").unwrap().into_string());
        let user_id = user.id;
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        users
            .expect_update_password()
            .withf(move |id, hash| {
                *id == user_id && Password::from_hash(hash.clone()).verify("Another@Pass9")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|job| job.subject == "Grand Regency Password Reset Successful")
            .times(1)
            .returning(|_| Err(AppError::internal("relay down")));

        let manager = UserManager::new(uow_with(users, MockRoleRepository::new()), Arc::new(mailer));
        manager
            .change_password(
                user_id,
                ChangePassword {
                    old_password: "SecurePass123!".into(),
                    new_password: "Another@Pass9".into(),
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_pairs_users_with_role_badges() {
        let role = Role::new("desk".into(), vec![]);
        let user = staff("hash".into()).with_roles(vec![role.id]);

        let mut users = MockUserRepository::new();
        users
            .expect_list_non_admin()
            .returning(move |_| Ok((vec![user.clone()], 7)));
        let mut roles = MockRoleRepository::new();
        roles.expect_list().returning(move || Ok(vec![role.clone()]));

        let manager = UserManager::new(uow_with(users, roles), Arc::new(MockMailer::new()));
        let directory = manager
            .list_users(PageRequest { page: 1, limit: 3 })
            .await
            .unwrap();

        assert_eq!(directory.users.meta.total_pages, 3);
        assert_eq!(directory.users.data[0].roles[0].role_name, "DESK");
        assert_eq!(directory.all_roles.len(), 1);
    }
}
