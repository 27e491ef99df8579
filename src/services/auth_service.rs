//! Authentication service - token issuance, renewal and password reset.
//!
//! Access and refresh tokens carry the user's role names and flattened
//! permissions for the client's benefit only. Authorization always
//! re-resolves grants from the database (see `access_service`).

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{
    Config, ACCESS_TOKEN_TTL_SECONDS, REFRESH_TOKEN_TTL_SECONDS, RESET_TOKEN_TTL_SECONDS,
};
use crate::domain::role::union_permissions;
use crate::domain::rules::normalize_email;
use crate::domain::{Credential, Password, Permission, User, UserId};
use crate::errors::{AppError, AppResult};
use crate::infra::{EmailJob, Mailer, UnitOfWork};

/// Verified against when the email is unknown so both paths cost one hash.
static DUMMY_HASH: Lazy<String> = Lazy::new(|| {
    Password::new("Dummy@Passw0rd")
        .map(Password::into_string)
        .unwrap_or_default()
});

/// JWT claims payload shared by access and refresh tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: UserId,
    pub roles: Vec<String>,
    pub permission: Vec<Permission>,
    pub exp: i64,
    pub iat: i64,
    /// Only set on refresh tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ResetClaims {
    id: UserId,
    exp: i64,
    iat: i64,
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub username: String,
    pub access_token: String,
    pub refresh_token: String,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Verify credentials, persist a refresh session and mint both tokens
    async fn login(&self, email: String, password: String) -> AppResult<LoginOutcome>;

    /// Exchange a stored refresh token for a new access token
    async fn refresh(&self, refresh_token: Option<String>) -> AppResult<String>;

    /// Forget the refresh session; succeeds without one
    async fn logout(&self, refresh_token: Option<String>) -> AppResult<()>;

    fn verify_access_token(&self, token: &str) -> AppResult<Claims>;

    /// Mail a short-lived reset link
    async fn request_password_reset(&self, email: String) -> AppResult<()>;

    async fn reset_password(&self, token: String, new_password: String) -> AppResult<()>;
}

/// Role names and permissions embedded in tokens
struct Grants {
    roles: Vec<String>,
    permission: Vec<Permission>,
}

fn sign(claims: &impl Serialize, secret: &[u8]) -> AppResult<String> {
    Ok(encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret),
    )?)
}

fn verify<T: for<'de> Deserialize<'de>>(
    token: &str,
    secret: &[u8],
) -> Result<T, jsonwebtoken::errors::Error> {
    decode::<T>(token, &DecodingKey::from_secret(secret), &Validation::default())
        .map(|data| data.claims)
}

pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    mailer: Arc<dyn Mailer>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, mailer: Arc<dyn Mailer>, config: Config) -> Self {
        Self {
            uow,
            mailer,
            config,
        }
    }

    async fn grants_of(&self, user: &User) -> AppResult<Grants> {
        let roles = self.uow.roles().find_by_ids(user.role_ids.clone()).await?;

        let mut seen = BTreeSet::new();
        let names = roles
            .iter()
            .map(|role| role.role_name.clone())
            .filter(|name| seen.insert(name.clone()))
            .collect();

        Ok(Grants {
            roles: names,
            permission: union_permissions(&roles).into_iter().collect(),
        })
    }

    fn claims(&self, user_id: UserId, grants: &Grants, ttl: i64, jti: Option<Uuid>) -> Claims {
        let now = Utc::now();
        Claims {
            id: user_id,
            roles: grants.roles.clone(),
            permission: grants.permission.clone(),
            exp: (now + Duration::seconds(ttl)).timestamp(),
            iat: now.timestamp(),
            jti,
        }
    }

    fn access_token(&self, user_id: UserId, grants: &Grants) -> AppResult<String> {
        let claims = self.claims(user_id, grants, ACCESS_TOKEN_TTL_SECONDS, None);
        sign(&claims, self.config.access_secret_bytes())
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn login(&self, email: String, password: String) -> AppResult<LoginOutcome> {
        let user = self.uow.users().find_by_email(&normalize_email(&email)).await?;

        let stored = Password::from_hash(match &user {
            Some(user) => user.password_hash.clone(),
            None => DUMMY_HASH.clone(),
        });
        let password_valid = stored.verify(&password);

        let user = match user {
            Some(user) if password_valid => user,
            _ => return Err(AppError::InvalidCredentials),
        };

        let grants = self.grants_of(&user).await?;
        let access_token = self.access_token(user.id, &grants)?;

        let refresh_claims =
            self.claims(user.id, &grants, REFRESH_TOKEN_TTL_SECONDS, Some(Uuid::new_v4()));
        let refresh_token = sign(&refresh_claims, self.config.refresh_secret_bytes())?;

        let now = Utc::now();
        let purged = self.uow.credentials().delete_expired(now).await?;
        if purged > 0 {
            tracing::debug!(purged, "Removed expired refresh sessions");
        }

        let expires_at = now + Duration::seconds(REFRESH_TOKEN_TTL_SECONDS);
        self.uow
            .credentials()
            .create(Credential::new(user.id, refresh_token.clone(), expires_at))
            .await?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(LoginOutcome {
            username: user.name,
            access_token,
            refresh_token,
        })
    }

    async fn refresh(&self, refresh_token: Option<String>) -> AppResult<String> {
        let token = refresh_token.ok_or_else(|| AppError::unauthorized("unauthorized"))?;
        let forbidden = || AppError::forbidden("forbidden");

        let credential = self
            .uow
            .credentials()
            .find_by_token(&token)
            .await?
            .ok_or_else(forbidden)?;
        if credential.is_expired(Utc::now()) {
            return Err(forbidden());
        }

        let claims: Claims = verify(&token, self.config.refresh_secret_bytes()).map_err(|e| {
            tracing::debug!(error = %e, "Refresh token rejected");
            forbidden()
        })?;
        if claims.id != credential.user_id {
            tracing::warn!(credential = %credential.id, "Refresh token owner mismatch");
            return Err(forbidden());
        }

        let user = self
            .uow
            .users()
            .find_by_id(claims.id)
            .await?
            .ok_or_else(forbidden)?;
        let grants = self.grants_of(&user).await?;
        self.access_token(user.id, &grants)
    }

    async fn logout(&self, refresh_token: Option<String>) -> AppResult<()> {
        if let Some(token) = refresh_token {
            let removed = self.uow.credentials().delete_by_token(&token).await?;
            tracing::debug!(removed, "Refresh session closed");
        }
        Ok(())
    }

    fn verify_access_token(&self, token: &str) -> AppResult<Claims> {
        verify(token, self.config.access_secret_bytes()).map_err(|e| {
            tracing::debug!(error = %e, "Access token rejected");
            AppError::forbidden("Invalid token")
        })
    }

    async fn request_password_reset(&self, email: String) -> AppResult<()> {
        let user = self
            .uow
            .users()
            .find_by_email(&normalize_email(&email))
            .await?
            .ok_or_else(|| AppError::NotFound("user not exist".to_string()))?;

        let now = Utc::now();
        let claims = ResetClaims {
            id: user.id,
            exp: (now + Duration::seconds(RESET_TOKEN_TTL_SECONDS)).timestamp(),
            iat: now.timestamp(),
        };
        let token = sign(&claims, self.config.reset_secret_bytes())?;

        self.mailer
            .send(EmailJob::password_reset(
                &user.email,
                &self.config.frontend_url,
                &token,
            ))
            .await?;
        tracing::info!(user_id = %user.id, "Password reset link issued");
        Ok(())
    }

    async fn reset_password(&self, token: String, new_password: String) -> AppResult<()> {
        let claims: ResetClaims =
            verify(&token, self.config.reset_secret_bytes()).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    AppError::unauthorized("Token has expired. Please request a new one.")
                }
                _ => AppError::unauthorized("Invalid token. Please try again."),
            })?;

        let user = self
            .uow
            .users()
            .find_by_id(claims.id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        let hash = Password::new(&new_password)?.into_string();
        self.uow.users().update_password(user.id, hash).await?;
        tracing::info!(user_id = %user.id, "Password reset completed");
        Ok(())
    }
}
