//! Persisted refresh-token sessions.

use chrono::{DateTime, Utc};

use super::id::{CredentialId, UserId};

/// One row per active session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub id: CredentialId,
    pub user_id: UserId,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(user_id: UserId, token: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: CredentialId::new(),
            user_id,
            token,
            expires_at,
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
