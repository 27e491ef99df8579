//! Roles: named permission bundles attached to users.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::id::RoleId;
use super::permission::Permission;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: RoleId,
    /// Stored uppercase, unique
    pub role_name: String,
    #[schema(value_type = Vec<String>)]
    pub permissions: Vec<Permission>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Role {
    pub fn new(role_name: String, permissions: Vec<Permission>) -> Self {
        let now = Utc::now();
        Self {
            id: RoleId::new(),
            role_name: normalize_role_name(&role_name),
            permissions,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Role names compare case-insensitively; the canonical form is uppercase.
pub fn normalize_role_name(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Flatten role grants into a sorted, deduplicated set.
pub fn union_permissions<'a>(roles: impl IntoIterator<Item = &'a Role>) -> BTreeSet<Permission> {
    roles
        .into_iter()
        .flat_map(|role| role.permissions.iter().copied())
        .collect()
}

/// Role payload for create and update.
///
/// Permissions travel as strings so an unknown value surfaces as a
/// validation message rather than a body parse failure.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleInput {
    #[validate(length(min = 1, message = "Role name is required"))]
    #[schema(example = "reception")]
    pub role_name: String,
    #[validate(custom(function = "validate_permission_names"))]
    #[schema(example = json!(["booking:read", "guest:read"]))]
    pub permissions: Vec<String>,
}

impl RoleInput {
    /// Parsed permissions, deduplicated in first-seen order.
    pub fn permissions(&self) -> Vec<Permission> {
        parse_distinct(&self.permissions)
    }
}

/// Permission replacement for an existing role.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RolePermissions {
    #[validate(custom(function = "validate_permission_names"))]
    #[schema(example = json!(["booking:read"]))]
    pub permissions: Vec<String>,
}

impl RolePermissions {
    pub fn permissions(&self) -> Vec<Permission> {
        parse_distinct(&self.permissions)
    }
}

fn parse_distinct(names: &[String]) -> Vec<Permission> {
    let mut seen = BTreeSet::new();
    names
        .iter()
        .filter_map(|raw| raw.parse::<Permission>().ok())
        .filter(|p| seen.insert(*p))
        .collect()
}

fn validate_permission_names(names: &[String]) -> Result<(), ValidationError> {
    match names.iter().find_map(|raw| raw.parse::<Permission>().err()) {
        Some(unknown) => {
            Err(ValidationError::new("permission").with_message(unknown.to_string().into()))
        }
        None => Ok(()),
    }
}
