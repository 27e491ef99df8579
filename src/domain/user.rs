//! Back-office user entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::id::{RoleId, UserId};
use super::password::validate_password_policy;
use super::role::Role;
use super::rules::{validate_staff_phone, validate_username};

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Bypasses every permission check
    pub is_admin: bool,
    pub role_ids: Vec<RoleId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with no roles
    pub fn new(name: String, email: String, phone: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            name,
            email,
            phone,
            password_hash,
            is_admin: false,
            role_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_roles(mut self, role_ids: Vec<RoleId>) -> Self {
        self.role_ids = role_ids;
        self
    }

    pub fn as_admin(mut self) -> Self {
        self.is_admin = true;
        self
    }
}

/// User creation data transfer object
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[validate(
        length(min = 3, message = "Must be at least 3 characters"),
        custom(function = "validate_username")
    )]
    #[schema(example = "front_desk")]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "desk@hotel.example")]
    pub email: String,
    #[validate(custom(function = "validate_staff_phone"))]
    #[schema(example = "9876543210")]
    pub phone: String,
    #[validate(custom(function = "validate_password_policy"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
    #[validate(length(min = 1, message = "At least one role must be selected"))]
    pub roles: Vec<RoleId>,
}

/// Profile and role changes made by an administrator
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[validate(
        length(min = 3, message = "Must be at least 3 characters"),
        custom(function = "validate_username")
    )]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(custom(function = "validate_staff_phone"))]
    pub phone: String,
    #[validate(length(min = 1, message = "At least one role must be selected"))]
    pub roles: Vec<RoleId>,
}

/// Self-service password change
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePassword {
    #[validate(length(min = 8, message = "Password must be at least 8 characters long"))]
    pub old_password: String,
    #[validate(custom(function = "validate_password_policy"))]
    pub new_password: String,
}

/// The caller's own profile
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub is_admin: bool,
    /// Names of the attached roles
    pub roles: Vec<String>,
}

impl UserProfile {
    pub fn new(user: User, roles: &[Role]) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            is_admin: user.is_admin,
            roles: roles.iter().map(|r| r.role_name.clone()).collect(),
        }
    }
}

/// Role reference shown next to a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleBadge {
    pub id: RoleId,
    pub role_name: String,
}

impl From<&Role> for RoleBadge {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id,
            role_name: role.role_name.clone(),
        }
    }
}

/// User row in the administration list
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub roles: Vec<RoleBadge>,
    pub created_at: DateTime<Utc>,
}

impl UserSummary {
    /// Pair a user with the roles it references; unknown ids are dropped.
    pub fn new(user: User, roles: &[Role]) -> Self {
        let badges = user
            .role_ids
            .iter()
            .filter_map(|id| roles.iter().find(|r| r.id == *id))
            .map(RoleBadge::from)
            .collect();
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            roles: badges,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Permission;

    fn create_payload() -> CreateUser {
        CreateUser {
            name: "front_desk".to_string(),
            email: "desk@hotel.example".to_string(),
            phone: "9876543210".to_string(),
            password: "SecurePass123!".to_string(),
            roles: vec![RoleId::new()],
        }
    }

    #[test]
    fn test_valid_create_payload() {
        assert!(create_payload().validate().is_ok());
    }

    #[test]
    fn test_create_payload_requires_roles() {
        let payload = CreateUser {
            roles: vec![],
            ..create_payload()
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("roles"));
    }

    #[test]
    fn test_create_payload_rejects_bad_fields() {
        let payload = CreateUser {
            name: "front desk".to_string(),
            phone: "12345".to_string(),
            password: "weak".to_string(),
            ..create_payload()
        };
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("phone"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_summary_drops_unknown_roles() {
        let role = Role::new("RECEPTION".to_string(), vec![Permission::BookingRead]);
        let user = User::new(
            "asha".to_string(),
            "asha@hotel.example".to_string(),
            "9876543210".to_string(),
            "hash".to_string(),
        )
        .with_roles(vec![role.id, RoleId::new()]);

        let summary = UserSummary::new(user, std::slice::from_ref(&role));
        assert_eq!(summary.roles, vec![RoleBadge::from(&role)]);
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User::new(
            "asha".to_string(),
            "asha@hotel.example".to_string(),
            "9876543210".to_string(),
            "secret-hash".to_string(),
        );
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
