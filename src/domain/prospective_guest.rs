//! Sales prospects tracked before they book.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::id::ProspectiveGuestId;
use super::rules::{validate_not_blank, validate_phone};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProspectiveGuest {
    pub id: ProspectiveGuestId,
    pub name: String,
    pub email: Option<String>,
    /// Unique across prospects
    pub phone: String,
    pub company: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProspectiveGuest {
    pub fn new(input: ProspectiveGuestInput) -> Self {
        let now = Utc::now();
        Self {
            id: ProspectiveGuestId::new(),
            name: input.name.trim().to_string(),
            email: Some(input.email.trim().to_string()),
            phone: input.phone.trim().to_string(),
            company: input.company.trim().to_string(),
            description: Some(input.description.trim().to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, input: ProspectiveGuestInput) {
        self.name = input.name.trim().to_string();
        self.email = Some(input.email.trim().to_string());
        self.phone = input.phone.trim().to_string();
        self.company = input.company.trim().to_string();
        self.description = Some(input.description.trim().to_string());
        self.updated_at = Utc::now();
    }
}

/// Prospect payload for create and edit
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProspectiveGuestInput {
    #[validate(custom(function = "validate_not_blank", message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(custom(function = "validate_not_blank", message = "Company is required"))]
    pub company: String,
    #[validate(custom(function = "validate_not_blank", message = "Description is required"))]
    pub description: String,
}

/// `{id, name}` pair for pickers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ProspectName {
    pub id: ProspectiveGuestId,
    pub name: String,
}

impl From<ProspectiveGuest> for ProspectName {
    fn from(prospect: ProspectiveGuest) -> Self {
        Self {
            id: prospect.id,
            name: prospect.name,
        }
    }
}
