//! Checked-in guests.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::id::GuestId;
use super::rules::{iso_day, validate_not_blank, validate_not_future, validate_phone};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: GuestId,
    pub name: String,
    pub email: String,
    /// Unique across guests
    pub phone: String,
    pub dob: NaiveDate,
    pub address: String,
    /// Object keys under the `guest` folder
    pub documents: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Guest {
    /// New guest without documents; keys are attached once uploads are confirmed.
    pub fn new(details: GuestDetails) -> Self {
        let now = Utc::now();
        Self {
            id: GuestId::new(),
            name: details.name,
            email: details.email,
            phone: details.phone,
            dob: details.dob,
            address: details.address,
            documents: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, details: GuestDetails) {
        self.name = details.name;
        self.email = details.email;
        self.phone = details.phone;
        self.dob = details.dob;
        self.address = details.address;
        self.updated_at = Utc::now();
    }
}

/// Editable guest fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub dob: NaiveDate,
    pub address: String,
}

/// Guest registration at check-in
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGuest {
    #[validate(custom(function = "validate_not_blank", message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    #[schema(example = "+919876543210")]
    pub phone: String,
    #[serde(deserialize_with = "iso_day::deserialize")]
    #[validate(custom(function = "validate_not_future"))]
    #[schema(value_type = String, format = Date)]
    pub dob: NaiveDate,
    #[validate(custom(function = "validate_not_blank", message = "Address is required"))]
    pub address: String,
    /// Original file names to request upload URLs for
    #[validate(length(min = 1, message = "At least one document is required"))]
    pub documents: Vec<String>,
}

impl CreateGuest {
    pub fn details(&self) -> GuestDetails {
        GuestDetails {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            dob: self.dob,
            address: self.address.trim().to_string(),
        }
    }
}

/// Guest edit; `documents` lists new files to upload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGuest {
    #[validate(custom(function = "validate_not_blank", message = "Guest Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[serde(deserialize_with = "iso_day::deserialize")]
    #[schema(value_type = String, format = Date)]
    pub dob: NaiveDate,
    #[validate(custom(function = "validate_not_blank", message = "Guest Address is required"))]
    pub address: String,
    #[serde(default)]
    pub documents: Vec<String>,
}

impl UpdateGuest {
    pub fn details(&self) -> GuestDetails {
        GuestDetails {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            dob: self.dob,
            address: self.address.trim().to_string(),
        }
    }
}

/// Guest fields echoed after an edit
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuestView {
    pub id: GuestId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub dob: NaiveDate,
    pub address: String,
}

impl From<&Guest> for GuestView {
    fn from(guest: &Guest) -> Self {
        Self {
            id: guest.id,
            name: guest.name.clone(),
            email: guest.email.clone(),
            phone: guest.phone.clone(),
            dob: guest.dob,
            address: guest.address.clone(),
        }
    }
}

/// Guest fields echoed after files are attached
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuestFiles {
    pub id: GuestId,
    pub name: String,
    pub phone: String,
    pub documents: Vec<String>,
}

impl From<Guest> for GuestFiles {
    fn from(guest: Guest) -> Self {
        Self {
            id: guest.id,
            name: guest.name,
            phone: guest.phone,
            documents: guest.documents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> serde_json::Value {
        serde_json::json!({
            "name": "Asha Rao",
            "email": "asha@example.com",
            "phone": "+919876543210",
            "dob": "1990-04-12T00:00:00.000Z",
            "address": "12 MG Road",
            "documents": ["passport.pdf"]
        })
    }

    #[test]
    fn test_create_guest_accepts_iso_timestamp_dob() {
        let guest: CreateGuest = serde_json::from_value(payload()).unwrap();
        assert!(guest.validate().is_ok());
        assert_eq!(guest.dob, NaiveDate::from_ymd_opt(1990, 4, 12).unwrap());
    }

    #[test]
    fn test_create_guest_requires_documents() {
        let mut body = payload();
        body["documents"] = serde_json::json!([]);
        let guest: CreateGuest = serde_json::from_value(body).unwrap();

        let errors = guest.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("documents"));
    }

    #[test]
    fn test_blank_name_uses_field_message() {
        let mut body = payload();
        body["name"] = serde_json::json!("  ");
        let guest: CreateGuest = serde_json::from_value(body).unwrap();

        let errors = guest.validate().unwrap_err();
        let message = errors.field_errors()["name"][0].message.clone().unwrap();
        assert_eq!(message, "Name is required");
    }

    #[test]
    fn test_new_guest_starts_without_documents() {
        let input: CreateGuest = serde_json::from_value(payload()).unwrap();
        let guest = Guest::new(input.details());
        assert!(guest.documents.is_empty());
        assert_eq!(guest.phone, "+919876543210");
    }
}
