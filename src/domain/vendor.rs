//! Suppliers the hotel buys from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::id::VendorId;
use super::rules::{validate_not_blank, validate_phone};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: VendorId,
    pub name: String,
    pub email: String,
    /// Unique across vendors
    pub phone: String,
    pub address: String,
    pub contact_person: String,
    pub gstin: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vendor {
    pub fn new(input: VendorInput) -> Self {
        let now = Utc::now();
        let input = input.normalized();
        Self {
            id: VendorId::new(),
            name: input.name,
            email: input.email,
            phone: input.phone,
            address: input.address,
            contact_person: input.contact_person,
            gstin: input.gstin,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, input: VendorInput) {
        let input = input.normalized();
        self.name = input.name;
        self.email = input.email;
        self.phone = input.phone;
        self.address = input.address;
        self.contact_person = input.contact_person;
        self.gstin = input.gstin;
        self.updated_at = Utc::now();
    }
}

/// Vendor payload for create and edit
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VendorInput {
    #[validate(custom(function = "validate_not_blank", message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email"))]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(custom(function = "validate_not_blank", message = "Address is required"))]
    pub address: String,
    #[validate(custom(function = "validate_not_blank", message = "Contact Person is required"))]
    pub contact_person: String,
    #[validate(custom(function = "validate_not_blank", message = "GSTIN number is required"))]
    pub gstin: String,
}

impl VendorInput {
    fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            contact_person: self.contact_person.trim().to_string(),
            gstin: self.gstin.trim().to_string(),
        }
    }
}

/// Vendor fields echoed after creation
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VendorBrief {
    pub id: VendorId,
    pub name: String,
    pub phone: String,
}

impl From<&Vendor> for VendorBrief {
    fn from(vendor: &Vendor) -> Self {
        Self {
            id: vendor.id,
            name: vendor.name.clone(),
            phone: vendor.phone.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_payload_rules() {
        let input: VendorInput = serde_json::from_value(serde_json::json!({
            "name": " Fresh Linen Co ",
            "email": "orders@linen.example",
            "phone": "+914422334455",
            "address": "Chennai",
            "contactPerson": "Meera",
            "gstin": "33ABCDE1234F1Z5"
        }))
        .unwrap();
        assert!(input.validate().is_ok());

        let vendor = Vendor::new(input);
        assert_eq!(vendor.name, "Fresh Linen Co");
    }

    #[test]
    fn test_vendor_requires_gstin() {
        let input: VendorInput = serde_json::from_value(serde_json::json!({
            "name": "Fresh Linen Co",
            "email": "orders@linen.example",
            "phone": "+914422334455",
            "address": "Chennai",
            "contactPerson": "Meera",
            "gstin": ""
        }))
        .unwrap();
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("gstin"));
    }
}
