//! Purchases made from vendors, with invoices attached as documents.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::id::{PurchaseId, VendorId};
use super::rules::{iso_instant, validate_not_blank};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: PurchaseId,
    pub vendor_id: VendorId,
    pub item: String,
    pub quantity: String,
    pub invoice_number: String,
    pub warranty_period: String,
    pub value: String,
    pub purchase_date: DateTime<Utc>,
    /// Object keys under the `purchases` folder
    pub documents: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Purchase {
    pub fn new(vendor_id: VendorId, input: &PurchaseInput) -> Self {
        let now = Utc::now();
        Self {
            id: PurchaseId::new(),
            vendor_id,
            item: input.item.trim().to_string(),
            quantity: input.quantity.trim().to_string(),
            invoice_number: input.invoice_number.trim().to_string(),
            warranty_period: input.warranty_period.trim().to_string(),
            value: input.value.trim().to_string(),
            purchase_date: input.purchase_date,
            documents: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, input: &PurchaseInput) {
        self.item = input.item.trim().to_string();
        self.quantity = input.quantity.trim().to_string();
        self.invoice_number = input.invoice_number.trim().to_string();
        self.warranty_period = input.warranty_period.trim().to_string();
        self.value = input.value.trim().to_string();
        self.purchase_date = input.purchase_date;
        self.updated_at = Utc::now();
    }
}

/// Purchase payload for create and edit; `documents` lists new files to upload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseInput {
    #[serde(deserialize_with = "iso_instant::deserialize")]
    #[schema(value_type = String, format = DateTime)]
    pub purchase_date: DateTime<Utc>,
    #[validate(custom(function = "validate_not_blank", message = "Purchase item is required"))]
    pub item: String,
    #[validate(custom(function = "validate_not_blank", message = "Purchase quantity is required"))]
    pub quantity: String,
    #[validate(custom(function = "validate_not_blank", message = "Invoice Number is required"))]
    pub invoice_number: String,
    #[validate(custom(function = "validate_not_blank", message = "Warranty period is required"))]
    pub warranty_period: String,
    #[validate(custom(function = "validate_not_blank", message = "Purchase value is required"))]
    pub value: String,
    #[serde(default)]
    pub documents: Vec<String>,
}

/// Vendor fields joined onto a purchase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VendorSnapshot {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub gstin: String,
}

/// Purchase with its vendor, as listings return it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseWithVendor {
    #[serde(flatten)]
    pub purchase: Purchase,
    pub vendor: VendorSnapshot,
}

/// Filters accepted by the purchase listing; both bounds are inclusive days
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurchaseFilter {
    pub search: Option<String>,
    pub start_day: Option<NaiveDate>,
    pub end_day: Option<NaiveDate>,
}
