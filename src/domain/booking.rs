//! Bookings: a guest's stay with co-stayers, cost ledgers and documents.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::document::detach_documents;
use super::id::{BookingId, GuestId, ProspectiveGuestId};
use super::rules::{iso_day, iso_instant, validate_not_blank};
use crate::errors::AppError;

/// Someone sharing the guest's room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoStayer {
    #[validate(custom(function = "validate_not_blank", message = "Co-stayer name is required"))]
    pub name: String,
    #[validate(custom(function = "validate_not_blank", message = "Relation is required"))]
    pub relation: String,
    #[serde(deserialize_with = "iso_day::deserialize")]
    #[schema(value_type = String, format = Date)]
    pub dob: NaiveDate,
}

/// One line of a cost ledger. The cost is kept as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostItem {
    #[validate(custom(function = "validate_not_blank", message = "Item is required"))]
    pub item: String,
    #[validate(custom(function = "validate_not_blank", message = "Cost is required"))]
    pub cost: String,
}

/// Which ledger a cost belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CostKind {
    #[serde(rename = "additionalPurchase")]
    AdditionalPurchase,
    #[serde(rename = "damageCost")]
    DamageCost,
}

impl CostKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CostKind::AdditionalPurchase => "additionalPurchase",
            CostKind::DamageCost => "damageCost",
        }
    }

    pub fn duplicate_message(&self) -> &'static str {
        match self {
            CostKind::AdditionalPurchase => "Item already exists in additional purchases.",
            CostKind::DamageCost => "Item already exists in damage costs.",
        }
    }

    pub fn added_message(&self) -> &'static str {
        match self {
            CostKind::AdditionalPurchase => "Additional purchase added successfully",
            CostKind::DamageCost => "Damage cost added successfully",
        }
    }

    pub fn removed_message(&self) -> &'static str {
        match self {
            CostKind::AdditionalPurchase => "purchase cost removed successfully",
            CostKind::DamageCost => "Damage cost removed successfully",
        }
    }
}

impl fmt::Display for CostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CostKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "additionalPurchase" => Ok(CostKind::AdditionalPurchase),
            "damageCost" => Ok(CostKind::DamageCost),
            _ => Err(AppError::bad_request("Invalid cost type")),
        }
    }
}

/// Denormalized link to the prospect a booking came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProspectiveGuestRef {
    pub id: ProspectiveGuestId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub guest_id: GuestId,
    pub check_in_date: DateTime<Utc>,
    pub check_out_date: DateTime<Utc>,
    pub grc_number: String,
    pub room_number: String,
    pub co_stayers: Vec<CoStayer>,
    pub additional_purchase: Vec<CostItem>,
    pub damage_cost: Vec<CostItem>,
    /// Object keys under the `booking` folder
    pub documents: Vec<String>,
    pub prospective_guest: Option<ProspectiveGuestRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(guest_id: GuestId, input: &CreateBooking) -> Self {
        let now = Utc::now();
        Self {
            id: BookingId::new(),
            guest_id,
            check_in_date: input.check_in_date,
            check_out_date: input.check_out_date,
            grc_number: input.grc_number.trim().to_string(),
            room_number: input.room_number.trim().to_string(),
            co_stayers: input.co_stayers.clone(),
            additional_purchase: input.additional_purchase.clone(),
            damage_cost: input.damage_cost.clone(),
            documents: Vec::new(),
            prospective_guest: input.prospective_guest.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an edit. Cost ledgers are untouched and an absent prospect
    /// reference leaves the existing one in place.
    pub fn apply(&mut self, input: &UpdateBooking) {
        self.check_in_date = input.check_in_date;
        self.check_out_date = input.check_out_date;
        self.grc_number = input.grc_number.trim().to_string();
        self.room_number = input.room_number.trim().to_string();
        self.co_stayers = input.co_stayers.clone();
        if let Some(prospect) = &input.prospective_guest {
            self.prospective_guest = Some(prospect.clone());
        }
        self.updated_at = Utc::now();
    }

    pub fn ledger(&self, kind: CostKind) -> &[CostItem] {
        match kind {
            CostKind::AdditionalPurchase => &self.additional_purchase,
            CostKind::DamageCost => &self.damage_cost,
        }
    }

    fn ledger_mut(&mut self, kind: CostKind) -> &mut Vec<CostItem> {
        match kind {
            CostKind::AdditionalPurchase => &mut self.additional_purchase,
            CostKind::DamageCost => &mut self.damage_cost,
        }
    }

    /// Append a cost line; item names are unique within a ledger.
    pub fn add_cost(&mut self, kind: CostKind, item: CostItem) -> Result<(), AppError> {
        if self.ledger(kind).iter().any(|existing| existing.item == item.item) {
            return Err(AppError::bad_request(kind.duplicate_message()));
        }
        self.ledger_mut(kind).push(item);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Drop every line with the given item name.
    pub fn remove_cost(&mut self, kind: CostKind, item: &str) {
        self.ledger_mut(kind).retain(|existing| existing.item != item);
        self.updated_at = Utc::now();
    }
}

/// One edit to a stored booking, replayed on the current row.
#[derive(Debug, Clone)]
pub enum BookingChange {
    Details {
        input: UpdateBooking,
        removed_files: Vec<String>,
    },
    AddCost(CostKind, CostItem),
    RemoveCost(CostKind, String),
}

impl BookingChange {
    /// Mutate `booking`, returning the document keys the edit released.
    pub fn apply_to(self, booking: &mut Booking) -> Result<Vec<String>, AppError> {
        match self {
            BookingChange::Details {
                input,
                removed_files,
            } => {
                let removed = detach_documents(&mut booking.documents, &removed_files);
                booking.apply(&input);
                Ok(removed)
            }
            BookingChange::AddCost(kind, item) => {
                booking.add_cost(kind, item)?;
                Ok(Vec::new())
            }
            BookingChange::RemoveCost(kind, item) => {
                booking.remove_cost(kind, &item);
                Ok(Vec::new())
            }
        }
    }
}

fn validate_stay(check_in: &DateTime<Utc>, check_out: &DateTime<Utc>) -> Result<(), ValidationError> {
    if check_out < check_in {
        Err(ValidationError::new("stay_dates")
            .with_message("Check-out date must be on or after check-in date".into()))
    } else {
        Ok(())
    }
}

fn validate_create_stay(input: &CreateBooking) -> Result<(), ValidationError> {
    validate_stay(&input.check_in_date, &input.check_out_date)
}

fn validate_update_stay(input: &UpdateBooking) -> Result<(), ValidationError> {
    validate_stay(&input.check_in_date, &input.check_out_date)
}

/// Booking details at creation
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_create_stay", skip_on_field_errors = false))]
pub struct CreateBooking {
    #[serde(deserialize_with = "iso_instant::deserialize")]
    #[schema(value_type = String, format = DateTime)]
    pub check_in_date: DateTime<Utc>,
    #[serde(deserialize_with = "iso_instant::deserialize")]
    #[schema(value_type = String, format = DateTime)]
    pub check_out_date: DateTime<Utc>,
    #[validate(custom(function = "validate_not_blank", message = "GRC number is required"))]
    pub grc_number: String,
    #[validate(custom(function = "validate_not_blank", message = "Room number is required"))]
    pub room_number: String,
    #[serde(default)]
    #[validate(nested)]
    pub co_stayers: Vec<CoStayer>,
    /// Original file names to request upload URLs for
    #[serde(default)]
    pub documents: Vec<String>,
    #[serde(default)]
    #[validate(nested)]
    pub additional_purchase: Vec<CostItem>,
    #[serde(default)]
    #[validate(nested)]
    pub damage_cost: Vec<CostItem>,
    pub prospective_guest: Option<ProspectiveGuestRef>,
}

/// Booking edit; `documents` lists new files to upload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_update_stay", skip_on_field_errors = false))]
pub struct UpdateBooking {
    #[serde(deserialize_with = "iso_instant::deserialize")]
    #[schema(value_type = String, format = DateTime)]
    pub check_in_date: DateTime<Utc>,
    #[serde(deserialize_with = "iso_instant::deserialize")]
    #[schema(value_type = String, format = DateTime)]
    pub check_out_date: DateTime<Utc>,
    #[validate(custom(function = "validate_not_blank", message = "GRC number is required"))]
    pub grc_number: String,
    #[validate(custom(function = "validate_not_blank", message = "Room number is required"))]
    pub room_number: String,
    #[serde(default)]
    #[validate(nested)]
    pub co_stayers: Vec<CoStayer>,
    #[serde(default)]
    pub documents: Vec<String>,
    pub prospective_guest: Option<ProspectiveGuestRef>,
}

/// Guest fields joined onto a booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuestSnapshot {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub dob: NaiveDate,
}

/// Booking with its guest, as listings return it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingWithGuest {
    #[serde(flatten)]
    pub booking: Booking,
    pub guest: GuestSnapshot,
}

/// Filters accepted by the booking listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub search: Option<String>,
    pub check_in_day: Option<NaiveDate>,
    pub check_out_day: Option<NaiveDate>,
    pub guest_dob: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_payload() -> serde_json::Value {
        serde_json::json!({
            "checkInDate": "2024-05-01",
            "checkOutDate": "2024-05-03T10:00:00Z",
            "grcNumber": "GRC-17",
            "roomNumber": "204",
            "coStayers": [{"name": "Ravi", "relation": "Spouse", "dob": "1991-02-03"}],
            "documents": ["id.pdf", "visa.pdf"]
        })
    }

    fn booking() -> Booking {
        let input: CreateBooking = serde_json::from_value(create_payload()).unwrap();
        Booking::new(GuestId::new(), &input)
    }

    #[test]
    fn test_create_payload_defaults_ledgers() {
        let input: CreateBooking = serde_json::from_value(create_payload()).unwrap();
        assert!(input.validate().is_ok());
        assert!(input.additional_purchase.is_empty());
        assert_eq!(input.documents.len(), 2);
    }

    #[test]
    fn test_checkout_before_checkin_rejected() {
        let mut body = create_payload();
        body["checkOutDate"] = serde_json::json!("2024-04-30");
        let input: CreateBooking = serde_json::from_value(body).unwrap();

        let errors = input.validate().unwrap_err();
        assert!(errors.errors().contains_key("__all__"));
    }

    #[test]
    fn test_nested_co_stayer_errors() {
        let mut body = create_payload();
        body["coStayers"] = serde_json::json!([{"name": "", "relation": "Son", "dob": "2015-01-01"}]);
        let input: CreateBooking = serde_json::from_value(body).unwrap();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_cost_kind_parsing() {
        assert_eq!("damageCost".parse::<CostKind>().unwrap(), CostKind::DamageCost);
        let err = "tips".parse::<CostKind>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid cost type");
    }

    #[test]
    fn test_cost_items_unique_per_ledger() {
        let mut booking = booking();
        let minibar = CostItem {
            item: "Minibar".into(),
            cost: "450".into(),
        };

        booking.add_cost(CostKind::AdditionalPurchase, minibar.clone()).unwrap();
        let err = booking
            .add_cost(CostKind::AdditionalPurchase, minibar.clone())
            .unwrap_err();
        assert_eq!(err.to_string(), "Item already exists in additional purchases.");

        // the same name is fine in the other ledger
        booking.add_cost(CostKind::DamageCost, minibar).unwrap();
        assert_eq!(booking.damage_cost.len(), 1);

        booking.remove_cost(CostKind::AdditionalPurchase, "Minibar");
        assert!(booking.additional_purchase.is_empty());
        assert_eq!(booking.damage_cost.len(), 1);
    }

    #[test]
    fn test_apply_keeps_prospect_when_absent() {
        let mut booking = booking();
        let prospect = ProspectiveGuestRef {
            id: ProspectiveGuestId::new(),
            name: "Acme Travel".into(),
        };
        booking.prospective_guest = Some(prospect.clone());

        let edit: UpdateBooking = serde_json::from_value(serde_json::json!({
            "checkInDate": "2024-05-02",
            "checkOutDate": "2024-05-04",
            "grcNumber": "GRC-18",
            "roomNumber": "305"
        }))
        .unwrap();
        booking.apply(&edit);

        assert_eq!(booking.room_number, "305");
        assert!(booking.co_stayers.is_empty());
        assert_eq!(booking.prospective_guest, Some(prospect));
    }

    #[test]
    fn test_details_change_releases_held_files_only() {
        let mut booking = booking();
        booking.documents = vec!["1-a-id.pdf".into(), "2-b-folio.pdf".into()];

        let input: UpdateBooking = serde_json::from_value(serde_json::json!({
            "checkInDate": "2024-05-01",
            "checkOutDate": "2024-05-03",
            "grcNumber": " GRC-19 ",
            "roomNumber": "204"
        }))
        .unwrap();
        let removed = BookingChange::Details {
            input,
            removed_files: vec!["2-b-folio.pdf".into(), "9-z-other.pdf".into()],
        }
        .apply_to(&mut booking)
        .unwrap();

        assert_eq!(removed, vec!["2-b-folio.pdf"]);
        assert_eq!(booking.documents, vec!["1-a-id.pdf"]);
        assert_eq!(booking.grc_number, "GRC-19");

        let lamp = CostItem {
            item: "Lamp".into(),
            cost: "900".into(),
        };
        BookingChange::AddCost(CostKind::DamageCost, lamp.clone())
            .apply_to(&mut booking)
            .unwrap();
        let err = BookingChange::AddCost(CostKind::DamageCost, lamp)
            .apply_to(&mut booking)
            .unwrap_err();
        assert_eq!(err.to_string(), "Item already exists in damage costs.");
    }

    #[test]
    fn test_stay_dates_checked_alongside_field_errors() {
        let mut body = create_payload();
        body["checkOutDate"] = serde_json::json!("2024-04-30");
        body["grcNumber"] = serde_json::json!(" ");
        let input: CreateBooking = serde_json::from_value(body).unwrap();

        let errors = input.validate().unwrap_err();
        assert!(errors.errors().contains_key("__all__"));
        assert!(errors.errors().contains_key("grc_number"));
    }
}
