//! Meetings held with a prospective guest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::id::{MeetingId, ProspectiveGuestId};
use super::rules::{iso_instant, validate_attendees, validate_not_blank};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: MeetingId,
    pub prospective_guest_id: ProspectiveGuestId,
    pub date: DateTime<Utc>,
    pub remarks: String,
    pub attendees: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Meeting {
    pub fn new(prospective_guest_id: ProspectiveGuestId, details: MeetingDetails) -> Self {
        let now = Utc::now();
        Self {
            id: MeetingId::new(),
            prospective_guest_id,
            date: details.date,
            remarks: details.remarks.trim().to_string(),
            attendees: trim_all(details.attendees),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, details: MeetingDetails) {
        self.date = details.date;
        self.remarks = details.remarks.trim().to_string();
        self.attendees = trim_all(details.attendees);
        self.updated_at = Utc::now();
    }
}

fn trim_all(names: Vec<String>) -> Vec<String> {
    names.into_iter().map(|n| n.trim().to_string()).collect()
}

/// Meeting fields shared by create and edit
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetingDetails {
    #[serde(deserialize_with = "iso_instant::deserialize")]
    #[schema(value_type = String, format = DateTime)]
    pub date: DateTime<Utc>,
    #[validate(custom(function = "validate_not_blank", message = "Remarks are required"))]
    pub remarks: String,
    #[serde(alias = "attendies")]
    #[validate(
        length(min = 1, message = "At least one attendee is required"),
        custom(function = "validate_attendees")
    )]
    pub attendees: Vec<String>,
}

/// Meeting creation body
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeeting {
    pub prospective_guest_id: ProspectiveGuestId,
    #[serde(flatten)]
    #[validate(nested)]
    pub details: MeetingDetails,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_meeting_accepts_legacy_attendee_key() {
        let body: CreateMeeting = serde_json::from_value(serde_json::json!({
            "prospectiveGuestId": ProspectiveGuestId::new(),
            "date": "2024-06-01T09:30:00Z",
            "remarks": "Site visit",
            "attendies": [" Priya ", "Karan"]
        }))
        .unwrap();
        assert!(body.validate().is_ok());

        let meeting = Meeting::new(body.prospective_guest_id, body.details);
        assert_eq!(meeting.attendees, vec!["Priya", "Karan"]);
    }

    #[test]
    fn test_meeting_requires_attendees() {
        let details: MeetingDetails = serde_json::from_value(serde_json::json!({
            "date": "2024-06-01",
            "remarks": "Call",
            "attendees": []
        }))
        .unwrap();
        let errors = details.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("attendees"));
    }
}
