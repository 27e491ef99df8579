//! Field rules shared by request payloads.
//!
//! Functions here plug into `#[validate(custom(function = "..."))]`.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use validator::ValidationError;

static USERNAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_]+$").unwrap_or_else(|_| unreachable!("static pattern"))
});

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// Usernames are letters, digits and underscores.
pub fn validate_username(name: &str) -> Result<(), ValidationError> {
    if USERNAME_RE.is_match(name.trim()) {
        Ok(())
    } else {
        Err(rule(
            "username",
            "Username can only contain letters, numbers, and underscores",
        ))
    }
}

/// Staff phone numbers are exactly ten digits.
pub fn validate_staff_phone(phone: &str) -> Result<(), ValidationError> {
    let phone = phone.trim();
    if phone.len() == 10 && phone.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(rule("phone", "Phone number must be exactly 10 digits"))
    }
}

/// International phone number: optional leading `+`, then 7 to 15 digits.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.trim().trim_start_matches('+');
    if (7..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(rule("phone", "Enter a valid phone number"))
    }
}

/// Rejects blank strings.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(rule("blank", "Value cannot be empty"))
    } else {
        Ok(())
    }
}

/// Dates of birth cannot lie in the future.
pub fn validate_not_future(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date > Utc::now().date_naive() {
        Err(rule("date_max", "Date cannot be in the future"))
    } else {
        Ok(())
    }
}

/// Every attendee needs a non-blank name.
pub fn validate_attendees(attendees: &[String]) -> Result<(), ValidationError> {
    if attendees.iter().any(|name| name.trim().is_empty()) {
        Err(rule("attendee", "Attendee name cannot be empty"))
    } else {
        Ok(())
    }
}

/// Canonical form of a staff email: trimmed and lowercased.
///
/// Applied both when a user is written and when one is looked up by email.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Parse `YYYY-MM-DD` or an RFC 3339 timestamp into a calendar day.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Parse `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        })
}

/// Serde adapter accepting both date-only and full ISO timestamps.
pub mod iso_instant {
    use super::*;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_instant(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid ISO date: {}", raw)))
    }
}

/// Serde adapter for calendar days that tolerates a trailing time part.
pub mod iso_day {
    use super::*;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_day(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid ISO date: {}", raw)))
    }
}
