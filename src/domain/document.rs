//! Document folders and the listings that expose them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::permission::Permission;
use crate::errors::AppError;

/// Object-storage folder an entity's files live under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Folder {
    Guest,
    Booking,
    Purchases,
}

impl Folder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Folder::Guest => "guest",
            Folder::Booking => "booking",
            Folder::Purchases => "purchases",
        }
    }

    /// Full object key for a file stored in this folder.
    pub fn object_key(&self, file_name: &str) -> String {
        format!("{}/{}", self.as_str(), file_name)
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which entity's documents a listing or download targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Guest,
    Booking,
    Purchase,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [
        DocumentKind::Guest,
        DocumentKind::Booking,
        DocumentKind::Purchase,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Guest => "guest",
            DocumentKind::Booking => "booking",
            DocumentKind::Purchase => "purchase",
        }
    }

    pub fn folder(&self) -> Folder {
        match self {
            DocumentKind::Guest => Folder::Guest,
            DocumentKind::Booking => Folder::Booking,
            DocumentKind::Purchase => Folder::Purchases,
        }
    }

    pub fn read_permission(&self) -> Permission {
        match self {
            DocumentKind::Guest => Permission::GuestFilesRead,
            DocumentKind::Booking => Permission::BookingFilesRead,
            DocumentKind::Purchase => Permission::PurchaseFilesRead,
        }
    }

    pub fn download_permission(&self) -> Permission {
        match self {
            DocumentKind::Guest => Permission::GuestFileDownload,
            DocumentKind::Booking => Permission::BookingFileDownload,
            DocumentKind::Purchase => Permission::PurchaseFileDownload,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AppError::not_found("Document type"))
    }
}

/// Every document key of one owner, as the listing reads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOwner {
    pub documents: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Flatten owners (newest first) into one key list, optionally filtered by a
/// case-insensitive literal substring.
pub fn flatten_documents(mut owners: Vec<DocumentOwner>, search: Option<&str>) -> Vec<String> {
    owners.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let needle = search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    owners
        .into_iter()
        .flat_map(|owner| owner.documents)
        .filter(|key| match &needle {
            Some(needle) => key.to_lowercase().contains(needle),
            None => true,
        })
        .collect()
}

/// Drop the requested keys from `current`, returning those actually removed.
/// Keys the record does not hold are ignored.
pub fn detach_documents(current: &mut Vec<String>, requested: &[String]) -> Vec<String> {
    let removed: Vec<String> = current
        .iter()
        .filter(|key| requested.contains(key))
        .cloned()
        .collect();
    current.retain(|key| !removed.contains(key));
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_kind_maps_to_folder_and_permissions() {
        assert_eq!(DocumentKind::Purchase.folder(), Folder::Purchases);
        assert_eq!(
            DocumentKind::Booking.read_permission(),
            Permission::BookingFilesRead
        );
        assert_eq!(
            DocumentKind::Guest.download_permission(),
            Permission::GuestFileDownload
        );
        assert!("vendor".parse::<DocumentKind>().is_err());
    }

    #[test]
    fn test_object_key_is_scoped() {
        assert_eq!(Folder::Booking.object_key("1-a-b.pdf"), "booking/1-a-b.pdf");
    }

    #[test]
    fn test_flatten_orders_newest_owner_first_and_filters() {
        let now = Utc::now();
        let owners = vec![
            DocumentOwner {
                documents: vec!["old-passport.pdf".into()],
                created_at: now - Duration::days(1),
            },
            DocumentOwner {
                documents: vec!["new-Passport.pdf".into(), "new-visa.pdf".into()],
                created_at: now,
            },
        ];

        let all = flatten_documents(owners.clone(), None);
        assert_eq!(all, vec!["new-Passport.pdf", "new-visa.pdf", "old-passport.pdf"]);

        // regex metacharacters are matched literally
        let filtered = flatten_documents(owners.clone(), Some("PASSPORT"));
        assert_eq!(filtered, vec!["new-Passport.pdf", "old-passport.pdf"]);
        assert!(flatten_documents(owners, Some(".*")).is_empty());
    }

    #[test]
    fn test_detach_ignores_foreign_keys() {
        let mut current = vec!["1-a-id.pdf".to_string(), "2-b-visa.pdf".to_string()];
        let removed = detach_documents(
            &mut current,
            &["2-b-visa.pdf".to_string(), "9-z-other.pdf".to_string()],
        );
        assert_eq!(removed, vec!["2-b-visa.pdf"]);
        assert_eq!(current, vec!["1-a-id.pdf"]);
    }
}
