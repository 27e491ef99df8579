//! Closed set of permissions a role can grant.
//!
//! Wire form is `resource:action`, with the compound
//! `resource:action:qualifier`, `resource:files:read` and
//! `resource:file:download` variants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

macro_rules! permissions {
    ($($variant:ident => $wire:literal),+ $(,)?) => {
        /// A single grantable permission.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Permission {
            $($variant),+
        }

        impl Permission {
            /// Every permission, in declaration order.
            pub const ALL: &'static [Permission] = &[$(Permission::$variant),+];

            /// Wire representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Permission::$variant => $wire),+
                }
            }
        }

        impl FromStr for Permission {
            type Err = UnknownPermission;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Permission::$variant),)+
                    other => Err(UnknownPermission(other.to_string())),
                }
            }
        }
    };
}

permissions! {
    UserCreate => "user:create",
    UserRead => "user:read",
    UserUpdate => "user:update",
    UserDelete => "user:delete",

    RoleCreate => "role:create",
    RoleRead => "role:read",
    RoleUpdate => "role:update",
    RoleDelete => "role:delete",

    BookingRead => "booking:read",
    BookingReadSingle => "booking:read:single",
    BookingCreate => "booking:create",
    BookingUpdate => "booking:update",
    BookingDelete => "booking:delete",

    GuestRead => "guest:read",
    GuestUpdate => "guest:update",
    GuestDelete => "guest:delete",

    VendorRead => "vendor:read",
    VendorUpdate => "vendor:update",
    VendorDelete => "vendor:delete",

    PurchaseRead => "purchase:read",
    PurchaseCreate => "purchase:create",
    PurchaseUpdate => "purchase:update",
    PurchaseDelete => "purchase:delete",

    ProspectiveGuestCreate => "prospective-guest:create",
    ProspectiveGuestRead => "prospective-guest:read",
    ProspectiveGuestUpdate => "prospective-guest:update",
    ProspectiveGuestDelete => "prospective-guest:delete",

    MeetingCreate => "meeting:create",
    MeetingUpdate => "meeting:update",
    MeetingDelete => "meeting:delete",

    GuestFilesRead => "guest:files:read",
    BookingFilesRead => "booking:files:read",
    PurchaseFilesRead => "purchase:files:read",

    GuestFileDownload => "guest:file:download",
    BookingFileDownload => "booking:file:download",
    PurchaseFileDownload => "purchase:file:download",
}

/// A permission string outside the closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid permission: {0}")]
pub struct UnknownPermission(pub String);

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Permission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_permissions_roundtrip() {
        assert_eq!(Permission::ALL.len(), 36);
        for permission in Permission::ALL {
            assert_eq!(permission.as_str().parse::<Permission>().unwrap(), *permission);
        }
    }

    #[test]
    fn test_unknown_permission_rejected() {
        let err = "booking:explode".parse::<Permission>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid permission: booking:explode");
    }

    #[test]
    fn test_serde_uses_wire_strings() {
        let json = serde_json::to_string(&vec![Permission::GuestFileDownload]).unwrap();
        assert_eq!(json, r#"["guest:file:download"]"#);

        let parsed: Vec<Permission> =
            serde_json::from_str(r#"["prospective-guest:read","booking:read:single"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![Permission::ProspectiveGuestRead, Permission::BookingReadSingle]
        );
    }

    #[test]
    fn test_deserialize_unknown_fails() {
        let parsed: Result<Vec<Permission>, _> = serde_json::from_str(r#"["nope"]"#);
        assert!(parsed.is_err());
    }
}
