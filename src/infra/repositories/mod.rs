//! Repository layer - Data access abstraction
//!
//! One trait per aggregate with a SeaORM-backed store behind it.

mod base;
mod booking_repository;
mod credential_repository;
pub(crate) mod entities;
mod guest_repository;
mod meeting_repository;
mod prospective_guest_repository;
mod purchase_repository;
mod role_repository;
mod user_repository;
mod vendor_repository;

pub use booking_repository::{BookingRepository, BookingStore};
pub use credential_repository::{CredentialRepository, CredentialStore};
pub use guest_repository::{GuestRepository, GuestStore};
pub use meeting_repository::{MeetingRepository, MeetingStore};
pub use prospective_guest_repository::{ProspectiveGuestRepository, ProspectiveGuestStore};
pub use purchase_repository::{PurchaseRepository, PurchaseStore};
pub use role_repository::{RoleRepository, RoleStore};
pub use user_repository::{UserRepository, UserStore};
pub use vendor_repository::{VendorRepository, VendorStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use booking_repository::MockBookingRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use credential_repository::MockCredentialRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use guest_repository::MockGuestRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use meeting_repository::MockMeetingRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use prospective_guest_repository::MockProspectiveGuestRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use purchase_repository::MockPurchaseRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use role_repository::MockRoleRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use vendor_repository::MockVendorRepository;
