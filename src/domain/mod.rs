//! Domain layer - Core business entities and logic
//!
//! Entities, value objects and request payloads, independent of how they
//! are stored or served.

pub mod booking;
pub mod credential;
pub mod document;
pub mod guest;
pub mod id;
pub mod meeting;
pub mod password;
pub mod permission;
pub mod prospective_guest;
pub mod purchase;
pub mod role;
pub mod rules;
pub mod user;
pub mod vendor;

pub use booking::{
    Booking, BookingChange, BookingFilter, BookingWithGuest, CoStayer, CostItem, CostKind,
    CreateBooking, GuestSnapshot, ProspectiveGuestRef, UpdateBooking,
};
pub use credential::Credential;
pub use document::{detach_documents, DocumentKind, DocumentOwner, Folder};
pub use guest::{CreateGuest, Guest, GuestDetails, GuestFiles, GuestView, UpdateGuest};
pub use id::{
    BookingId, CredentialId, GuestId, MeetingId, ProspectiveGuestId, PurchaseId, RoleId, UserId,
    VendorId,
};
pub use meeting::{CreateMeeting, Meeting, MeetingDetails};
pub use password::Password;
pub use permission::Permission;
pub use prospective_guest::{ProspectName, ProspectiveGuest, ProspectiveGuestInput};
pub use purchase::{Purchase, PurchaseFilter, PurchaseInput, PurchaseWithVendor, VendorSnapshot};
pub use role::{Role, RoleInput, RolePermissions};
pub use user::{ChangePassword, CreateUser, RoleBadge, UpdateUser, User, UserProfile, UserSummary};
pub use vendor::{Vendor, VendorBrief, VendorInput};
