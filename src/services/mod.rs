//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! All services reach repositories through the Unit of Work and object
//! storage through the Upload Broker.

mod access_service;
mod auth_service;
mod booking_service;
pub mod container;
mod document_service;
mod guest_service;
mod prospect_service;
mod purchase_service;
mod role_service;
mod upload_broker;
mod user_service;
mod vendor_service;

// Service Container
pub use container::{parallel, ServiceContainer, Services};

// Service traits and implementations
pub use access_service::{AccessControl, AccessService};
pub use auth_service::{AuthService, Authenticator, Claims, LoginOutcome};
pub use booking_service::{BookingCreated, BookingEdited, BookingManager, BookingService};
pub use document_service::{DocumentLibrary, DocumentPage, DocumentService};
pub use guest_service::{GuestCreated, GuestEdited, GuestManager, GuestService};
pub use prospect_service::{ProspectManager, ProspectService};
pub use purchase_service::{PurchaseCreated, PurchaseEdited, PurchaseManager, PurchaseService};
pub use role_service::{RoleManager, RoleService};
pub use upload_broker::{unique_file_name, SignedUpload, UploadBroker};
pub use user_service::{UserDirectory, UserManager, UserService};
pub use vendor_service::{VendorManager, VendorService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
