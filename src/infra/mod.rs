//! Infrastructure layer - External systems integration
//!
//! - Database connection, migrations and repositories
//! - Unit of Work for repository access
//! - Object storage for uploaded documents
//! - Outbound mail

pub mod db;
pub mod mailer;
pub mod repositories;
pub mod storage;
pub mod unit_of_work;

pub use db::{Database, MigrationStatus, Migrator};
pub use mailer::{EmailJob, LogMailer, Mailer};
pub use repositories::{
    BookingRepository, CredentialRepository, GuestRepository, MeetingRepository,
    ProspectiveGuestRepository, PurchaseRepository, RoleRepository, UserRepository,
    VendorRepository,
};
pub use storage::{ObjectStore, S3ObjectStore};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use mailer::MockMailer;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockBookingRepository, MockCredentialRepository, MockGuestRepository, MockMeetingRepository,
    MockProspectiveGuestRepository, MockPurchaseRepository, MockRoleRepository,
    MockUserRepository, MockVendorRepository,
};
#[cfg(any(test, feature = "test-utils"))]
pub use storage::MockObjectStore;
#[cfg(any(test, feature = "test-utils"))]
pub use unit_of_work::MockUnitOfWork;
