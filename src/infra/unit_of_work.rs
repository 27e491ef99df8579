//! Unit of Work: one access point for every repository.
//!
//! Multi-row changes that must land together (role detachment, user role
//! replacement, prospect cascades, document appends) run inside a single
//! SeaORM transaction within the owning store.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::repositories::{
    BookingRepository, BookingStore, CredentialRepository, CredentialStore, GuestRepository,
    GuestStore, MeetingRepository, MeetingStore, ProspectiveGuestRepository,
    ProspectiveGuestStore, PurchaseRepository, PurchaseStore, RoleRepository, RoleStore,
    UserRepository, UserStore, VendorRepository, VendorStore,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Repository access for services.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;
    fn roles(&self) -> Arc<dyn RoleRepository>;
    fn credentials(&self) -> Arc<dyn CredentialRepository>;
    fn guests(&self) -> Arc<dyn GuestRepository>;
    fn bookings(&self) -> Arc<dyn BookingRepository>;
    fn vendors(&self) -> Arc<dyn VendorRepository>;
    fn purchases(&self) -> Arc<dyn PurchaseRepository>;
    fn prospective_guests(&self) -> Arc<dyn ProspectiveGuestRepository>;
    fn meetings(&self) -> Arc<dyn MeetingRepository>;
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    users: Arc<UserStore>,
    roles: Arc<RoleStore>,
    credentials: Arc<CredentialStore>,
    guests: Arc<GuestStore>,
    bookings: Arc<BookingStore>,
    vendors: Arc<VendorStore>,
    purchases: Arc<PurchaseStore>,
    prospective_guests: Arc<ProspectiveGuestStore>,
    meetings: Arc<MeetingStore>,
}

impl Persistence {
    /// Build every store over one pooled connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            roles: Arc::new(RoleStore::new(db.clone())),
            credentials: Arc::new(CredentialStore::new(db.clone())),
            guests: Arc::new(GuestStore::new(db.clone())),
            bookings: Arc::new(BookingStore::new(db.clone())),
            vendors: Arc::new(VendorStore::new(db.clone())),
            purchases: Arc::new(PurchaseStore::new(db.clone())),
            prospective_guests: Arc::new(ProspectiveGuestStore::new(db.clone())),
            meetings: Arc::new(MeetingStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn roles(&self) -> Arc<dyn RoleRepository> {
        self.roles.clone()
    }

    fn credentials(&self) -> Arc<dyn CredentialRepository> {
        self.credentials.clone()
    }

    fn guests(&self) -> Arc<dyn GuestRepository> {
        self.guests.clone()
    }

    fn bookings(&self) -> Arc<dyn BookingRepository> {
        self.bookings.clone()
    }

    fn vendors(&self) -> Arc<dyn VendorRepository> {
        self.vendors.clone()
    }

    fn purchases(&self) -> Arc<dyn PurchaseRepository> {
        self.purchases.clone()
    }

    fn prospective_guests(&self) -> Arc<dyn ProspectiveGuestRepository> {
        self.prospective_guests.clone()
    }

    fn meetings(&self) -> Arc<dyn MeetingRepository> {
        self.meetings.clone()
    }
}
