//! Service Container - Centralized service access.
//!
//! Handlers reach every use case through `ServiceContainer`, so the router
//! can be driven with fakes in tests.

use std::future::Future;
use std::sync::Arc;

use super::{
    AccessControl, AccessService, AuthService, Authenticator, BookingManager, BookingService,
    DocumentLibrary, DocumentService, GuestManager, GuestService, ProspectManager,
    ProspectService, PurchaseManager, PurchaseService, RoleManager, RoleService, UploadBroker,
    UserManager, UserService, VendorManager, VendorService,
};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Mailer, ObjectStore, Persistence};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;
    fn access(&self) -> Arc<dyn AccessService>;
    fn users(&self) -> Arc<dyn UserService>;
    fn roles(&self) -> Arc<dyn RoleService>;
    fn guests(&self) -> Arc<dyn GuestService>;
    fn bookings(&self) -> Arc<dyn BookingService>;
    fn vendors(&self) -> Arc<dyn VendorService>;
    fn purchases(&self) -> Arc<dyn PurchaseService>;
    fn prospects(&self) -> Arc<dyn ProspectService>;
    fn documents(&self) -> Arc<dyn DocumentService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    pub auth: Arc<dyn AuthService>,
    pub access: Arc<dyn AccessService>,
    pub users: Arc<dyn UserService>,
    pub roles: Arc<dyn RoleService>,
    pub guests: Arc<dyn GuestService>,
    pub bookings: Arc<dyn BookingService>,
    pub vendors: Arc<dyn VendorService>,
    pub purchases: Arc<dyn PurchaseService>,
    pub prospects: Arc<dyn ProspectService>,
    pub documents: Arc<dyn DocumentService>,
}

impl Services {
    /// Wire every service over one connection pool, bucket and mailer
    pub fn from_connection(
        db: sea_orm::DatabaseConnection,
        config: Config,
        store: Arc<dyn ObjectStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let uow = Arc::new(Persistence::new(db));
        let uploads = UploadBroker::new(store);

        Self {
            auth: Arc::new(Authenticator::new(uow.clone(), mailer.clone(), config)),
            access: Arc::new(AccessControl::new(uow.clone())),
            users: Arc::new(UserManager::new(uow.clone(), mailer)),
            roles: Arc::new(RoleManager::new(uow.clone())),
            guests: Arc::new(GuestManager::new(uow.clone(), uploads.clone())),
            bookings: Arc::new(BookingManager::new(uow.clone(), uploads.clone())),
            vendors: Arc::new(VendorManager::new(uow.clone(), uploads.clone())),
            purchases: Arc::new(PurchaseManager::new(uow.clone(), uploads.clone())),
            prospects: Arc::new(ProspectManager::new(uow.clone())),
            documents: Arc::new(DocumentLibrary::new(uow, uploads)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    fn access(&self) -> Arc<dyn AccessService> {
        self.access.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.users.clone()
    }

    fn roles(&self) -> Arc<dyn RoleService> {
        self.roles.clone()
    }

    fn guests(&self) -> Arc<dyn GuestService> {
        self.guests.clone()
    }

    fn bookings(&self) -> Arc<dyn BookingService> {
        self.bookings.clone()
    }

    fn vendors(&self) -> Arc<dyn VendorService> {
        self.vendors.clone()
    }

    fn purchases(&self) -> Arc<dyn PurchaseService> {
        self.purchases.clone()
    }

    fn prospects(&self) -> Arc<dyn ProspectService> {
        self.prospects.clone()
    }

    fn documents(&self) -> Arc<dyn DocumentService> {
        self.documents.clone()
    }
}

/// Run independent lookups concurrently.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    /// Execute two independent async operations in parallel.
    ///
    /// If either operation fails, the error is returned immediately.
    pub async fn join2<F1, F2, T1, T2>(f1: F1, f2: F2) -> AppResult<(T1, T2)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
    {
        try_join!(f1, f2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[tokio::test]
    async fn test_parallel_join2() {
        async fn op1() -> AppResult<i32> {
            Ok(1)
        }
        async fn op2() -> AppResult<&'static str> {
            Ok("two")
        }

        let (a, b) = parallel::join2(op1(), op2()).await.unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, "two");
    }

    #[tokio::test]
    async fn test_parallel_join2_fails_fast() {
        let result = parallel::join2(
            async { Err::<i32, _>(AppError::storage("bucket gone")) },
            async { Ok::<_, AppError>(2) },
        )
        .await;
        assert!(matches!(result, Err(AppError::Storage(_))));
    }
}
