//! Vendor service - suppliers and the purchases filed against them.

use std::sync::Arc;

use async_trait::async_trait;

use super::upload_broker::UploadBroker;
use crate::domain::{Folder, Vendor, VendorBrief, VendorId, VendorInput};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{PageRequest, Paginated};

#[async_trait]
pub trait VendorService: Send + Sync {
    async fn find_by_phone(&self, phone: String) -> AppResult<Option<Vendor>>;

    async fn list_vendors(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> AppResult<Paginated<Vendor>>;

    async fn create_vendor(&self, input: VendorInput) -> AppResult<VendorBrief>;

    async fn update_vendor(&self, id: VendorId, input: VendorInput) -> AppResult<Vendor>;

    /// Delete the vendor with its purchases and their invoices
    async fn delete_vendor(&self, id: VendorId) -> AppResult<()>;
}

pub struct VendorManager<U: UnitOfWork> {
    uow: Arc<U>,
    uploads: UploadBroker,
}

impl<U: UnitOfWork> VendorManager<U> {
    pub fn new(uow: Arc<U>, uploads: UploadBroker) -> Self {
        Self { uow, uploads }
    }
}

#[async_trait]
impl<U: UnitOfWork> VendorService for VendorManager<U> {
    async fn find_by_phone(&self, phone: String) -> AppResult<Option<Vendor>> {
        self.uow.vendors().find_by_phone(phone.trim()).await
    }

    async fn list_vendors(
        &self,
        search: Option<String>,
        page: PageRequest,
    ) -> AppResult<Paginated<Vendor>> {
        let (vendors, total) = self.uow.vendors().list(search, page).await?;
        Ok(Paginated::new(vendors, page, total))
    }

    async fn create_vendor(&self, input: VendorInput) -> AppResult<VendorBrief> {
        let vendor = self.uow.vendors().create(Vendor::new(input)).await?;
        tracing::info!(vendor_id = %vendor.id, "Vendor created");
        Ok(VendorBrief::from(&vendor))
    }

    async fn update_vendor(&self, id: VendorId, input: VendorInput) -> AppResult<Vendor> {
        let mut vendor = self
            .uow
            .vendors()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Vendor")?;
        vendor.apply(input);
        self.uow.vendors().update(vendor).await
    }

    async fn delete_vendor(&self, id: VendorId) -> AppResult<()> {
        self.uow
            .vendors()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Vendor")?;
        let invoices = self.uow.purchases().documents_for_vendor(id).await?;

        // purchases go with the vendor row
        self.uow.vendors().delete(id).await?;
        tracing::info!(vendor_id = %id, invoices = invoices.len(), "Vendor deleted");

        self.uploads.delete_orphans(&invoices, Folder::Purchases).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::infra::{MockObjectStore, MockPurchaseRepository, MockUnitOfWork, MockVendorRepository};
    use mockall::predicate::*;

    fn input(phone: &str) -> VendorInput {
        VendorInput {
            name: " Linen Co ".into(),
            email: "sales@linen.example".into(),
            phone: phone.into(),
            address: "Plot 4, Industrial Area".into(),
            contact_person: "Meena".into(),
            gstin: "29ABCDE1234F1Z5".into(),
        }
    }

    #[tokio::test]
    async fn test_create_returns_brief() {
        let mut vendors = MockVendorRepository::new();
        vendors
            .expect_create()
            .withf(|v| v.name == "Linen Co")
            .returning(Ok);
        let vendors = Arc::new(vendors);
        let mut uow = MockUnitOfWork::new();
        uow.expect_vendors().returning(move || vendors.clone());

        let manager = VendorManager::new(Arc::new(uow), UploadBroker::new(Arc::new(MockObjectStore::new())));
        let brief = manager.create_vendor(input("+919812345678")).await.unwrap();
        assert_eq!(brief.name, "Linen Co");
        assert_eq!(brief.phone, "+919812345678");
    }

    #[tokio::test]
    async fn test_duplicate_phone_message() {
        let mut vendors = MockVendorRepository::new();
        vendors
            .expect_create()
            .returning(|_| Err(AppError::duplicate("Mobile number already taken.")));
        let vendors = Arc::new(vendors);
        let mut uow = MockUnitOfWork::new();
        uow.expect_vendors().returning(move || vendors.clone());

        let manager = VendorManager::new(Arc::new(uow), UploadBroker::new(Arc::new(MockObjectStore::new())));
        let err = manager.create_vendor(input("+919812345678")).await.unwrap_err();
        assert_eq!(err.to_string(), "Mobile number already taken.");
    }

    #[tokio::test]
    async fn test_delete_cascades_purchase_invoices() {
        let vendor = Vendor::new(input("+919812345678"));
        let id = vendor.id;

        let mut vendors = MockVendorRepository::new();
        vendors
            .expect_find_by_id()
            .returning(move |_| Ok(Some(vendor.clone())));
        vendors.expect_delete().with(eq(id)).times(1).returning(|_| Ok(true));
        let mut purchases = MockPurchaseRepository::new();
        purchases
            .expect_documents_for_vendor()
            .returning(|_| Ok(vec!["1-a-inv.pdf".into(), "2-b-inv.pdf".into()]));

        let mut store = MockObjectStore::new();
        store
            .expect_delete()
            .withf(|key| key.starts_with("purchases/"))
            .times(2)
            .returning(|_| Ok(()));

        let (vendors, purchases) = (Arc::new(vendors), Arc::new(purchases));
        let mut uow = MockUnitOfWork::new();
        uow.expect_vendors().returning(move || vendors.clone());
        uow.expect_purchases().returning(move || purchases.clone());

        VendorManager::new(Arc::new(uow), UploadBroker::new(Arc::new(store)))
            .delete_vendor(id)
            .await
            .unwrap();
    }
}
