//! Purchase service.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use super::upload_broker::{SignedUpload, UploadBroker};
use crate::domain::{
    Folder, Purchase, PurchaseFilter, PurchaseId, PurchaseInput, PurchaseWithVendor, VendorId,
};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{PageRequest, Paginated};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseCreated {
    pub purchase_id: PurchaseId,
    pub signed_urls: Vec<SignedUpload>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseEdited {
    pub signed_urls: Vec<SignedUpload>,
    pub updated_purchase: Purchase,
}

#[async_trait]
pub trait PurchaseService: Send + Sync {
    async fn list_purchases(
        &self,
        filter: PurchaseFilter,
        page: PageRequest,
    ) -> AppResult<Paginated<PurchaseWithVendor>>;

    async fn create_purchase(
        &self,
        vendor_id: VendorId,
        input: PurchaseInput,
    ) -> AppResult<PurchaseCreated>;

    async fn save_files(&self, id: PurchaseId, file_names: Vec<String>) -> AppResult<Vec<String>>;

    async fn update_purchase(
        &self,
        id: PurchaseId,
        input: PurchaseInput,
        removed_files: Vec<String>,
    ) -> AppResult<PurchaseEdited>;

    async fn delete_purchase(&self, id: PurchaseId) -> AppResult<()>;
}

pub struct PurchaseManager<U: UnitOfWork> {
    uow: Arc<U>,
    uploads: UploadBroker,
}

impl<U: UnitOfWork> PurchaseManager<U> {
    pub fn new(uow: Arc<U>, uploads: UploadBroker) -> Self {
        Self { uow, uploads }
    }

    async fn load(&self, id: PurchaseId) -> AppResult<Purchase> {
        self.uow
            .purchases()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Purchase")
    }
}

#[async_trait]
impl<U: UnitOfWork> PurchaseService for PurchaseManager<U> {
    async fn list_purchases(
        &self,
        filter: PurchaseFilter,
        page: PageRequest,
    ) -> AppResult<Paginated<PurchaseWithVendor>> {
        let (purchases, total) = self.uow.purchases().list(filter, page).await?;
        Ok(Paginated::new(purchases, page, total))
    }

    async fn create_purchase(
        &self,
        vendor_id: VendorId,
        input: PurchaseInput,
    ) -> AppResult<PurchaseCreated> {
        self.uow
            .vendors()
            .find_by_id(vendor_id)
            .await?
            .ok_or_not_found("Vendor")?;

        let purchase = self
            .uow
            .purchases()
            .create(Purchase::new(vendor_id, &input))
            .await?;
        tracing::info!(purchase_id = %purchase.id, vendor_id = %vendor_id, "Purchase recorded");

        let signed_urls = self
            .uploads
            .issue_upload_urls(&input.documents, Folder::Purchases)
            .await?;
        Ok(PurchaseCreated {
            purchase_id: purchase.id,
            signed_urls,
        })
    }

    async fn save_files(&self, id: PurchaseId, file_names: Vec<String>) -> AppResult<Vec<String>> {
        let purchase = self
            .uow
            .purchases()
            .append_documents(id, file_names)
            .await?
            .ok_or_not_found("Purchase")?;
        Ok(purchase.documents)
    }

    async fn update_purchase(
        &self,
        id: PurchaseId,
        input: PurchaseInput,
        removed_files: Vec<String>,
    ) -> AppResult<PurchaseEdited> {
        let (purchase, removed) = self
            .uow
            .purchases()
            .edit(id, input.clone(), removed_files)
            .await?
            .ok_or_not_found("Purchase")?;

        self.uploads.delete_orphans(&removed, Folder::Purchases).await?;
        let signed_urls = self
            .uploads
            .issue_upload_urls(&input.documents, Folder::Purchases)
            .await?;
        Ok(PurchaseEdited {
            signed_urls,
            updated_purchase: purchase,
        })
    }

    async fn delete_purchase(&self, id: PurchaseId) -> AppResult<()> {
        let purchase = self.load(id).await?;
        self.uow.purchases().delete(id).await?;
        tracing::info!(purchase_id = %id, "Purchase deleted");

        self.uploads
            .delete_orphans(&purchase.documents, Folder::Purchases)
            .await
    }
}
