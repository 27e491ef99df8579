//! Document browsing across guests, bookings and purchases.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use super::upload_broker::UploadBroker;
use crate::domain::document::flatten_documents;
use crate::domain::DocumentKind;
use crate::errors::AppResult;
use crate::infra::UnitOfWork;
use crate::types::{total_pages, PageRequest};

/// One page of flattened document keys
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPage {
    pub success: bool,
    pub documents: Vec<String>,
    pub total_documents: u64,
    pub total_pages: u64,
}

#[async_trait]
pub trait DocumentService: Send + Sync {
    /// Keys of every `kind` owner, newest owner first
    async fn list_documents(
        &self,
        kind: DocumentKind,
        search: Option<String>,
        page: PageRequest,
    ) -> AppResult<DocumentPage>;

    /// Short-lived download URL in the kind's folder
    async fn download_url(&self, kind: DocumentKind, file_name: String) -> AppResult<String>;
}

pub struct DocumentLibrary<U: UnitOfWork> {
    uow: Arc<U>,
    uploads: UploadBroker,
}

impl<U: UnitOfWork> DocumentLibrary<U> {
    pub fn new(uow: Arc<U>, uploads: UploadBroker) -> Self {
        Self { uow, uploads }
    }
}

#[async_trait]
impl<U: UnitOfWork> DocumentService for DocumentLibrary<U> {
    async fn list_documents(
        &self,
        kind: DocumentKind,
        search: Option<String>,
        page: PageRequest,
    ) -> AppResult<DocumentPage> {
        let owners = match kind {
            DocumentKind::Guest => self.uow.guests().document_owners().await?,
            DocumentKind::Booking => self.uow.bookings().document_owners().await?,
            DocumentKind::Purchase => self.uow.purchases().document_owners().await?,
        };

        let keys = flatten_documents(owners, search.as_deref());
        let total = keys.len() as u64;
        Ok(DocumentPage {
            success: true,
            documents: page.slice(&keys),
            total_documents: total,
            total_pages: total_pages(total, page.limit),
        })
    }

    async fn download_url(&self, kind: DocumentKind, file_name: String) -> AppResult<String> {
        self.uploads
            .issue_download_url(file_name.trim(), kind.folder())
            .await
    }
}
