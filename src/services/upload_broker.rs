//! Presigned upload, download and deletion of entity documents.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::try_join_all;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{DOCUMENT_CONTENT_TYPE, DOWNLOAD_URL_TTL_SECONDS, UPLOAD_URL_TTL_SECONDS};
use crate::domain::Folder;
use crate::errors::AppResult;
use crate::infra::ObjectStore;

/// Write URL for one file; the client confirms `file_name` after uploading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignedUpload {
    /// Object key without the folder prefix
    pub file_name: String,
    pub signed_url: String,
}

/// `{unix_millis}-{uuid}-{original}`
pub fn unique_file_name(original: &str) -> String {
    format!(
        "{}-{}-{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4(),
        original.trim()
    )
}

#[derive(Clone)]
pub struct UploadBroker {
    store: Arc<dyn ObjectStore>,
}

impl UploadBroker {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// One PUT URL per file name, in input order.
    pub async fn issue_upload_urls(
        &self,
        file_names: &[String],
        folder: Folder,
    ) -> AppResult<Vec<SignedUpload>> {
        let ttl = Duration::from_secs(UPLOAD_URL_TTL_SECONDS);
        try_join_all(file_names.iter().map(|original| async move {
            let file_name = unique_file_name(original);
            let signed_url = self
                .store
                .presign_put(&folder.object_key(&file_name), DOCUMENT_CONTENT_TYPE, ttl)
                .await?;
            Ok(SignedUpload {
                file_name,
                signed_url,
            })
        }))
        .await
    }

    pub async fn issue_download_url(&self, file_name: &str, folder: Folder) -> AppResult<String> {
        self.store
            .presign_get(
                &folder.object_key(file_name),
                Duration::from_secs(DOWNLOAD_URL_TTL_SECONDS),
            )
            .await
    }

    /// Delete every key concurrently; the first failure is returned.
    pub async fn delete_objects(&self, file_names: &[String], folder: Folder) -> AppResult<()> {
        if file_names.is_empty() {
            return Ok(());
        }
        try_join_all(
            file_names
                .iter()
                .map(|name| async move { self.store.delete(&folder.object_key(name)).await }),
        )
        .await?;
        tracing::debug!(count = file_names.len(), folder = %folder, "Deleted documents");
        Ok(())
    }

    /// Delete objects a committed change no longer references.
    ///
    /// The record is already authoritative, so a failure leaves orphans; they
    /// are logged before the error is returned.
    pub async fn delete_orphans(&self, file_names: &[String], folder: Folder) -> AppResult<()> {
        self.delete_objects(file_names, folder).await.inspect_err(|e| {
            tracing::warn!(
                error = %e,
                folder = %folder,
                keys = ?file_names,
                "Storage cleanup failed, objects orphaned"
            );
        })
    }
}
