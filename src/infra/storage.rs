//! Object storage for uploaded documents.
//!
//! File bytes never pass through the server: clients upload and download
//! through short-lived presigned URLs, and the server only deletes.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;

use crate::config::Config;
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Presigning and deletion over a single bucket.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// URL the client may PUT `key` to until `ttl` elapses
    async fn presign_put(&self, key: &str, content_type: &str, ttl: Duration) -> AppResult<String>;

    /// URL that downloads `key` as an attachment until `ttl` elapses
    async fn presign_get(&self, key: &str, ttl: Duration) -> AppResult<String>;

    async fn delete(&self, key: &str) -> AppResult<()>;
}

/// S3-backed object store.
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build a client from the standard AWS provider chain.
    ///
    /// A custom endpoint (MinIO, LocalStack) switches to path-style addressing.
    pub async fn from_config(config: &Config) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.aws_region.clone()));
        if let Some(endpoint) = &config.aws_endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let shared = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(config.aws_endpoint.is_some())
            .build();

        tracing::info!(
            region = %config.aws_region,
            bucket = %config.aws_bucket,
            "Object storage client initialized"
        );
        Self::new(Client::from_conf(s3_config), config.aws_bucket.clone())
    }
}

fn presigning(ttl: Duration) -> AppResult<PresigningConfig> {
    PresigningConfig::expires_in(ttl).map_err(|e| AppError::storage(e.to_string()))
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn presign_put(&self, key: &str, content_type: &str, ttl: Duration) -> AppResult<String> {
        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .presigned(presigning(ttl)?)
            .await
            .map_err(|e| AppError::storage(format!("presign put {key}: {e}")))?;

        Ok(request.uri().to_string())
    }

    async fn presign_get(&self, key: &str, ttl: Duration) -> AppResult<String> {
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .response_content_disposition("attachment")
            .presigned(presigning(ttl)?)
            .await
            .map_err(|e| AppError::storage(format!("presign get {key}: {e}")))?;

        Ok(request.uri().to_string())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::storage(format!("delete {key}: {e}")))?;

        tracing::debug!(key, "Deleted object");
        Ok(())
    }
}
