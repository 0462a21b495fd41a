//! S3-backed blob store

use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;

use super::{BlobError, BlobStore};

#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: S3Client,
    bucket: String,
    /// CloudFront or S3 base URL prepended to object keys
    base_url: String,
}

impl S3BlobStore {
    pub fn new(client: S3Client, bucket: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            base_url: base_url.into(),
        }
    }

    /// Build a client from the default AWS credential chain
    pub async fn from_env(bucket: impl Into<String>, base_url: impl Into<String>) -> Self {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(S3Client::new(&aws_config), bucket, base_url)
    }

    fn uri(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<String, BlobError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body.into())
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(key, error = %e, "S3 upload failed");
                BlobError::Upload {
                    key: key.to_string(),
                    message: e.to_string(),
                }
            })?;
        Ok(self.uri(key))
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| BlobError::Delete {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }
}
