//! Object storage for uploaded files

pub mod memory;
pub mod s3;

pub use memory::MemoryBlobStore;
pub use s3::S3BlobStore;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("Upload of {key} failed: {message}")]
    Upload { key: String, message: String },

    #[error("Delete of {key} failed: {message}")]
    Delete { key: String, message: String },
}

#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug {
    /// Store `body` under `key` and return its public URI
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<String, BlobError>;

    async fn delete(&self, key: &str) -> Result<(), BlobError>;
}
