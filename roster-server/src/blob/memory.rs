//! In-process blob store for development and tests

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{BlobError, BlobStore};

#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub body: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    objects: Arc<Mutex<HashMap<String, StoredBlob>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<StoredBlob> {
        self.objects.lock().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.lock().is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<String, BlobError> {
        self.objects.lock().insert(
            key.to_string(),
            StoredBlob {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(format!("memory://{key}"))
    }

    async fn delete(&self, key: &str) -> Result<(), BlobError> {
        self.objects.lock().remove(key);
        Ok(())
    }
}
