//! Application state

use std::sync::Arc;

use crate::auth::token::{AuthTokenIssuer, JwtIssuer};
use crate::blob::{BlobStore, MemoryBlobStore, S3BlobStore};
use crate::config::Config;
use crate::core::{AccountService, FileService, ResourceLifecycleManager, SequentialCodeAllocator};
use crate::store::{MemoryStore, PgStore, RecordStore};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub lifecycle: ResourceLifecycleManager,
    pub accounts: AccountService,
    pub files: FileService,
    /// Verifies bearer tokens in the auth middleware
    pub tokens: Arc<dyn AuthTokenIssuer>,
}

impl AppState {
    /// Create a new AppState
    ///
    /// Without a database URL the record and blob stores live in memory.
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let (store, blobs): (Arc<dyn RecordStore>, Arc<dyn BlobStore>) =
            match &config.database_url {
                Some(url) => {
                    let store = PgStore::connect(url, config.database_max_connections).await?;
                    tracing::info!("Connected to PostgreSQL, migrations applied");
                    let blobs = S3BlobStore::from_env(&config.s3_bucket, &config.blob_base_url).await;
                    (Arc::new(store), Arc::new(blobs))
                }
                None => {
                    tracing::warn!("DATABASE_URL not set, using in-memory stores");
                    (Arc::new(MemoryStore::new()), Arc::new(MemoryBlobStore::new()))
                }
            };

        let tokens = Arc::new(JwtIssuer::new(&config.jwt_secret, config.jwt_expiry_hours));
        let allocator =
            SequentialCodeAllocator::new(&config.department_prefix, config.department_width);

        Ok(Self::from_parts(
            store,
            blobs,
            tokens,
            allocator,
            config.max_upload_bytes,
            config.allocation_attempts,
        ))
    }

    pub fn from_parts(
        store: Arc<dyn RecordStore>,
        blobs: Arc<dyn BlobStore>,
        tokens: Arc<dyn AuthTokenIssuer>,
        allocator: SequentialCodeAllocator,
        max_upload_bytes: usize,
        allocation_attempts: u32,
    ) -> Self {
        Self {
            lifecycle: ResourceLifecycleManager::new(store.clone(), allocator, allocation_attempts),
            accounts: AccountService::new(store.clone(), tokens.clone()),
            files: FileService::new(store, blobs, max_upload_bytes),
            tokens,
        }
    }
}
