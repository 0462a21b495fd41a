//! Image uploads
//!
//! Objects are keyed `{email}/{uuid}{ext}`. The blob is written before the
//! metadata row; if the row cannot be stored the blob is removed again.

use std::path::Path;
use std::sync::Arc;

use shared::models::FileUploadView;
use shared::util::now_millis;

use crate::blob::BlobStore;
use crate::store::{NewFile, RecordStore};

use super::error::{LifecycleError, LifecycleResult};

/// 100 KiB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024;

const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];

/// One file received from a client
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub filename: String,
    /// Declared by the client; guessed from the filename when missing
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct FileService {
    store: Arc<dyn RecordStore>,
    blobs: Arc<dyn BlobStore>,
    max_bytes: usize,
}

impl FileService {
    pub fn new(store: Arc<dyn RecordStore>, blobs: Arc<dyn BlobStore>, max_bytes: usize) -> Self {
        Self {
            store,
            blobs,
            max_bytes,
        }
    }

    pub async fn upload(
        &self,
        account_id: i64,
        upload: FileUpload,
    ) -> LifecycleResult<FileUploadView> {
        if upload.bytes.is_empty() {
            return Err(LifecycleError::EmptyFile);
        }
        if upload.bytes.len() > self.max_bytes {
            return Err(LifecycleError::FileTooLarge {
                size: upload.bytes.len(),
                max: self.max_bytes,
            });
        }
        let content_type = resolve_content_type(&upload)?;

        let mut tx = self.store.begin().await?;
        let account = tx
            .find_account(account_id)
            .await?
            .ok_or_else(|| LifecycleError::AccountNotFound(account_id.to_string()))?;
        tx.commit().await?;

        let key = format!(
            "{}/{}{}",
            account.email,
            uuid::Uuid::new_v4(),
            extension(&upload.filename, &content_type)
        );
        let size_bytes = upload.bytes.len() as i64;
        let uri = self.blobs.put(&key, upload.bytes, &content_type).await?;

        if let Err(e) = self
            .record(account_id, &upload.filename, &uri, &content_type, size_bytes)
            .await
        {
            if let Err(cleanup) = self.blobs.delete(&key).await {
                tracing::warn!(key = %key, error = %cleanup, "Orphaned blob after failed upload");
            }
            return Err(e);
        }

        tracing::info!(account_id, key = %key, size_bytes, "File uploaded");
        Ok(FileUploadView { uri })
    }

    async fn record(
        &self,
        account_id: i64,
        filename: &str,
        uri: &str,
        content_type: &str,
        size_bytes: i64,
    ) -> LifecycleResult<()> {
        let mut tx = self.store.begin().await?;
        tx.insert_file(&NewFile {
            account_id,
            filename: filename.to_string(),
            uri: uri.to_string(),
            content_type: content_type.to_string(),
            size_bytes,
            now: now_millis(),
        })
        .await?;
        tx.commit().await?;
        Ok(())
    }
}

fn resolve_content_type(upload: &FileUpload) -> LifecycleResult<String> {
    let declared = upload
        .content_type
        .as_deref()
        .map(|ct| ct.trim().to_lowercase())
        .filter(|ct| !ct.is_empty() && ct != "application/octet-stream");
    let content_type = match declared {
        Some(ct) => ct,
        None => mime_guess::from_path(&upload.filename)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string(),
    };

    if ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
        Ok(content_type)
    } else {
        Err(LifecycleError::UnsupportedFileType(content_type))
    }
}

/// Lowercased filename extension, or one derived from the content type
fn extension(filename: &str, content_type: &str) -> String {
    let from_name = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .filter(|e| matches!(e.as_str(), "jpg" | "jpeg" | "png"));
    match from_name {
        Some(ext) => format!(".{ext}"),
        None if content_type == "image/png" => ".png".to_string(),
        None => ".jpg".to_string(),
    }
}
