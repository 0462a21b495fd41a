//! File API Handlers

use axum::{
    Json,
    extract::{Extension, Multipart, State},
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::FileUploadView;

use crate::auth::TenantIdentity;
use crate::core::files::FileUpload;
use crate::state::AppState;

/// POST /v1/file - multipart upload, field `file`
pub async fn upload(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    mut multipart: Multipart,
) -> AppResult<Json<FileUploadView>> {
    let mut upload: Option<FileUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::with_message(ErrorCode::InvalidRequest, format!("Multipart error: {e}"))
    })? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(|s| s.to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| {
                AppError::with_message(ErrorCode::InvalidRequest, format!("Read error: {e}"))
            })?
            .to_vec();
        upload = Some(FileUpload {
            filename,
            content_type,
            bytes,
        });
        break;
    }

    let upload = upload.ok_or_else(|| AppError::new(ErrorCode::NoFileProvided))?;
    let view = state.files.upload(identity.account_id, upload).await?;
    Ok(Json(view))
}
