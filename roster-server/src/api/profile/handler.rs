//! Profile API Handlers

use axum::{
    Json,
    extract::{Extension, State},
};
use shared::error::AppResult;
use shared::models::{ProfileUpdate, ProfileView};

use crate::api::validation::{
    PROFILE_NAME_LEN, non_empty, validate_email, validate_length, validate_optional_uri,
};
use crate::auth::TenantIdentity;
use crate::state::AppState;

/// GET /v1/user
pub async fn get(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
) -> AppResult<Json<ProfileView>> {
    let profile = state.accounts.profile(identity.account_id).await?;
    Ok(Json(profile))
}

/// PATCH /v1/user - replace every profile field
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Json(mut payload): Json<ProfileUpdate>,
) -> AppResult<Json<ProfileView>> {
    validate_email(&payload.email)?;
    validate_length(&payload.name, "name", PROFILE_NAME_LEN)?;
    validate_length(&payload.company_name, "companyName", PROFILE_NAME_LEN)?;
    validate_optional_uri(payload.user_image_uri.as_deref(), "userImageUri")?;
    validate_optional_uri(payload.company_image_uri.as_deref(), "companyImageUri")?;
    payload.user_image_uri = non_empty(payload.user_image_uri);
    payload.company_image_uri = non_empty(payload.company_image_uri);

    let profile = state
        .accounts
        .update_profile(identity.account_id, &payload)
        .await?;
    Ok(Json(profile))
}
