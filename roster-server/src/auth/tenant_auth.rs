//! Bearer authentication for the `/v1` resource routes

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::AppError;

use super::token::TokenError;
use crate::state::AppState;

/// Authenticated account extracted from the bearer token
#[derive(Debug, Clone)]
pub struct TenantIdentity {
    pub account_id: i64,
    pub email: String,
}

/// Verify the `Authorization: Bearer` header and attach a [`TenantIdentity`]
pub async fn tenant_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(AppError::not_authenticated)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::invalid_token("Invalid Authorization format"))?;

    let claims = state.tokens.verify(token).map_err(|e| {
        tracing::debug!("Token validation failed: {e}");
        match e {
            TokenError::Expired => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid or expired token"),
        }
    })?;
    let account_id = claims
        .account_id()
        .map_err(|_| AppError::invalid_token("Invalid or expired token"))?;

    request.extensions_mut().insert(TenantIdentity {
        account_id,
        email: claims.email,
    });

    Ok(next.run(request).await)
}
