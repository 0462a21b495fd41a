//! Auth API Handlers

use axum::{Json, extract::State};
use http::StatusCode;
use shared::error::AppResult;
use shared::models::{AuthAction, AuthRequest, AuthView};

use crate::api::validation::{PASSWORD_LEN, validate_email, validate_length};
use crate::state::AppState;

/// POST /v1/auth - register (`create`, 201) or log in (`login`, 200)
pub async fn authenticate(
    State(state): State<AppState>,
    Json(req): Json<AuthRequest>,
) -> AppResult<(StatusCode, Json<AuthView>)> {
    validate_email(&req.email)?;
    validate_length(&req.password, "password", PASSWORD_LEN)?;

    match req.action {
        AuthAction::Create => {
            let view = state.accounts.register(&req.email, &req.password).await?;
            Ok((StatusCode::CREATED, Json(view)))
        }
        AuthAction::Login => {
            let view = state.accounts.login(&req.email, &req.password).await?;
            Ok((StatusCode::OK, Json(view)))
        }
    }
}
