//! Department API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use http::StatusCode;
use shared::error::{AppError, AppResult, ApiResponse, ErrorCode};
use shared::models::{DepartmentCreate, DepartmentQuery, DepartmentUpdate, DepartmentView};

use crate::api::validation::{DEPARTMENT_NAME_LEN, non_empty, validate_length};
use crate::auth::TenantIdentity;
use crate::core::Page;
use crate::state::AppState;
use crate::store::DepartmentFilter;

/// Reject path ids that no allocation could have produced
fn parse_department_id(state: &AppState, department_id: &str) -> AppResult<()> {
    match state.lifecycle.allocator().parse(department_id) {
        Some(_) => Ok(()),
        None => Err(AppError::new(ErrorCode::DepartmentIdInvalid)
            .with_detail("departmentId", department_id)),
    }
}

/// POST /v1/department
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Json(payload): Json<DepartmentCreate>,
) -> AppResult<(StatusCode, Json<DepartmentView>)> {
    validate_length(&payload.name, "name", DEPARTMENT_NAME_LEN)?;
    let department = state
        .lifecycle
        .create_department(identity.account_id, &payload.name)
        .await?;
    Ok((StatusCode::CREATED, Json(department)))
}

/// GET /v1/department - departments of the caller
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Query(query): Query<DepartmentQuery>,
) -> AppResult<Json<Vec<DepartmentView>>> {
    let filter = DepartmentFilter {
        name: non_empty(query.name),
        page: Page::new(query.limit, query.offset),
    };
    let departments = state
        .lifecycle
        .list_departments(identity.account_id, &filter)
        .await?;
    Ok(Json(departments))
}

/// PATCH /v1/department/{department_id}
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Path(department_id): Path<String>,
    Json(payload): Json<DepartmentUpdate>,
) -> AppResult<Json<DepartmentView>> {
    parse_department_id(&state, &department_id)?;
    validate_length(&payload.name, "name", DEPARTMENT_NAME_LEN)?;
    let department = state
        .lifecycle
        .update_department(identity.account_id, &department_id, &payload.name)
        .await?;
    Ok(Json(department))
}

/// DELETE /v1/department/{department_id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Path(department_id): Path<String>,
) -> AppResult<ApiResponse> {
    parse_department_id(&state, &department_id)?;
    state
        .lifecycle
        .delete_department(identity.account_id, &department_id)
        .await?;
    Ok(ApiResponse::ok())
}
