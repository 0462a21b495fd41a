//! Employee API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use http::StatusCode;
use shared::error::{AppResult, ApiResponse};
use shared::models::{EmployeeCreate, EmployeeQuery, EmployeeUpdate, EmployeeView, Gender};

use crate::api::validation::{
    EMPLOYEE_NAME_LEN, IDENTITY_NUMBER_LEN, non_empty, validate_length, validate_optional_uri,
};
use crate::auth::TenantIdentity;
use crate::core::{EmployeeDraft, Page};
use crate::state::AppState;
use crate::store::EmployeeFilter;

fn draft(
    identity_number: String,
    name: String,
    image_uri: Option<String>,
    gender: Gender,
    department_code: String,
) -> AppResult<EmployeeDraft> {
    validate_length(&identity_number, "identityNumber", IDENTITY_NUMBER_LEN)?;
    validate_length(&name, "name", EMPLOYEE_NAME_LEN)?;
    validate_optional_uri(image_uri.as_deref(), "employeeImageUri")?;
    validate_length(&department_code, "departmentId", (1, 64))?;
    Ok(EmployeeDraft {
        identity_number,
        name,
        image_uri: non_empty(image_uri),
        gender,
        department_code,
    })
}

/// POST /v1/employee
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<TenantIdentity>,
    Json(payload): Json<EmployeeCreate>,
) -> AppResult<(StatusCode, Json<EmployeeView>)> {
    let draft = draft(
        payload.identity_number,
        payload.name,
        payload.employee_image_uri,
        payload.gender,
        payload.department_id,
    )?;
    let employee = state
        .lifecycle
        .create_employee(identity.account_id, &draft)
        .await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// GET /v1/employee
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<EmployeeQuery>,
) -> AppResult<Json<Vec<EmployeeView>>> {
    let filter = EmployeeFilter {
        identity_number: non_empty(query.identity_number),
        name: non_empty(query.name),
        gender: query.gender,
        department_code: non_empty(query.department_id),
        page: Page::new(query.limit, query.offset),
    };
    let employees = state.lifecycle.list_employees(&filter).await?;
    Ok(Json(employees))
}

/// PATCH /v1/employee/{identity_number} - full replacement
pub async fn update(
    State(state): State<AppState>,
    Path(identity_number): Path<String>,
    Json(payload): Json<EmployeeUpdate>,
) -> AppResult<Json<EmployeeView>> {
    let draft = draft(
        payload.identity_number,
        payload.name,
        payload.employee_image_uri,
        payload.gender,
        payload.department_id,
    )?;
    let employee = state
        .lifecycle
        .update_employee(&identity_number, &draft)
        .await?;
    Ok(Json(employee))
}

/// DELETE /v1/employee/{identity_number}
pub async fn delete(
    State(state): State<AppState>,
    Path(identity_number): Path<String>,
) -> AppResult<ApiResponse> {
    state.lifecycle.delete_employee(&identity_number).await?;
    Ok(ApiResponse::ok())
}
