//! Typed errors of the lifecycle core
//!
//! Every failure carries its [`ErrorKind`]; nothing upstream decides a
//! response by looking at message text. Conversion into the shared
//! [`AppError`] happens once, at the HTTP edge.

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use crate::auth::token::TokenError;
use crate::blob::BlobError;
use crate::store::StoreError;

/// Coarse classification callers map to transport responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    Unauthorized,
    HasDependents,
    ValidationFailed,
    Internal,
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Department {0} not found")]
    DepartmentNotFound(String),

    /// An employee write referenced a department that is absent or tombstoned
    #[error("Department {0} not found")]
    UnknownDepartment(String),

    #[error("Employee {0} not found")]
    EmployeeNotFound(String),

    #[error("Account {0} not found")]
    AccountNotFound(String),

    #[error("Identity number {0} already exists")]
    IdentityNumberExists(String),

    #[error("Email {0} already exists")]
    EmailExists(String),

    #[error("Department {code} belongs to another account")]
    NotOwner { code: String },

    #[error("Department {code} still has active employees")]
    DepartmentHasEmployees { code: String },

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{message}")]
    Validation { field: &'static str, message: String },

    #[error("File too large: {size} bytes (max {max})")]
    FileTooLarge { size: usize, max: usize },

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Empty file provided")]
    EmptyFile,

    #[error("Could not allocate a department code after {attempts} attempts")]
    AllocationExhausted { attempts: u32 },

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Blob(#[from] BlobError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl LifecycleError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        LifecycleError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LifecycleError::DepartmentNotFound(_)
            | LifecycleError::UnknownDepartment(_)
            | LifecycleError::EmployeeNotFound(_)
            | LifecycleError::AccountNotFound(_) => ErrorKind::NotFound,
            LifecycleError::IdentityNumberExists(_) | LifecycleError::EmailExists(_) => {
                ErrorKind::AlreadyExists
            }
            LifecycleError::NotOwner { .. } | LifecycleError::InvalidCredentials => {
                ErrorKind::Unauthorized
            }
            LifecycleError::DepartmentHasEmployees { .. } => ErrorKind::HasDependents,
            LifecycleError::Validation { .. }
            | LifecycleError::FileTooLarge { .. }
            | LifecycleError::UnsupportedFileType(_)
            | LifecycleError::EmptyFile => ErrorKind::ValidationFailed,
            LifecycleError::AllocationExhausted { .. }
            | LifecycleError::PasswordHash(_)
            | LifecycleError::Store(_)
            | LifecycleError::Blob(_)
            | LifecycleError::Token(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for core operations
pub type LifecycleResult<T> = Result<T, LifecycleError>;

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::DepartmentNotFound(code) => {
                AppError::new(ErrorCode::DepartmentNotFound).with_detail("departmentId", code)
            }
            LifecycleError::UnknownDepartment(code) => {
                AppError::new(ErrorCode::DepartmentReferenceInvalid)
                    .with_detail("departmentId", code)
            }
            LifecycleError::EmployeeNotFound(identity) => {
                AppError::new(ErrorCode::EmployeeNotFound).with_detail("identityNumber", identity)
            }
            LifecycleError::AccountNotFound(_) => AppError::new(ErrorCode::AccountNotFound),
            LifecycleError::IdentityNumberExists(identity) => {
                AppError::new(ErrorCode::IdentityNumberExists)
                    .with_detail("identityNumber", identity)
            }
            LifecycleError::EmailExists(email) => {
                AppError::new(ErrorCode::EmailAlreadyExists).with_detail("email", email)
            }
            LifecycleError::NotOwner { code } => {
                AppError::new(ErrorCode::NotResourceOwner).with_detail("departmentId", code)
            }
            LifecycleError::DepartmentHasEmployees { code } => {
                AppError::new(ErrorCode::DepartmentHasEmployees).with_detail("departmentId", code)
            }
            LifecycleError::InvalidCredentials => AppError::invalid_credentials(),
            LifecycleError::Validation { field, message } => {
                AppError::validation(message).with_detail("field", field)
            }
            err @ LifecycleError::FileTooLarge { .. } => {
                AppError::with_message(ErrorCode::FileTooLarge, err.to_string())
            }
            err @ LifecycleError::UnsupportedFileType(_) => {
                AppError::new(ErrorCode::UnsupportedFileFormat).with_detail("reason", err.to_string())
            }
            LifecycleError::EmptyFile => AppError::new(ErrorCode::EmptyFile),
            err @ LifecycleError::AllocationExhausted { .. } => {
                tracing::error!(error = %err, "Department code allocation exhausted");
                AppError::new(ErrorCode::AllocationExhausted)
            }
            err @ LifecycleError::Blob(_) => {
                tracing::error!(error = %err, "Blob storage error");
                AppError::new(ErrorCode::FileStorageFailed)
            }
            err @ LifecycleError::Store(_) => {
                tracing::error!(error = %err, "Store error");
                AppError::new(ErrorCode::DatabaseError)
            }
            err @ (LifecycleError::PasswordHash(_) | LifecycleError::Token(_)) => {
                tracing::error!(error = %err, "Credential error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

impl axum::response::IntoResponse for LifecycleError {
    fn into_response(self) -> axum::response::Response {
        AppError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_kinds() {
        assert_eq!(
            LifecycleError::DepartmentNotFound("DEP-01".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            LifecycleError::UnknownDepartment("DEP-01".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            LifecycleError::IdentityNumberExists("E0001".into()).kind(),
            ErrorKind::AlreadyExists
        );
        assert_eq!(
            LifecycleError::NotOwner { code: "DEP-01".into() }.kind(),
            ErrorKind::Unauthorized
        );
        assert_eq!(
            LifecycleError::DepartmentHasEmployees { code: "DEP-01".into() }.kind(),
            ErrorKind::HasDependents
        );
        assert_eq!(
            LifecycleError::AllocationExhausted { attempts: 5 }.kind(),
            ErrorKind::Internal
        );
        assert_eq!(
            LifecycleError::Store(StoreError::Database("down".into())).kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn test_http_mapping() {
        let status = |err: LifecycleError| AppError::from(err).http_status();
        assert_eq!(
            status(LifecycleError::DepartmentNotFound("DEP-09".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(LifecycleError::UnknownDepartment("DEP-09".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(LifecycleError::DepartmentHasEmployees { code: "DEP-01".into() }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status(LifecycleError::NotOwner { code: "DEP-01".into() }),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status(LifecycleError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status(LifecycleError::Store(StoreError::Database("down".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_not_leaked() {
        let app: AppError = LifecycleError::Store(StoreError::Database(
            "connection refused at 10.0.0.3".into(),
        ))
        .into();
        assert_eq!(app.message, "Database error");
        assert!(app.details.is_none());
    }
}
