//! Unified error codes for the Roster service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Account errors
//! - 4xxx: Department errors
//! - 5xxx: Employee errors
//! - 6xxx: File upload errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Resource belongs to another account
    NotResourceOwner = 2002,

    // ==================== 3xxx: Account ====================
    /// Account not found
    AccountNotFound = 3001,
    /// Email already registered
    EmailAlreadyExists = 3002,

    // ==================== 4xxx: Department ====================
    /// Department not found
    DepartmentNotFound = 4001,
    /// Department still has active employees
    DepartmentHasEmployees = 4002,
    /// Department identifier is malformed
    DepartmentIdInvalid = 4003,
    /// Referenced department does not exist or was deleted
    DepartmentReferenceInvalid = 4004,

    // ==================== 5xxx: Employee ====================
    /// Employee not found
    EmployeeNotFound = 5001,
    /// Identity number already used by an active employee
    IdentityNumberExists = 5002,

    // ==================== 6xxx: File Upload ====================
    /// File exceeds the upload limit
    FileTooLarge = 6001,
    /// Content type not accepted
    UnsupportedFileFormat = 6002,
    /// No file field in the request
    NoFileProvided = 6003,
    /// Uploaded file is empty
    EmptyFile = 6004,
    /// Blob storage rejected the upload
    FileStorageFailed = 6005,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
    /// Identifier allocation kept colliding
    AllocationExhausted = 9006,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::NotResourceOwner => "Resource belongs to another account",

            // Account
            ErrorCode::AccountNotFound => "Account not found",
            ErrorCode::EmailAlreadyExists => "Email already exists",

            // Department
            ErrorCode::DepartmentNotFound => "Department not found",
            ErrorCode::DepartmentHasEmployees => "Department still contains employees",
            ErrorCode::DepartmentIdInvalid => "Invalid department ID format",
            ErrorCode::DepartmentReferenceInvalid => "Department not found",

            // Employee
            ErrorCode::EmployeeNotFound => "Employee not found",
            ErrorCode::IdentityNumberExists => "Identity number already exists",

            // File Upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "File type must be jpeg, jpg, or png",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::FileStorageFailed => "File storage failed",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::AllocationExhausted => "Could not allocate identifier, please retry",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::NotResourceOwner),

            // Account
            3001 => Ok(ErrorCode::AccountNotFound),
            3002 => Ok(ErrorCode::EmailAlreadyExists),

            // Department
            4001 => Ok(ErrorCode::DepartmentNotFound),
            4002 => Ok(ErrorCode::DepartmentHasEmployees),
            4003 => Ok(ErrorCode::DepartmentIdInvalid),
            4004 => Ok(ErrorCode::DepartmentReferenceInvalid),

            // Employee
            5001 => Ok(ErrorCode::EmployeeNotFound),
            5002 => Ok(ErrorCode::IdentityNumberExists),

            // File Upload
            6001 => Ok(ErrorCode::FileTooLarge),
            6002 => Ok(ErrorCode::UnsupportedFileFormat),
            6003 => Ok(ErrorCode::NoFileProvided),
            6004 => Ok(ErrorCode::EmptyFile),
            6005 => Ok(ErrorCode::FileStorageFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::AllocationExhausted),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::DepartmentHasEmployees.code(), 4002);
        assert_eq!(ErrorCode::IdentityNumberExists.code(), 5002);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_error_code_roundtrip() {
        for code in [
            ErrorCode::ValidationFailed,
            ErrorCode::TokenInvalid,
            ErrorCode::NotResourceOwner,
            ErrorCode::EmailAlreadyExists,
            ErrorCode::DepartmentReferenceInvalid,
            ErrorCode::EmployeeNotFound,
            ErrorCode::FileTooLarge,
            ErrorCode::AllocationExhausted,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_invalid_error_code() {
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::NotFound.to_string(), "E0003");
        assert_eq!(ErrorCode::DepartmentNotFound.to_string(), "E4001");
    }

    #[test]
    fn test_error_code_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::EmployeeNotFound).unwrap();
        assert_eq!(json, "5001");
        let code: ErrorCode = serde_json::from_str("4002").unwrap();
        assert_eq!(code, ErrorCode::DepartmentHasEmployees);
    }
}
