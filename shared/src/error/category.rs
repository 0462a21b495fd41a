//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 2xxx: Permission errors
/// - 3xxx: Account errors
/// - 4xxx: Department errors
/// - 5xxx: Employee errors
/// - 6xxx: File upload errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Permission errors (2xxx)
    Permission,
    /// Account errors (3xxx)
    Account,
    /// Department errors (4xxx)
    Department,
    /// Employee errors (5xxx)
    Employee,
    /// File upload errors (6xxx)
    File,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            3000..4000 => Self::Account,
            4000..5000 => Self::Department,
            5000..6000 => Self::Employee,
            6000..7000 => Self::File,
            _ => Self::System,
        }
    }

    /// Get the category name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Account => "account",
            Self::Department => "department",
            Self::Employee => "employee",
            Self::File => "file",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category of this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(3), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1002), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_code(2002), ErrorCategory::Permission);
        assert_eq!(ErrorCategory::from_code(3001), ErrorCategory::Account);
        assert_eq!(ErrorCategory::from_code(4002), ErrorCategory::Department);
        assert_eq!(ErrorCategory::from_code(5001), ErrorCategory::Employee);
        assert_eq!(ErrorCategory::from_code(6001), ErrorCategory::File);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(
            ErrorCode::DepartmentHasEmployees.category(),
            ErrorCategory::Department
        );
        assert_eq!(ErrorCode::AllocationExhausted.category(), ErrorCategory::System);
    }
}
