//! Input validation helpers
//!
//! Length limits count characters, not bytes.

use shared::error::AppError;

pub const PASSWORD_LEN: (usize, usize) = (8, 32);
pub const EMAIL_LEN: (usize, usize) = (3, 255);
pub const PROFILE_NAME_LEN: (usize, usize) = (4, 52);
pub const DEPARTMENT_NAME_LEN: (usize, usize) = (4, 33);
pub const EMPLOYEE_NAME_LEN: (usize, usize) = (4, 33);
pub const IDENTITY_NUMBER_LEN: (usize, usize) = (5, 33);

fn invalid(field: &str, message: String) -> AppError {
    AppError::validation(message).with_detail("field", field)
}

/// Validate that `value` has between `min` and `max` characters
pub fn validate_length(value: &str, field: &str, (min, max): (usize, usize)) -> Result<(), AppError> {
    let len = value.chars().count();
    if value.trim().is_empty() {
        return Err(invalid(field, format!("{field} must not be empty")));
    }
    if len < min || len > max {
        return Err(invalid(
            field,
            format!("{field} must be between {min} and {max} characters ({len} given)"),
        ));
    }
    Ok(())
}

/// Minimal address check: one `@`, a non-empty local part and a dotted domain
pub fn validate_email(value: &str) -> Result<(), AppError> {
    validate_length(value, "email", EMAIL_LEN)?;
    let value = value.trim();
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !value.contains(char::is_whitespace)
                && domain
                    .split('.')
                    .filter(|label| !label.is_empty())
                    .count()
                    >= 2
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(invalid("email", "email is not a valid address".to_string()))
    }
}

/// An absent or empty URI is allowed; anything else needs `scheme://host`
pub fn validate_optional_uri(value: Option<&str>, field: &str) -> Result<(), AppError> {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return Ok(());
    };
    let valid = match value.split_once("://") {
        Some((scheme, rest)) => {
            scheme
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
                && !rest.is_empty()
                && !value.contains(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(invalid(field, format!("{field} is not a valid URI")))
    }
}

/// Treat `Some("")` as absent
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_bounds() {
        assert!(validate_length("Ops", "name", DEPARTMENT_NAME_LEN).is_err());
        assert!(validate_length("Sales", "name", DEPARTMENT_NAME_LEN).is_ok());
        assert!(validate_length(&"x".repeat(33), "name", DEPARTMENT_NAME_LEN).is_ok());
        assert!(validate_length(&"x".repeat(34), "name", DEPARTMENT_NAME_LEN).is_err());
        assert!(validate_length("     ", "name", DEPARTMENT_NAME_LEN).is_err());
        // four characters, eight bytes
        assert!(validate_length("éééé", "name", DEPARTMENT_NAME_LEN).is_ok());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("owner@example.com").is_ok());
        assert!(validate_email("owner@example").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("owner@@example.com").is_err());
        assert!(validate_email("own er@example.com").is_err());
        assert!(validate_email("owner.example.com").is_err());
    }

    #[test]
    fn test_optional_uri() {
        assert!(validate_optional_uri(None, "uri").is_ok());
        assert!(validate_optional_uri(Some(""), "uri").is_ok());
        assert!(validate_optional_uri(Some("https://cdn.example.com/a.png"), "uri").is_ok());
        assert!(validate_optional_uri(Some("not a uri"), "uri").is_err());
        assert!(validate_optional_uri(Some("://missing"), "uri").is_err());
    }
}
