//! Employee Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Employee gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(format!("unknown gender: {other}")),
        }
    }
}

/// Employee as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeView {
    pub identity_number: String,
    pub name: String,
    pub employee_image_uri: Option<String>,
    pub gender: Gender,
    /// Display identifier of the department (`DEP-07`)
    pub department_id: String,
}

/// Create employee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeCreate {
    pub identity_number: String,
    pub name: String,
    #[serde(default)]
    pub employee_image_uri: Option<String>,
    pub gender: Gender,
    pub department_id: String,
}

/// Update employee payload
///
/// Full replacement: every field is written, `identityNumber` may rename the
/// employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    pub identity_number: String,
    pub name: String,
    #[serde(default)]
    pub employee_image_uri: Option<String>,
    pub gender: Gender,
    pub department_id: String,
}

/// Query string of `GET /v1/employee`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeQuery {
    /// Prefix match
    pub identity_number: Option<String>,
    /// Substring match
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub department_id: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
