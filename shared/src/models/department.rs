//! Department Model

use serde::{Deserialize, Serialize};

/// Department as returned by the API
///
/// `id` is the display identifier (`DEP-07`), never the row key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentView {
    #[serde(rename = "departmentId")]
    pub id: String,
    pub name: String,
}

/// Create department payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentCreate {
    pub name: String,
}

/// Update department payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentUpdate {
    pub name: String,
}

/// Query string of `GET /v1/department`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepartmentQuery {
    pub name: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
