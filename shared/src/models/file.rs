//! Uploaded File Model

use serde::{Deserialize, Serialize};

/// Response of `POST /v1/file`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUploadView {
    pub uri: String,
}
