//! Account Model

use serde::{Deserialize, Serialize};

/// Action requested on `POST /v1/auth`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthAction {
    Create,
    Login,
}

/// Register / login payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthRequest {
    pub email: String,
    pub password: String,
    pub action: AuthAction,
}

/// Register / login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthView {
    pub email: String,
    pub token: String,
}

/// Account profile as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub email: String,
    pub name: Option<String>,
    pub user_image_uri: Option<String>,
    pub company_name: Option<String>,
    pub company_image_uri: Option<String>,
}

/// Profile update payload (`PATCH /v1/user`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub user_image_uri: Option<String>,
    pub company_name: String,
    #[serde(default)]
    pub company_image_uri: Option<String>,
}
