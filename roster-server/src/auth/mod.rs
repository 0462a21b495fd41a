//! Authentication: password hashing, bearer tokens and the tenant middleware

pub mod password;
pub mod tenant_auth;
pub mod token;

pub use tenant_auth::{TenantIdentity, tenant_auth_middleware};
pub use token::{AuthTokenIssuer, JwtIssuer, TokenClaims, TokenError};
