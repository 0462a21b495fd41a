//! Server configuration

use crate::core::allocator::{DEFAULT_PREFIX, DEFAULT_WIDTH};
use crate::core::files::DEFAULT_MAX_UPLOAD_BYTES;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL; `None` runs on the in-memory stores
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// JWT secret for account authentication
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    /// S3 bucket for uploaded files
    pub s3_bucket: String,
    /// CloudFront or S3 base URL of uploaded files
    pub blob_base_url: String,
    pub max_upload_bytes: usize,
    /// Department code prefix (`DEP-`)
    pub department_prefix: String,
    /// Zero-padded digits of a department code
    pub department_width: usize,
    /// Create attempts before giving up on code collisions
    pub allocation_attempts: u32,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
        std::env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let database_url = std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty());
        if database_url.is_none() && environment != "development" {
            return Err(format!("DATABASE_URL must be set in {environment} environment").into());
        }

        let s3_bucket = std::env::var("S3_BUCKET").unwrap_or_else(|_| "roster-uploads".into());
        let blob_base_url = std::env::var("BLOB_BASE_URL")
            .unwrap_or_else(|_| format!("https://{s3_bucket}.s3.amazonaws.com"));

        Ok(Self {
            database_url,
            database_max_connections: Self::parse_or("DATABASE_MAX_CONNECTIONS", 10),
            http_port: Self::parse_or("HTTP_PORT", 8080),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            jwt_expiry_hours: Self::parse_or("JWT_EXPIRY_HOURS", 24),
            environment,
            s3_bucket,
            blob_base_url,
            max_upload_bytes: Self::parse_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            department_prefix: std::env::var("DEPARTMENT_PREFIX")
                .unwrap_or_else(|_| DEFAULT_PREFIX.into()),
            department_width: Self::parse_or("DEPARTMENT_WIDTH", DEFAULT_WIDTH),
            allocation_attempts: Self::parse_or("ALLOCATION_ATTEMPTS", 5),
        })
    }
}
