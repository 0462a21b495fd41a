//! Bearer tokens
//!
//! HS256 JWTs carrying the account id in `sub`. Handlers only see the
//! [`AuthTokenIssuer`] trait so tests can swap the secret or expiry.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Token encoding failed: {0}")]
    Encoding(String),
}

/// JWT claims for account authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Account ID
    pub sub: String,
    /// Account email at issue time
    pub email: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

impl TokenClaims {
    pub fn account_id(&self) -> Result<i64, TokenError> {
        self.sub
            .parse()
            .map_err(|_| TokenError::Invalid(format!("subject {} is not an account id", self.sub)))
    }
}

pub trait AuthTokenIssuer: Send + Sync + std::fmt::Debug {
    fn issue(&self, account_id: i64, email: &str) -> Result<String, TokenError>;
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError>;
}

#[derive(Clone)]
pub struct JwtIssuer {
    secret: String,
    expiry_hours: i64,
}

impl std::fmt::Debug for JwtIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtIssuer")
            .field("expiry_hours", &self.expiry_hours)
            .finish_non_exhaustive()
    }
}

impl JwtIssuer {
    pub fn new(secret: impl Into<String>, expiry_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            expiry_hours,
        }
    }
}

impl AuthTokenIssuer for JwtIssuer {
    fn issue(&self, account_id: i64, email: &str) -> Result<String, TokenError> {
        let now = chrono::Utc::now();
        let claims = TokenClaims {
            sub: account_id.to_string(),
            email: email.to_string(),
            exp: (now + chrono::Duration::hours(self.expiry_hours)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        jsonwebtoken::decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid(e.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_then_verify() {
        let issuer = JwtIssuer::new("test-secret", 1);
        let token = issuer.issue(42, "owner@example.com").unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.account_id().unwrap(), 42);
        assert_eq!(claims.email, "owner@example.com");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtIssuer::new("secret-a", 1).issue(1, "a@b.c").unwrap();
        let err = JwtIssuer::new("secret-b", 1).verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn test_expired_token_rejected() {
        // Default validation allows 60s of leeway
        let token = JwtIssuer::new("secret", -2).issue(1, "a@b.c").unwrap();
        let err = JwtIssuer::new("secret", 1).verify(&token).unwrap_err();
        assert!(matches!(err, TokenError::Expired));
    }

    #[test]
    fn test_garbage_rejected() {
        let issuer = JwtIssuer::new("secret", 1);
        assert!(matches!(
            issuer.verify("not.a.jwt"),
            Err(TokenError::Invalid(_))
        ));
    }
}
