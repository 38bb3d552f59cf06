//! JWT authentication module.
//!
//! Issues and validates bearer tokens, and turns the `Authorization` header
//! into a [`Principal`] that has passed the authorization gate.
//!
//! ## Request Flow
//! ```text
//! Authorization: Bearer <jwt>
//!        │
//!        ▼
//! resolve_principal ── no header ──► None
//!        │
//!        ├── not "Bearer " / bad signature ──► 401 Invalid token
//!        ├── exp in the past ─────────────────► 401 Token expired
//!        ▼
//! Some(Principal) ──► authorize(op) ──► AuthUser / AdminUser
//! ```
//!
//! Public routes take no extractor; tokens sent to them are ignored.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use sweetshop_core::{authorize, CoreError, OperationKind, Principal, Role};

use crate::error::ApiError;
use crate::AppState;

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    pub email: String,

    pub role: Role,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

impl Claims {
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.sub.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Why a presented token was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("invalid token")]
    Invalid,
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => ApiError::TokenExpired,
            TokenError::Invalid => ApiError::InvalidToken,
        }
    }
}

/// JWT token manager.
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime_secs: i64,
}

impl std::fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtManager")
            .field("lifetime_secs", &self.lifetime_secs)
            .finish_non_exhaustive()
    }
}

impl JwtManager {
    /// Create a new JWT manager signing with HS256.
    pub fn new(secret: &str, lifetime_secs: i64) -> Self {
        JwtManager {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime_secs,
        }
    }

    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime_secs
    }

    /// Generate a token for `principal`.
    pub fn issue(&self, principal: &Principal) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            sub: principal.id.clone(),
            email: principal.email.clone(),
            role: principal.role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a token.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => {
                    debug!(error = %e, "Rejected bearer token");
                    TokenError::Invalid
                }
            })
    }
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ").map(str::trim)
}

/// Reads the bearer token, if any, into a principal.
///
/// A missing or empty header is `Ok(None)`. A header that is present but
/// does not carry a valid token is always an error.
pub fn resolve_principal(parts: &Parts, jwt: &JwtManager) -> Result<Option<Principal>, ApiError> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let raw = value.to_str().map_err(|_| ApiError::InvalidToken)?;
    if raw.trim().is_empty() {
        return Ok(None);
    }

    let token = extract_bearer_token(raw).ok_or(ApiError::InvalidToken)?;
    if token.is_empty() {
        return Err(ApiError::MalformedToken);
    }

    let claims = jwt.verify(token)?;
    Ok(Some(claims.principal()))
}

fn gate(parts: &Parts, state: &AppState, op: OperationKind) -> Result<Principal, ApiError> {
    let principal = resolve_principal(parts, &state.jwt)?;

    authorize(principal.as_ref(), op).map_err(|e| match e {
        CoreError::Unauthenticated => ApiError::MissingToken,
        other => other.into(),
    })?;

    principal.ok_or(ApiError::MissingToken)
}

/// Any signed-in account. Passes the purchase gate.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        gate(parts, state, OperationKind::Purchase).map(AuthUser)
    }
}

/// A signed-in administrator. Passes the admin-write gate.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Principal);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        gate(parts, state, OperationKind::AdminWrite).map(AdminUser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: Role) -> Principal {
        Principal {
            id: "user-001".to_string(),
            email: "test@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test-secret", 3600);

        let token = manager.issue(&principal(Role::Admin)).unwrap();
        let claims = manager.verify(&token).unwrap();

        assert_eq!(claims.sub, "user-001");
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(claims.principal(), principal(Role::Admin));
    }

    #[test]
    fn test_expired_token() {
        let manager = JwtManager::new("test-secret", -3600);
        let token = manager.issue(&principal(Role::User)).unwrap();

        assert_eq!(manager.verify(&token).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn test_wrong_secret() {
        let issuer = JwtManager::new("secret-a", 3600);
        let verifier = JwtManager::new("secret-b", 3600);
        let token = issuer.issue(&principal(Role::User)).unwrap();

        assert_eq!(verifier.verify(&token).unwrap_err(), TokenError::Invalid);
        assert_eq!(verifier.verify("garbage").unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Bearer "), Some(""));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token("abc"), None);
    }
}
