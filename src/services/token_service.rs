//! Token issuer - signs identity claims into a bearer token.
//!
//! Issuance only. Verifying issuer, audience and expiry is left to the
//! HTTP boundary (see `api::middleware::auth`).

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{JwtSettings, MIN_SIGNING_KEY_BYTES};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Username
    pub name: String,
    pub iss: String,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token issuer trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait TokenIssuer: Send + Sync {
    /// Sign a token for the given identity.
    ///
    /// `expiry_minutes` of `None` uses the configured lifetime.
    fn issue(&self, user_id: Uuid, username: &str, expiry_minutes: Option<i64>)
        -> AppResult<String>;
}

/// Decode the configured signing key.
///
/// Standard base64 is tried first; anything that is not valid base64 is used
/// as raw UTF-8 bytes. Fewer than 32 bytes after decoding is rejected.
pub fn signing_key_bytes(raw: &str) -> AppResult<Vec<u8>> {
    if raw.is_empty() {
        return Err(AppError::configuration("JWT signing key is not configured"));
    }

    let bytes = STANDARD
        .decode(raw)
        .unwrap_or_else(|_| raw.as_bytes().to_vec());

    if bytes.len() < MIN_SIGNING_KEY_BYTES {
        return Err(AppError::configuration(format!(
            "JWT signing key must be at least {} bytes ({} bits) after decoding",
            MIN_SIGNING_KEY_BYTES,
            MIN_SIGNING_KEY_BYTES * 8
        )));
    }

    Ok(bytes)
}

/// HS256 implementation of TokenIssuer
pub struct JwtIssuer {
    settings: JwtSettings,
}

impl JwtIssuer {
    /// Create new issuer. The key is checked when a token is issued.
    pub fn new(settings: JwtSettings) -> Self {
        Self { settings }
    }
}

impl TokenIssuer for JwtIssuer {
    fn issue(
        &self,
        user_id: Uuid,
        username: &str,
        expiry_minutes: Option<i64>,
    ) -> AppResult<String> {
        let key = signing_key_bytes(self.settings.key())?;

        let now = Utc::now();
        let lifetime = expiry_minutes.unwrap_or(self.settings.expires_in_minutes);
        let expires_at = Duration::try_minutes(lifetime)
            .and_then(|delta| now.checked_add_signed(delta))
            .ok_or_else(|| {
                AppError::configuration(format!(
                    "Token lifetime of {} minutes is out of range",
                    lifetime
                ))
            })?;

        let claims = Claims {
            sub: user_id,
            name: username.to_string(),
            iss: self.settings.issuer.clone(),
            aud: self.settings.audience.clone(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&key),
        )?;

        Ok(token)
    }
}
