//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_JWT_AUDIENCE, DEFAULT_JWT_EXPIRES_IN_MINUTES,
    DEFAULT_JWT_ISSUER, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEV_JWT_KEY,
    MAX_JWT_EXPIRES_IN_MINUTES,
};
use crate::errors::{AppError, AppResult};

/// Token signing configuration consumed by the token issuer and validator.
#[derive(Clone)]
pub struct JwtSettings {
    key: String,
    pub issuer: String,
    pub audience: String,
    pub expires_in_minutes: i64,
}

impl std::fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSettings")
            .field("key", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("expires_in_minutes", &self.expires_in_minutes)
            .finish()
    }
}

impl JwtSettings {
    pub fn new(
        key: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        expires_in_minutes: i64,
    ) -> Self {
        Self {
            key: key.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            expires_in_minutes,
        }
    }

    /// Raw configured key, before any decoding.
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt: JwtSettings,
    pub server_host: String,
    pub server_port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt", &self.jwt)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Config {
    /// Load configuration from `.env` and environment variables.
    ///
    /// # Errors
    /// Returns a configuration error if `JWT_KEY` is missing in a release
    /// build or `JWT_EXPIRES_IN_MINUTES` is not a positive integer within
    /// `MAX_JWT_EXPIRES_IN_MINUTES`.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let key = match env::var("JWT_KEY") {
            Ok(key) if !key.trim().is_empty() => key,
            _ if cfg!(debug_assertions) => {
                tracing::warn!("JWT_KEY not set, using insecure default for development");
                DEV_JWT_KEY.to_string()
            }
            _ => {
                return Err(AppError::configuration(
                    "JWT_KEY environment variable must be set in production",
                ))
            }
        };

        let expires_in_minutes =
            parse_expires_in_minutes(env::var("JWT_EXPIRES_IN_MINUTES").ok().as_deref())?;

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            jwt: JwtSettings::new(
                key,
                env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_JWT_ISSUER.to_string()),
                env::var("JWT_AUDIENCE").unwrap_or_else(|_| DEFAULT_JWT_AUDIENCE.to_string()),
                expires_in_minutes,
            ),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
        })
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Parse the token lifetime setting; blank or unset falls back to the default.
pub fn parse_expires_in_minutes(raw: Option<&str>) -> AppResult<i64> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(DEFAULT_JWT_EXPIRES_IN_MINUTES),
        Some(raw) => raw,
    };

    match raw.parse::<i64>() {
        Ok(minutes) if (1..=MAX_JWT_EXPIRES_IN_MINUTES).contains(&minutes) => Ok(minutes),
        _ => Err(AppError::configuration(format!(
            "JWT_EXPIRES_IN_MINUTES must be an integer between 1 and {}, got `{}`",
            MAX_JWT_EXPIRES_IN_MINUTES, raw
        ))),
    }
}
