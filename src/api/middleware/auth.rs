//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::{JwtSettings, BEARER_TOKEN_PREFIX};
use crate::errors::{AppError, AppResult};
use crate::services::{signing_key_bytes, Claims};

/// Authenticated user extracted from JWT token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
}

/// Checks signature, issuer, audience and expiry of bearer tokens.
pub struct TokenValidator {
    key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    /// Build a validator for tokens signed with the configured key.
    ///
    /// Fails with a configuration error under the same rules the issuer uses.
    pub fn new(settings: &JwtSettings) -> AppResult<Self> {
        let key = signing_key_bytes(settings.key())?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[settings.issuer.as_str()]);
        validation.set_audience(&[settings.audience.as_str()]);

        Ok(Self {
            key: DecodingKey::from_secret(&key),
            validation,
        })
    }

    /// Decode and verify a token.
    pub fn validate(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(token, &self.key, &self.validation)?;
        Ok(token_data.claims)
    }
}

/// JWT authentication middleware.
///
/// Extracts and validates the JWT token from the Authorization header,
/// then injects the CurrentUser into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthorized)?;

    let claims = state.tokens.validate(token)?;

    let current_user = CurrentUser {
        id: claims.sub,
        username: claims.name,
    };

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{JwtIssuer, TokenIssuer};

    const KEY: &str = "an-http-boundary-signing-key-of-40-bytes!";

    fn settings(issuer: &str, audience: &str) -> JwtSettings {
        JwtSettings::new(KEY, issuer, audience, 60)
    }

    #[test]
    fn test_accepts_token_from_matching_issuer() {
        let user_id = Uuid::new_v4();
        let token = JwtIssuer::new(settings("notes", "clients"))
            .issue(user_id, "alice", None)
            .unwrap();

        let claims = TokenValidator::new(&settings("notes", "clients"))
            .unwrap()
            .validate(&token)
            .unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.name, "alice");
    }

    #[test]
    fn test_rejects_wrong_audience() {
        let token = JwtIssuer::new(settings("notes", "someone-else"))
            .issue(Uuid::new_v4(), "alice", None)
            .unwrap();

        let result = TokenValidator::new(&settings("notes", "clients"))
            .unwrap()
            .validate(&token);

        assert!(matches!(result, Err(AppError::Jwt(_))));
    }

    #[test]
    fn test_rejects_wrong_issuer() {
        let token = JwtIssuer::new(settings("elsewhere", "clients"))
            .issue(Uuid::new_v4(), "alice", None)
            .unwrap();

        let result = TokenValidator::new(&settings("notes", "clients"))
            .unwrap()
            .validate(&token);

        assert!(matches!(result, Err(AppError::Jwt(_))));
    }

    #[test]
    fn test_rejects_expired_token() {
        // Well past the default leeway
        let token = JwtIssuer::new(settings("notes", "clients"))
            .issue(Uuid::new_v4(), "alice", Some(-10))
            .unwrap();

        let result = TokenValidator::new(&settings("notes", "clients"))
            .unwrap()
            .validate(&token);

        assert!(matches!(result, Err(AppError::Jwt(_))));
    }

    #[test]
    fn test_short_key_is_rejected_up_front() {
        let result = TokenValidator::new(&JwtSettings::new("short", "notes", "clients", 60));
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }
}
