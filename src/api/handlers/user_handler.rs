//! Account handlers: registration, login and profile.

use axum::{
    extract::State,
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::domain::UserResponse;
use crate::errors::AppResult;

/// User registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 64, message = "Username must be 1-64 characters"))]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// User login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token returned after a successful login
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Create account routes. Only `/me` requires a token.
pub fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/me",
            get(me).route_layer(middleware::from_fn_with_state(state, auth_middleware)),
        )
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .services()
        .users()
        .register(payload.username, payload.email, payload.password)
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// Login and get JWT token
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .services()
        .users()
        .login(payload.username, payload.password)
        .await?;

    Ok(Json(TokenResponse { token }))
}

/// Account of the authenticated caller
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services().users().profile(user.id).await?;
    Ok(Json(UserResponse::from(user)))
}
