//! Application state - Dependency injection container.
//!
//! Services hold a request-scoped unit of work, so the state keeps a factory
//! and handlers build a fresh container for every request.

use std::sync::Arc;

use super::middleware::TokenValidator;
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;
use crate::services::{JwtIssuer, ServiceContainer, Services, TokenIssuer};

/// Builds the services for one request.
pub type ServiceFactory = Arc<dyn Fn() -> Arc<dyn ServiceContainer> + Send + Sync>;

/// Application state shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection
    pub database: Arc<Database>,
    /// Bearer token validator
    pub tokens: Arc<TokenValidator>,
    factory: ServiceFactory,
}

impl AppState {
    /// Create application state backed by the database and JWT settings.
    ///
    /// # Errors
    /// Returns a configuration error when the signing key is unusable.
    pub fn from_config(database: Arc<Database>, config: &Config) -> AppResult<Self> {
        let tokens = Arc::new(TokenValidator::new(&config.jwt)?);
        let issuer: Arc<dyn TokenIssuer> = Arc::new(JwtIssuer::new(config.jwt.clone()));

        let db = database.clone();
        let factory: ServiceFactory = Arc::new(move || {
            Arc::new(Services::for_request(db.get_connection(), issuer.clone()))
                as Arc<dyn ServiceContainer>
        });

        Ok(Self {
            database,
            tokens,
            factory,
        })
    }

    /// Create application state with manually injected services.
    pub fn new(database: Arc<Database>, tokens: Arc<TokenValidator>, factory: ServiceFactory) -> Self {
        Self {
            database,
            tokens,
            factory,
        }
    }

    /// Services for the current request.
    pub fn services(&self) -> Arc<dyn ServiceContainer> {
        (self.factory)()
    }
}
