//! Service Container - request-scoped access to application services.
//!
//! A container is built per request. Both services share one unit of work,
//! so whatever one of them commits is the whole request's work.

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use super::{NoteManager, NoteService, TokenIssuer, UserManager, UserService};
use crate::infra::{NoteStore, UnitOfWork, UserStore};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    /// Get note service
    fn notes(&self) -> Arc<dyn NoteService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    user_service: Arc<dyn UserService>,
    note_service: Arc<dyn NoteService>,
}

impl Services {
    /// Create a container from already-built services
    pub fn new(user_service: Arc<dyn UserService>, note_service: Arc<dyn NoteService>) -> Self {
        Self {
            user_service,
            note_service,
        }
    }

    /// Wire the SeaORM-backed services for one request.
    pub fn for_request(db: DatabaseConnection, tokens: Arc<dyn TokenIssuer>) -> Self {
        let uow = Arc::new(UnitOfWork::new(db));
        let users = Arc::new(UserStore::new(uow.clone()));
        let notes = Arc::new(NoteStore::new(uow));

        Self {
            user_service: Arc::new(UserManager::new(users, tokens)),
            note_service: Arc::new(NoteManager::new(notes)),
        }
    }
}

impl ServiceContainer for Services {
    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn notes(&self) -> Arc<dyn NoteService> {
        self.note_service.clone()
    }
}
