//! User repository - credential store lookups and inserts.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use std::sync::Arc;
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{NewUser, User};
use crate::errors::{AppError, AppResult};
use crate::infra::unit_of_work::{open_transaction, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by exact (case-sensitive) username
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Stage a new user and assign its identifier.
    ///
    /// Fails with `Conflict` when the username or email is taken.
    async fn add(&self, user: NewUser) -> AppResult<User>;

    /// Make staged changes durable.
    async fn commit(&self) -> AppResult<()>;
}

/// SeaORM implementation of UserRepository bound to one unit of work
pub struct UserStore {
    uow: Arc<UnitOfWork>,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(uow: Arc<UnitOfWork>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let query = UserEntity::find().filter(user::Column::Username.eq(username));

        let guard = self.uow.current().await;
        let result = match guard.as_ref() {
            Some(txn) => query.one(txn).await,
            None => query.one(self.uow.connection()).await,
        }
        .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let query = UserEntity::find_by_id(id);

        let guard = self.uow.current().await;
        let result = match guard.as_ref() {
            Some(txn) => query.one(txn).await,
            None => query.one(self.uow.connection()).await,
        }
        .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn add(&self, user: NewUser) -> AppResult<User> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(user.username),
            email: Set(user.email),
            password_hash: Set(user.credentials.hash),
            password_salt: Set(user.credentials.salt),
            created_at: Set(chrono::Utc::now()),
        };

        let guard = self.uow.writer().await?;
        let txn = open_transaction(&guard)?;
        let model = active_model.insert(txn).await.map_err(AppError::from)?;

        Ok(User::from(model))
    }

    async fn commit(&self) -> AppResult<()> {
        self.uow.commit().await
    }
}
