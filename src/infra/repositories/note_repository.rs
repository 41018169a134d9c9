//! Note repository - every query is scoped by owner.

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set,
};
use std::sync::Arc;
use uuid::Uuid;

use super::entities::note::{self, ActiveModel, Entity as NoteEntity};
use crate::domain::{NewNote, Note};
use crate::errors::{AppError, AppResult};
use crate::infra::unit_of_work::{open_transaction, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Note repository trait for dependency injection.
///
/// There is no lookup by note ID alone; callers always supply the owner.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Find a note matching both the owner and the note ID
    async fn find_by_user_scope(&self, user_id: Uuid, note_id: Uuid) -> AppResult<Option<Note>>;

    /// List every note owned by a user, in store order
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Note>>;

    /// Stage a new note and assign its identifier
    async fn add(&self, note: NewNote) -> AppResult<Note>;

    /// Stage the title, content and `updated_at` of an existing note.
    ///
    /// Returns `false` when no row of the owner's matched.
    async fn update(&self, note: &Note) -> AppResult<bool>;

    /// Stage removal of a note. Returns `false` when no row matched.
    async fn remove(&self, note: &Note) -> AppResult<bool>;

    /// Make staged changes durable
    async fn commit(&self) -> AppResult<()>;
}

/// SeaORM implementation of NoteRepository bound to one unit of work
pub struct NoteStore {
    uow: Arc<UnitOfWork>,
}

impl NoteStore {
    /// Create new repository instance
    pub fn new(uow: Arc<UnitOfWork>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl NoteRepository for NoteStore {
    async fn find_by_user_scope(&self, user_id: Uuid, note_id: Uuid) -> AppResult<Option<Note>> {
        let query = NoteEntity::find()
            .filter(note::Column::Id.eq(note_id))
            .filter(note::Column::UserId.eq(user_id));

        let guard = self.uow.current().await;
        let result = match guard.as_ref() {
            Some(txn) => query.one(txn).await,
            None => query.one(self.uow.connection()).await,
        }
        .map_err(AppError::from)?;

        Ok(result.map(Note::from))
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Note>> {
        let query = NoteEntity::find().filter(note::Column::UserId.eq(user_id));

        let guard = self.uow.current().await;
        let models = match guard.as_ref() {
            Some(txn) => query.all(txn).await,
            None => query.all(self.uow.connection()).await,
        }
        .map_err(AppError::from)?;

        Ok(models.into_iter().map(Note::from).collect())
    }

    async fn add(&self, note: NewNote) -> AppResult<Note> {
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(note.user_id),
            title: Set(note.title),
            content: Set(note.content),
            created_at: Set(note.created_at),
            updated_at: Set(note.updated_at),
        };

        let guard = self.uow.writer().await?;
        let txn = open_transaction(&guard)?;
        let model = active_model.insert(txn).await.map_err(AppError::from)?;

        Ok(Note::from(model))
    }

    async fn update(&self, note: &Note) -> AppResult<bool> {
        let guard = self.uow.writer().await?;
        let txn = open_transaction(&guard)?;

        // Filtered by owner too: a foreign row is never touched
        let result = NoteEntity::update_many()
            .col_expr(note::Column::Title, Expr::value(note.title.clone()))
            .col_expr(note::Column::Content, Expr::value(note.content.clone()))
            .col_expr(note::Column::UpdatedAt, Expr::value(note.updated_at))
            .filter(note::Column::Id.eq(note.id))
            .filter(note::Column::UserId.eq(note.user_id))
            .exec(txn)
            .await
            .map_err(AppError::from)?;

        tracing::trace!(note_id = %note.id, rows = result.rows_affected, "Note update staged");
        Ok(result.rows_affected > 0)
    }

    async fn remove(&self, note: &Note) -> AppResult<bool> {
        let guard = self.uow.writer().await?;
        let txn = open_transaction(&guard)?;

        let result = NoteEntity::delete_many()
            .filter(note::Column::Id.eq(note.id))
            .filter(note::Column::UserId.eq(note.user_id))
            .exec(txn)
            .await
            .map_err(AppError::from)?;

        tracing::trace!(note_id = %note.id, rows = result.rows_affected, "Note removal staged");
        Ok(result.rows_affected > 0)
    }

    async fn commit(&self) -> AppResult<()> {
        self.uow.commit().await
    }
}
