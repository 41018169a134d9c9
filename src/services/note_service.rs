//! Note service - per-user note CRUD.
//!
//! Every operation takes the acting user's ID explicitly. A note owned by
//! someone else is indistinguishable from a note that does not exist.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{NewNote, Note};
use crate::errors::{AppError, AppResult};
use crate::infra::NoteRepository;

/// Note service trait for dependency injection.
#[async_trait]
pub trait NoteService: Send + Sync {
    /// Create a note owned by `user_id`
    async fn create(&self, user_id: Uuid, title: String, content: String) -> AppResult<Note>;

    /// Fetch one of the user's notes
    async fn get(&self, user_id: Uuid, note_id: Uuid) -> AppResult<Option<Note>>;

    /// All notes owned by the user
    async fn list(&self, user_id: Uuid) -> AppResult<Vec<Note>>;

    /// Partial edit. Blank or missing fields keep their stored value.
    async fn update(
        &self,
        user_id: Uuid,
        note_id: Uuid,
        title: Option<String>,
        content: Option<String>,
    ) -> AppResult<Option<Note>>;

    /// Returns `false` when there was nothing of the user's to delete
    async fn delete(&self, user_id: Uuid, note_id: Uuid) -> AppResult<bool>;
}

/// Concrete implementation of NoteService
pub struct NoteManager {
    notes: Arc<dyn NoteRepository>,
}

impl NoteManager {
    /// Create new note service instance
    pub fn new(notes: Arc<dyn NoteRepository>) -> Self {
        Self { notes }
    }
}

#[async_trait]
impl NoteService for NoteManager {
    async fn create(&self, user_id: Uuid, title: String, content: String) -> AppResult<Note> {
        if title.trim().is_empty() {
            return Err(AppError::validation("title must not be empty"));
        }

        let note = self
            .notes
            .add(NewNote::new(user_id, title, content, Utc::now()))
            .await?;
        self.notes.commit().await?;

        tracing::info!(note_id = %note.id, user_id = %user_id, "Note created");
        Ok(note)
    }

    async fn get(&self, user_id: Uuid, note_id: Uuid) -> AppResult<Option<Note>> {
        self.notes.find_by_user_scope(user_id, note_id).await
    }

    async fn list(&self, user_id: Uuid) -> AppResult<Vec<Note>> {
        self.notes.list_by_user(user_id).await
    }

    async fn update(
        &self,
        user_id: Uuid,
        note_id: Uuid,
        title: Option<String>,
        content: Option<String>,
    ) -> AppResult<Option<Note>> {
        let Some(mut note) = self.notes.find_by_user_scope(user_id, note_id).await? else {
            return Ok(None);
        };

        note.apply_changes(title, content, Utc::now());
        if !self.notes.update(&note).await? {
            // Deleted between the lookup and the write
            tracing::warn!(note_id = %note.id, user_id = %user_id, "Note vanished before update");
            return Ok(None);
        }
        self.notes.commit().await?;

        tracing::info!(note_id = %note.id, user_id = %user_id, "Note updated");
        Ok(Some(note))
    }

    async fn delete(&self, user_id: Uuid, note_id: Uuid) -> AppResult<bool> {
        let Some(note) = self.notes.find_by_user_scope(user_id, note_id).await? else {
            return Ok(false);
        };

        if !self.notes.remove(&note).await? {
            tracing::warn!(note_id = %note.id, user_id = %user_id, "Note vanished before delete");
            return Ok(false);
        }
        self.notes.commit().await?;

        tracing::info!(note_id = %note.id, user_id = %user_id, "Note deleted");
        Ok(true)
    }
}
