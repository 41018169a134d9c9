//! Shared test fixtures: in-memory stores and service wiring.
//!
//! The stores apply writes immediately and count commits, which is enough to
//! observe what the services ask of a repository.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use notes_api::config::JwtSettings;
use notes_api::domain::{NewNote, NewUser, Note, User};
use notes_api::errors::{AppError, AppResult};
use notes_api::infra::{NoteRepository, UserRepository};
use notes_api::services::{
    JwtIssuer, NoteManager, NoteService, ServiceContainer, Services, TokenIssuer, UserManager,
    UserService,
};

pub const TEST_KEY: &str = "integration-test-signing-key-0123456789!";
pub const TEST_ISSUER: &str = "notes-api-test";
pub const TEST_AUDIENCE: &str = "notes-api-test-clients";

pub fn jwt_settings() -> JwtSettings {
    JwtSettings::new(TEST_KEY, TEST_ISSUER, TEST_AUDIENCE, 60)
}

/// In-memory user store
#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<Vec<User>>,
    commits: AtomicUsize,
}

impl InMemoryUsers {
    pub fn all(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }

    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn add(&self, user: NewUser) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == user.username) {
            return Err(AppError::conflict("Username"));
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::conflict("Email"));
        }

        let stored = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.credentials.hash,
            password_salt: user.credentials.salt,
            created_at: Utc::now(),
        };
        users.push(stored.clone());
        Ok(stored)
    }

    async fn commit(&self) -> AppResult<()> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// In-memory note store. Insertion order is store order.
#[derive(Default)]
pub struct InMemoryNotes {
    notes: Mutex<Vec<Note>>,
    mutations: AtomicUsize,
    commits: AtomicUsize,
}

impl InMemoryNotes {
    pub fn all(&self) -> Vec<Note> {
        self.notes.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NoteRepository for InMemoryNotes {
    async fn find_by_user_scope(&self, user_id: Uuid, note_id: Uuid) -> AppResult<Option<Note>> {
        let notes = self.notes.lock().unwrap();
        Ok(notes
            .iter()
            .find(|n| n.id == note_id && n.user_id == user_id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Note>> {
        let notes = self.notes.lock().unwrap();
        Ok(notes.iter().filter(|n| n.user_id == user_id).cloned().collect())
    }

    async fn add(&self, note: NewNote) -> AppResult<Note> {
        let stored = Note {
            id: Uuid::new_v4(),
            title: note.title,
            content: note.content,
            user_id: note.user_id,
            created_at: note.created_at,
            updated_at: note.updated_at,
        };
        self.notes.lock().unwrap().push(stored.clone());
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(stored)
    }

    async fn update(&self, note: &Note) -> AppResult<bool> {
        let mut notes = self.notes.lock().unwrap();
        self.mutations.fetch_add(1, Ordering::SeqCst);
        match notes
            .iter_mut()
            .find(|n| n.id == note.id && n.user_id == note.user_id)
        {
            Some(existing) => {
                existing.title = note.title.clone();
                existing.content = note.content.clone();
                existing.updated_at = note.updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, note: &Note) -> AppResult<bool> {
        let mut notes = self.notes.lock().unwrap();
        let before = notes.len();
        notes.retain(|n| !(n.id == note.id && n.user_id == note.user_id));
        self.mutations.fetch_add(1, Ordering::SeqCst);
        Ok(notes.len() < before)
    }

    async fn commit(&self) -> AppResult<()> {
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Services over shared in-memory stores
pub struct TestBackend {
    pub users: Arc<InMemoryUsers>,
    pub notes: Arc<InMemoryNotes>,
    pub issuer: Arc<dyn TokenIssuer>,
}

impl TestBackend {
    pub fn new() -> Self {
        Self::with_settings(jwt_settings())
    }

    pub fn with_settings(settings: JwtSettings) -> Self {
        Self {
            users: Arc::new(InMemoryUsers::default()),
            notes: Arc::new(InMemoryNotes::default()),
            issuer: Arc::new(JwtIssuer::new(settings)),
        }
    }

    pub fn user_service(&self) -> UserManager {
        UserManager::new(self.users.clone(), self.issuer.clone())
    }

    pub fn note_service(&self) -> NoteManager {
        NoteManager::new(self.notes.clone())
    }

    pub fn container(&self) -> Arc<dyn ServiceContainer> {
        let users: Arc<dyn UserService> = Arc::new(self.user_service());
        let notes: Arc<dyn NoteService> = Arc::new(self.note_service());
        Arc::new(Services::new(users, notes))
    }
}
