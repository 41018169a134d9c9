//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and migrations
//! - Repositories for users and notes
//! - Unit of Work for request-scoped transactions

pub mod db;
pub mod repositories;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{NoteRepository, NoteStore, UserRepository, UserStore};
pub use unit_of_work::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockNoteRepository, MockUserRepository};
