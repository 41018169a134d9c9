//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod note;
pub mod password;
pub mod user;

pub use note::{NewNote, Note};
pub use password::SaltedHash;
pub use user::{NewUser, User, UserResponse};
