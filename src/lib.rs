//! Notes API - multi-user note keeping backend
//!
//! Users register and log in to receive a signed bearer token; every note
//! operation is scoped to the authenticated user.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Users, notes and password hashing
//! - **services**: Registration, login, token issuing and note CRUD
//! - **infra**: Database, repositories and the unit of work
//! - **api**: HTTP handlers, middleware, and routes
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Note, User};
pub use errors::{AppError, AppResult};
