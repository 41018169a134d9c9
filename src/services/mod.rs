//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on repository traits, never on
//! SeaORM directly, so tests can swap the store out.

pub mod container;
mod note_service;
mod token_service;
mod user_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use note_service::{NoteManager, NoteService};
pub use token_service::{signing_key_bytes, Claims, JwtIssuer, TokenIssuer};
pub use user_service::{UserManager, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use token_service::MockTokenIssuer;
