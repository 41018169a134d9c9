//! HTTP request handlers.

pub mod note_handler;
pub mod user_handler;

pub use note_handler::note_routes;
pub use user_handler::user_routes;
