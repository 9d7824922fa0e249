//! Business operations behind the HTTP handlers.

pub mod auth;
pub mod todos;

pub use auth::AuthService;
pub use todos::TodoService;
