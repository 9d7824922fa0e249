//! Persistence seams for users and todos.
//!
//! Services only see the [`UserStore`] and [`TodoStore`] traits. The Postgres
//! adapters back the running server; the in-memory adapters back the tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{NewTodo, NewUser, Todo, TodoPatch, User};

pub use memory::{MemoryTodoStore, MemoryUserStore};
pub use postgres::{PgTodoStore, PgUserStore};

/// Failures reported by a store adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Insert rejected by a unique constraint.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// The addressed record does not exist.
    #[error("record not found")]
    NotFound,

    /// The store refused the data (constraint, type or decode failure).
    #[error("rejected by store: {0}")]
    Rejected(String),

    /// The store refused the caller's credentials or privileges.
    #[error("access denied by store: {0}")]
    Denied(String),

    /// The store could not be reached or failed internally.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store error: {0}")]
    Other(String),
}

impl StoreError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, StoreError::UniqueViolation(_))
    }
}

/// Credential store. Email uniqueness is the store's responsibility.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user, assigning its id.
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;

    /// Exact, case-sensitive lookup by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

/// Todo record store.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All todos owned by `owner`, oldest first.
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Todo>, StoreError>;

    /// Inserts a todo, assigning its id and timestamps.
    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Todo>, StoreError>;

    /// Applies a partial update. `None` when no record has that id.
    async fn update(&self, id: Uuid, patch: TodoPatch) -> Result<Option<Todo>, StoreError>;

    /// Removes a todo, returning whether a record was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}
