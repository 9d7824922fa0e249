//! Postgres adapters over a shared `PgPool`.
//!
//! Tables are created by the embedded migration in `migrations/`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{StoreError, TodoStore, UserStore};
use crate::models::{NewTodo, NewUser, Todo, TodoItem, TodoPatch, User};

const TODO_COLUMNS: &str = "id, title, completed, items, user_id, created_at, updated_at";

// SQLSTATE codes for authorization failures reported by the server.
const INVALID_AUTHORIZATION: &str = "28000";
const INVALID_PASSWORD: &str = "28P01";
const INSUFFICIENT_PRIVILEGE: &str = "42501";

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> StoreError {
        match error {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db) => {
                let message = db.message().to_string();
                if db.is_unique_violation() {
                    return StoreError::UniqueViolation(
                        db.constraint().unwrap_or(message.as_str()).to_string(),
                    );
                }
                if db.is_check_violation() || db.is_foreign_key_violation() {
                    return StoreError::Rejected(message);
                }
                match db.code().as_deref() {
                    Some(INVALID_AUTHORIZATION | INVALID_PASSWORD | INSUFFICIENT_PRIVILEGE) => {
                        StoreError::Denied(message)
                    }
                    // class 22 (data exception) and 23 (integrity constraint)
                    Some(code) if code.starts_with("22") || code.starts_with("23") => {
                        StoreError::Rejected(message)
                    }
                    _ => StoreError::Other(message),
                }
            }
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::TypeNotFound { .. }
            | sqlx::Error::ColumnNotFound(_) => StoreError::Rejected(error.to_string()),
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Unavailable(error.to_string()),
            other => StoreError::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let stored = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, name, email, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, email, password_hash",
        )
        .bind(Uuid::new_v4())
        .bind(user.name)
        .bind(user.email)
        .bind(user.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(stored)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

/// Row shape of the `todos` table; `items` is a JSONB column.
#[derive(Debug, FromRow)]
struct TodoRow {
    id: Uuid,
    title: String,
    completed: bool,
    items: Json<Vec<TodoItem>>,
    user_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            completed: row.completed,
            items: row.items.0,
            owner: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Todo>, StoreError> {
        let sql = format!(
            "SELECT {} FROM todos WHERE user_id = $1 ORDER BY created_at ASC",
            TODO_COLUMNS
        );
        let rows = sqlx::query_as::<_, TodoRow>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Todo::from).collect())
    }

    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        let sql = format!(
            "INSERT INTO todos (id, title, completed, items, user_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            TODO_COLUMNS
        );
        let row = sqlx::query_as::<_, TodoRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(todo.title)
            .bind(todo.completed)
            .bind(Json(todo.items))
            .bind(todo.owner)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Todo>, StoreError> {
        let sql = format!("SELECT {} FROM todos WHERE id = $1", TODO_COLUMNS);
        let row = sqlx::query_as::<_, TodoRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Todo::from))
    }

    async fn update(&self, id: Uuid, patch: TodoPatch) -> Result<Option<Todo>, StoreError> {
        // GREATEST keeps updated_at monotonic even if the clock steps back.
        let sql = format!(
            "UPDATE todos
             SET title = COALESCE($2, title),
                 completed = COALESCE($3, completed),
                 items = COALESCE($4, items),
                 updated_at = GREATEST(NOW(), updated_at)
             WHERE id = $1
             RETURNING {}",
            TODO_COLUMNS
        );
        let row = sqlx::query_as::<_, TodoRow>(&sql)
            .bind(id)
            .bind(patch.title)
            .bind(patch.completed)
            .bind(patch.items.map(Json))
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Todo::from))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
