use std::sync::Arc;

use uuid::Uuid;

use crate::error::AppError;
use crate::models::{DeleteOutcome, Todo, TodoInput, TodoPatch};
use crate::store::TodoStore;

/// Todo operations over a [`TodoStore`].
///
/// Listing and creation are scoped to the authenticated owner. Fetch, update and
/// delete address a record by id alone; see DESIGN.md on the missing owner check.
#[derive(Clone)]
pub struct TodoService {
    todos: Arc<dyn TodoStore>,
}

impl TodoService {
    pub fn new(todos: Arc<dyn TodoStore>) -> Self {
        Self { todos }
    }

    pub async fn list_for_owner(&self, owner: Uuid) -> Result<Vec<Todo>, AppError> {
        Ok(self.todos.list_by_owner(owner).await?)
    }

    /// Stores `input` as owned by `owner`. Ownership never comes from the input.
    pub async fn create(&self, input: TodoInput, owner: Uuid) -> Result<Todo, AppError> {
        let todo = self.todos.insert(input.into_new_todo(owner)).await?;
        log::info!("todo {} created by {}", todo.id, owner);
        Ok(todo)
    }

    /// Malformed ids fail with `BadRequest` before the store is touched.
    pub async fn get_by_id(&self, id: &str) -> Result<Todo, AppError> {
        let id = parse_id(id)?;
        self.todos
            .find_by_id(id)
            .await?
            .ok_or_else(AppError::todo_not_found)
    }

    pub async fn update_by_id(&self, id: &str, patch: TodoPatch) -> Result<Todo, AppError> {
        let id = parse_id(id)?;
        self.todos
            .update(id, patch)
            .await?
            .ok_or_else(AppError::todo_not_found)
    }

    /// Idempotent: deleting an id with no record still reports `deleted: true`.
    pub async fn delete_by_id(&self, id: &str) -> Result<DeleteOutcome, AppError> {
        let id = parse_id(id)?;
        if self.todos.delete(id).await? {
            log::info!("todo {} deleted", id);
        }
        Ok(DeleteOutcome { deleted: true })
    }
}

fn parse_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::invalid_id())
}
