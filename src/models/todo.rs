use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::messages;

/// A single checklist entry inside a todo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub description: String,
    pub complete: bool,
}

/// A todo as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Store-assigned identifier.
    pub id: Uuid,
    pub title: String,
    /// Completion flag of the whole todo.
    #[serde(rename = "terminada")]
    pub completed: bool,
    pub items: Vec<TodoItem>,
    /// Id of the owning user. Always taken from the authenticated caller.
    #[serde(rename = "user")]
    pub owner: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a todo.
///
/// `user` exists only so that a client-supplied owner can be detected and rejected.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TodoInput {
    #[validate(length(min = 1))]
    pub title: String,
    pub terminada: bool,
    pub items: Vec<TodoItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom = "reject_owner")]
    pub user: Option<serde_json::Value>,
}

/// Request body for a partial update. Absent fields are left untouched.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct TodoPatchInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminada: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<TodoItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom = "reject_owner")]
    pub user: Option<serde_json::Value>,
}

/// Query parameters accepted on list. They do not affect the result set.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TodoQuery {
    pub keyword: Option<String>,
    pub page: Option<String>,
}

/// Result of a delete. Always `deleted: true`, whether or not a record matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub deleted: bool,
}

/// A todo ready for insertion, owner already resolved.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
    pub completed: bool,
    pub items: Vec<TodoItem>,
    pub owner: Uuid,
}

/// Store-level partial update.
#[derive(Debug, Clone, Default)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub items: Option<Vec<TodoItem>>,
}

impl TodoInput {
    /// Builds the insert for `owner`, discarding anything the client said about ownership.
    pub fn into_new_todo(self, owner: Uuid) -> NewTodo {
        NewTodo {
            title: self.title,
            completed: self.terminada,
            items: self.items,
            owner,
        }
    }
}

impl From<TodoPatchInput> for TodoPatch {
    fn from(input: TodoPatchInput) -> Self {
        Self {
            title: input.title,
            completed: input.terminada,
            items: input.items,
        }
    }
}

impl TodoPatch {
    /// Applies the patch in place, returning whether anything changed.
    pub fn apply(self, todo: &mut Todo) -> bool {
        let mut changed = false;
        if let Some(title) = self.title {
            todo.title = title;
            changed = true;
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
            changed = true;
        }
        if let Some(items) = self.items {
            todo.items = items;
            changed = true;
        }
        changed
    }
}

fn reject_owner(_owner: &serde_json::Value) -> Result<(), ValidationError> {
    let mut error = ValidationError::new("owner_not_allowed");
    error.message = Some(Cow::Borrowed(messages::OWNER_NOT_ALLOWED));
    Err(error)
}
