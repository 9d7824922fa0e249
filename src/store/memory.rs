//! In-process stores with the same contract as the Postgres adapters.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, TodoStore, UserStore};
use crate::models::{NewTodo, NewUser, Todo, TodoPatch, User};

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    // keyed by email, which is the unique column
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Err(StoreError::UniqueViolation("users_email_key".into()));
        }
        let stored = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
        };
        users.insert(stored.email.clone(), stored.clone());
        Ok(stored)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(email).cloned())
    }
}

/// Keeps insertion order so listing is oldest first, like the SQL adapter.
#[derive(Debug, Default)]
pub struct MemoryTodoStore {
    todos: RwLock<Vec<Todo>>,
    calls: AtomicUsize,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Todo>, StoreError> {
        self.touch();
        let todos = self.todos.read().await;
        Ok(todos.iter().filter(|t| t.owner == owner).cloned().collect())
    }

    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        self.touch();
        let now = Utc::now();
        let stored = Todo {
            id: Uuid::new_v4(),
            title: todo.title,
            completed: todo.completed,
            items: todo.items,
            owner: todo.owner,
            created_at: now,
            updated_at: now,
        };
        self.todos.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Todo>, StoreError> {
        self.touch();
        let todos = self.todos.read().await;
        Ok(todos.iter().find(|t| t.id == id).cloned())
    }

    async fn update(&self, id: Uuid, patch: TodoPatch) -> Result<Option<Todo>, StoreError> {
        self.touch();
        let mut todos = self.todos.write().await;
        let Some(todo) = todos.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        patch.apply(todo);
        todo.updated_at = Utc::now().max(todo.updated_at);
        Ok(Some(todo.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.touch();
        let mut todos = self.todos.write().await;
        let before = todos.len();
        todos.retain(|t| t.id != id);
        Ok(todos.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TodoItem;

    fn new_todo(owner: Uuid, title: &str) -> NewTodo {
        NewTodo {
            title: title.to_string(),
            completed: false,
            items: vec![],
            owner,
        }
    }

    #[actix_rt::test]
    async fn test_user_email_is_unique() {
        let store = MemoryUserStore::new();
        let user = NewUser {
            name: "Test".into(),
            email: "test@gmail.com".into(),
            password_hash: "hash".into(),
        };

        let stored = store.insert(user.clone()).await.unwrap();
        assert_eq!(stored.email, "test@gmail.com");

        let err = store.insert(user).await.unwrap_err();
        assert!(err.is_unique_violation());

        // case-sensitive as stored
        assert!(store.find_by_email("TEST@gmail.com").await.unwrap().is_none());
        assert_eq!(
            store.find_by_email("test@gmail.com").await.unwrap().unwrap().id,
            stored.id
        );
    }

    #[actix_rt::test]
    async fn test_todo_lifecycle() {
        let store = MemoryTodoStore::new();
        let owner = Uuid::new_v4();

        let created = store.insert(new_todo(owner, "first")).await.unwrap();
        assert_eq!(created.created_at, created.updated_at);

        let patch = TodoPatch {
            items: Some(vec![TodoItem {
                description: "step".into(),
                complete: true,
            }]),
            ..TodoPatch::default()
        };
        let updated = store.update(created.id, patch).await.unwrap().unwrap();
        assert_eq!(updated.title, "first");
        assert_eq!(updated.items.len(), 1);
        assert!(updated.updated_at >= created.updated_at);

        assert!(store.update(Uuid::new_v4(), TodoPatch::default()).await.unwrap().is_none());

        assert!(store.delete(created.id).await.unwrap());
        assert!(!store.delete(created.id).await.unwrap());
        assert!(store.find_by_id(created.id).await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn test_list_is_owner_scoped() {
        let store = MemoryTodoStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        store.insert(new_todo(alice, "a1")).await.unwrap();
        store.insert(new_todo(bob, "b1")).await.unwrap();
        store.insert(new_todo(alice, "a2")).await.unwrap();

        let titles: Vec<String> = store
            .list_by_owner(alice)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["a1", "a2"]);
        assert_eq!(store.list_by_owner(bob).await.unwrap().len(), 1);
    }
}
