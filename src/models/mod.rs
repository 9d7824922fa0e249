pub mod todo;
pub mod user;

pub use todo::{DeleteOutcome, NewTodo, Todo, TodoInput, TodoItem, TodoPatch, TodoPatchInput, TodoQuery};
pub use user::{NewUser, PublicUser, User};
