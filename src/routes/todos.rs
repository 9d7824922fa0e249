use crate::{
    auth::{AuthMiddleware, AuthenticatedUser},
    error::AppError,
    models::{TodoInput, TodoPatchInput, TodoQuery},
    services::TodoService,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use validator::Validate;

/// Lists the authenticated user's todos.
///
/// ## Query Parameters:
/// - `keyword`, `page` (optional): accepted for compatibility, they do not filter or paginate.
///
/// ## Responses:
/// - `200 OK`: JSON array of the caller's todos, oldest first.
/// - `401 Unauthorized`: missing or invalid bearer token.
#[get("", wrap = "AuthMiddleware")]
pub async fn list_todos(
    todos: web::Data<TodoService>,
    query: web::Query<TodoQuery>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    log::debug!("listing todos for {} with {:?}", user.0, query.into_inner());

    let result = todos.list_for_owner(user.0).await?;

    Ok(HttpResponse::Ok().json(result))
}

/// Creates a todo owned by the authenticated user.
///
/// ## Request Body:
/// `{title, terminada, items}`. A `user` field is rejected with 400; the owner
/// always comes from the token.
///
/// ## Responses:
/// - `201 Created`: the stored todo with its id and timestamps.
/// - `400 Bad Request`: invalid body.
/// - `401 Unauthorized`: missing or invalid bearer token.
#[post("", wrap = "AuthMiddleware")]
pub async fn create_todo(
    todos: web::Data<TodoService>,
    todo_data: web::Json<TodoInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    todo_data.validate()?;

    let created = todos.create(todo_data.into_inner(), user.0).await?;

    Ok(HttpResponse::Created().json(created))
}

/// Fetches a todo by id. Not token-gated and not owner-checked.
///
/// ## Responses:
/// - `200 OK`: the todo.
/// - `400 Bad Request`: malformed id.
/// - `404 Not Found`: no todo with that id.
#[get("/{id}")]
pub async fn get_todo(
    todos: web::Data<TodoService>,
    todo_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let todo = todos.get_by_id(&todo_id).await?;

    Ok(HttpResponse::Ok().json(todo))
}

/// Applies a partial update; absent fields stay as they are.
///
/// ## Responses:
/// - `200 OK`: the updated todo.
/// - `400 Bad Request`: malformed id, invalid body or a `user` field.
/// - `404 Not Found`: no todo with that id.
#[put("/{id}")]
pub async fn update_todo(
    todos: web::Data<TodoService>,
    todo_id: web::Path<String>,
    patch: web::Json<TodoPatchInput>,
) -> Result<impl Responder, AppError> {
    patch.validate()?;

    let updated = todos
        .update_by_id(&todo_id, patch.into_inner().into())
        .await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Deletes a todo by id. Answers `{"deleted": true}` even if nothing matched.
#[delete("/{id}")]
pub async fn delete_todo(
    todos: web::Data<TodoService>,
    todo_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let outcome = todos.delete_by_id(&todo_id).await?;

    Ok(HttpResponse::Ok().json(outcome))
}
