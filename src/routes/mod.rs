pub mod auth;
pub mod health;
pub mod todos;

use actix_web::{
    error::{JsonPayloadError, QueryPayloadError},
    web, HttpRequest,
};

use crate::error::AppError;

/// Registers the `/auth` and `/todos` scopes.
///
/// Expects `web::Data` for `AuthService`, `TodoService` and `TokenIssuer` on the app.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(
            web::scope("/auth")
                .service(auth::signup)
                .service(auth::login),
        )
        .service(
            web::scope("/todos")
                .service(todos::list_todos)
                .service(todos::create_todo)
                .service(todos::get_todo)
                .service(todos::update_todo)
                .service(todos::delete_todo),
        );
}

/// Malformed or mistyped JSON bodies become `BadRequest` with the usual error body.
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}

/// Same for query strings that do not fit the handler's query type.
fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}
