//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every service operation returns `Result<T, AppError>`, so handlers can propagate
//! failures with `?` and let actix-web render them.
//!
//! `AppError` implements `actix_web::error::ResponseError` to convert application
//! errors into HTTP responses with a JSON body of the form `{"error": "<message>"}`.
//! Messages shown to clients come from the fixed set in [`messages`]; the text of
//! internal failures (driver errors, hashing errors) is logged and never returned.
//!
//! Store failures are translated through [`AppError::from_store_error`], an
//! exhaustive match from store failure kind to error kind.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::store::StoreError;

/// Fixed client-facing messages, one per error kind.
pub mod messages {
    pub const BAD_REQUEST: &str = "An unexpected error occurred, please try again.";
    pub const SESSION_EXPIRED: &str = "Session expired, please log in again.";
    pub const INVALID_CREDENTIALS: &str = "Incorrect email or password.";
    pub const TODO_NOT_FOUND: &str = "Todo not found";
    pub const DUPLICATE_ACCOUNT: &str = "Email already in use, enter a different one.";
    pub const INTERNAL_ERROR: &str = "An unexpected error occurred, please try again.";
    pub const INVALID_ID: &str = "Enter a valid id.";
    pub const OWNER_NOT_ALLOWED: &str = "You cannot pass user id";
}

/// Represents all possible errors that can occur within the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Malformed input or id, or a generic storage failure (HTTP 400).
    BadRequest(String),
    /// Missing, invalid or expired token, or bad login credentials (HTTP 401).
    Unauthorized(String),
    /// No record for the requested id (HTTP 404).
    NotFound(String),
    /// Unique-constraint violation on the account email (HTTP 409).
    DuplicateAccount(String),
    /// Unclassified server-side failure (HTTP 500).
    /// The carried string is the internal cause; it is logged, not sent.
    InternalError(String),
}

impl AppError {
    pub fn bad_request() -> Self {
        AppError::BadRequest(messages::BAD_REQUEST.into())
    }

    pub fn invalid_id() -> Self {
        AppError::BadRequest(messages::INVALID_ID.into())
    }

    pub fn session_expired() -> Self {
        AppError::Unauthorized(messages::SESSION_EXPIRED.into())
    }

    pub fn invalid_credentials() -> Self {
        AppError::Unauthorized(messages::INVALID_CREDENTIALS.into())
    }

    pub fn todo_not_found() -> Self {
        AppError::NotFound(messages::TODO_NOT_FOUND.into())
    }

    pub fn duplicate_account() -> Self {
        AppError::DuplicateAccount(messages::DUPLICATE_ACCOUNT.into())
    }

    pub fn internal(cause: impl fmt::Display) -> Self {
        AppError::InternalError(cause.to_string())
    }

    /// The store failure table.
    ///
    /// Refused data maps to `BadRequest`, refused access to `Unauthorized` and an
    /// unavailable store to `InternalError`. Every other failure falls back to the
    /// generic `BadRequest`. Adding a `StoreError` variant breaks this match.
    pub fn from_store_error(error: &StoreError) -> Self {
        match error {
            StoreError::Rejected(_) => AppError::bad_request(),
            StoreError::Denied(_) => AppError::session_expired(),
            StoreError::Unavailable(_) => AppError::InternalError(messages::INTERNAL_ERROR.into()),
            StoreError::UniqueViolation(_) | StoreError::NotFound | StoreError::Other(_) => {
                AppError::bad_request()
            }
        }
    }

    /// The message that is safe to show to a client.
    pub fn public_message(&self) -> &str {
        match self {
            AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::DuplicateAccount(msg) => msg,
            AppError::InternalError(_) => messages::INTERNAL_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::DuplicateAccount(msg) => write!(f, "Duplicate Account: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateAccount(_) => StatusCode::CONFLICT,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::InternalError(cause) = self {
            log::error!("internal error: {}", cause);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.public_message()
        }))
    }
}

/// Translates a store failure through [`AppError::from_store_error`].
///
/// The driver-level cause is logged here since it never reaches the client.
impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::Unavailable(_) | StoreError::Other(_) => {
                log::error!("store failure: {}", error)
            }
            _ => log::warn!("store failure: {}", error),
        }
        AppError::from_store_error(&error)
    }
}

/// Converts `validator::ValidationErrors` into `AppError::BadRequest`.
///
/// The validator report only names fields and rules, so it is kept as the message.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::BadRequest(error.to_string())
    }
}

/// Any JWT processing failure is a uniform session failure.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        log::debug!("token rejected: {}", error);
        AppError::session_expired()
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::internal(format!("password hashing failed: {}", error))
    }
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(error: actix_web::error::BlockingError) -> AppError {
        AppError::internal(format!("blocking task failed: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_responses() {
        let response = AppError::session_expired().error_response();
        assert_eq!(response.status(), 401);

        let response = AppError::bad_request().error_response();
        assert_eq!(response.status(), 400);

        let response = AppError::todo_not_found().error_response();
        assert_eq!(response.status(), 404);

        let response = AppError::duplicate_account().error_response();
        assert_eq!(response.status(), 409);

        let response = AppError::internal("db exploded").error_response();
        assert_eq!(response.status(), 500);
    }

    #[test]
    fn test_store_failure_table() {
        let cases = [
            (StoreError::Rejected("check".into()), AppError::bad_request()),
            (StoreError::Denied("role".into()), AppError::session_expired()),
            (
                StoreError::Unavailable("pool".into()),
                AppError::InternalError(messages::INTERNAL_ERROR.into()),
            ),
            (
                StoreError::UniqueViolation("users_email_key".into()),
                AppError::bad_request(),
            ),
            (StoreError::NotFound, AppError::bad_request()),
            (StoreError::Other("?".into()), AppError::bad_request()),
        ];
        for (store_error, expected) in cases {
            assert_eq!(AppError::from(store_error), expected);
        }
    }

    #[test]
    fn test_internal_cause_is_not_exposed() {
        let error = AppError::internal("connection refused on 10.0.0.3:5432");
        assert_eq!(error.public_message(), messages::INTERNAL_ERROR);
    }

    #[actix_rt::test]
    async fn test_error_body_carries_fixed_message() {
        let response = AppError::internal("SQLSTATE 08006").error_response();
        let body = actix_web::body::to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], messages::INTERNAL_ERROR);
    }
}
