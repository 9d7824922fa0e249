pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::PublicUser;

pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenIssuer};

/// Payload for a new account.
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    /// Display name. Must not be empty.
    #[validate(length(min = 1))]
    pub name: String,
    /// Must be a valid email address; stored as given.
    #[validate(email)]
    pub email: String,
    /// At least 6 characters.
    #[validate(length(min = 6))]
    pub password: String,
}

/// Payload for a login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

/// Returned by both signup and login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Opaque bearer token for the `Authorization` header.
    pub token: String,
    pub user: PublicUser,
}
