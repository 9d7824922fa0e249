use std::sync::Arc;

use actix_web::web;
use lazy_static::lazy_static;

use crate::auth::{hash_password, verify_password, AuthResponse, LoginRequest, SignUpRequest, TokenIssuer};
use crate::error::AppError;
use crate::models::{NewUser, PublicUser};
use crate::store::UserStore;

lazy_static! {
    /// Checked when the email is unknown, so every failed login costs one bcrypt verify.
    static ref UNKNOWN_USER_HASH: Option<String> =
        hash_password("todoforge-unknown-user").ok();
}

/// Signup and login over a [`UserStore`].
///
/// bcrypt runs on actix's blocking pool so request workers are not stalled.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenIssuer) -> Self {
        Self { users, tokens }
    }

    /// Creates an account and returns a token for it.
    ///
    /// A duplicate email yields `AppError::DuplicateAccount`; the store's unique
    /// constraint decides, so concurrent signups for one email resolve there.
    /// Any other insert failure is a generic `AppError::BadRequest`.
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<AuthResponse, AppError> {
        let SignUpRequest {
            name,
            email,
            password,
        } = request;

        let password_hash = web::block(move || hash_password(&password)).await??;

        let new_user = NewUser {
            name,
            email,
            password_hash,
        };
        let user = match self.users.insert(new_user).await {
            Ok(user) => user,
            Err(e) if e.is_unique_violation() => {
                log::warn!("signup rejected, email already registered");
                return Err(AppError::duplicate_account());
            }
            Err(e) => {
                log::error!("signup insert failed: {}", e);
                return Err(AppError::bad_request());
            }
        };

        let token = self.tokens.issue(user.id)?;
        log::info!("user {} signed up", user.id);

        Ok(AuthResponse {
            token,
            user: PublicUser::from(&user),
        })
    }

    /// Checks credentials and returns a fresh token.
    ///
    /// Unknown email and wrong password produce the same error after the same
    /// amount of bcrypt work.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        let LoginRequest { email, password } = request;

        let user = self.users.find_by_email(&email).await?;

        let stored_hash = user.as_ref().map(|user| user.password_hash.clone());
        let matches = web::block(move || {
            let Some(hash) = stored_hash.as_deref().or(UNKNOWN_USER_HASH.as_deref()) else {
                return Ok(false);
            };
            verify_password(&password, hash)
        })
        .await??;

        let user = match user {
            Some(user) if matches => user,
            _ => {
                log::warn!("login failed: invalid credentials");
                return Err(AppError::invalid_credentials());
            }
        };

        let token = self.tokens.issue(user.id)?;
        log::info!("user {} logged in", user.id);

        Ok(AuthResponse {
            token,
            user: PublicUser::from(&user),
        })
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }
}
