use crate::{
    auth::{LoginRequest, SignUpRequest},
    error::AppError,
    services::AuthService,
};
use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

/// Register a new user
///
/// Creates an account and returns `{token, user}` with status 201.
/// A taken email answers 409.
#[post("/signup")]
pub async fn signup(
    auth: web::Data<AuthService>,
    signup_data: web::Json<SignUpRequest>,
) -> Result<impl Responder, AppError> {
    signup_data.validate()?;

    let response = auth.sign_up(signup_data.into_inner()).await?;

    Ok(HttpResponse::Created().json(response))
}

/// Login user
///
/// Returns `{token, user}` or 401 with the same message for any bad credentials.
#[post("/login")]
pub async fn login(
    auth: web::Data<AuthService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let response = auth.login(login_data.into_inner()).await?;

    Ok(HttpResponse::Ok().json(response))
}
