#![allow(dead_code)]

use std::sync::Arc;

use actix_cors::Cors;
use actix_http::Request;
use actix_web::body::{to_bytes, MessageBody};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::middleware::Logger;
use actix_web::{test, web, App};
use chrono::Duration;
use serde_json::{json, Value};

use todoforge::auth::{AuthResponse, TokenIssuer};
use todoforge::routes::{self, health};
use todoforge::services::{AuthService, TodoService};
use todoforge::store::{MemoryTodoStore, MemoryUserStore};

pub const TEST_SECRET: &str = "integration-test-secret";

/// Shared services over fresh in-memory stores.
#[derive(Clone)]
pub struct TestState {
    pub auth: web::Data<AuthService>,
    pub todos: web::Data<TodoService>,
    pub tokens: web::Data<TokenIssuer>,
}

impl TestState {
    pub fn new() -> Self {
        let tokens = TokenIssuer::new(TEST_SECRET, Duration::hours(1));
        Self {
            auth: web::Data::new(AuthService::new(
                Arc::new(MemoryUserStore::new()),
                tokens.clone(),
            )),
            todos: web::Data::new(TodoService::new(Arc::new(MemoryTodoStore::new()))),
            tokens: web::Data::new(tokens),
        }
    }
}

/// The application as `main` assembles it, minus the database.
pub async fn init_app(
    state: TestState,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(state.auth)
            .app_data(state.todos)
            .app_data(state.tokens)
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .configure(routes::config),
    )
    .await
}

/// Sends a request and returns status and JSON body, whether the app answered
/// with a response or with an error raised by middleware.
pub async fn send<S, B>(app: &S, req: Request) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = match app.call(req).await {
        Ok(resp) => {
            let status = resp.status();
            (status, test::read_body(resp).await)
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            let body = to_bytes(resp.into_body())
                .await
                .expect("error body should be readable");
            (status, body)
        }
    };
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

pub async fn sign_up<S, B>(app: &S, name: &str, email: &str, password: &str) -> AuthResponse
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/auth/signup")
        .set_json(json!({ "name": name, "email": email, "password": password }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);
    serde_json::from_value(body).expect("signup response should parse")
}
