use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;

use todoforge::auth::TokenIssuer;
use todoforge::config::Config;
use todoforge::routes::{self, health};
use todoforge::services::{AuthService, TodoService};
use todoforge::store::{PgTodoStore, PgUserStore};

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| startup_error("invalid configuration", e))?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .map_err(|e| startup_error("failed to connect to database", e))?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|e| startup_error("failed to run migrations", e))?;

    let tokens = TokenIssuer::new(&config.jwt_secret, config.token_ttl);
    let auth_service = web::Data::new(AuthService::new(
        Arc::new(PgUserStore::new(pool.clone())),
        tokens.clone(),
    ));
    let todo_service = web::Data::new(TodoService::new(Arc::new(PgTodoStore::new(pool))));
    let tokens = web::Data::new(tokens);

    log::info!("Starting todoforge server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(auth_service.clone())
            .app_data(todo_service.clone())
            .app_data(tokens.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
