#![doc = "The `todoforge` library crate."]
#![doc = ""]
#![doc = "Authentication (password hashing, token issuance, the token gate), owner-scoped"]
#![doc = "todo storage, HTTP routes and error handling for the todoforge API."]
#![doc = "The binary (`main.rs`) wires these into an actix-web server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

pub use crate::error::AppError;
