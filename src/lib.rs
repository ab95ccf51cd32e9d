#![doc = "The `tazky` library crate."]
#![doc = ""]
#![doc = "Account signup/login with bearer JWT sessions, and per-user task CRUD over an"]
#![doc = "injected store. The binary (`main.rs`) wires a PostgreSQL pool into these services"]
#![doc = "and serves the routes from `routes::config`."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod tasks;

pub use crate::error::AppError;
pub use crate::state::AppState;
