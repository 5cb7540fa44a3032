//! HTTP handlers

mod auth;
mod health;

pub use auth::{login, logout, me};
pub use health::health;
