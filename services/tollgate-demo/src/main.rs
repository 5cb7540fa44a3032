//! Tollgate Demo
//!
//! Small service exposing login, logout and a session-protected route.

use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use tollgate_axum::SessionLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod handlers;
mod state;

use config::Config;
use state::AppState;

/// Every route sits behind the session layer; public ones are exempt paths.
fn app(state: AppState) -> Router {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/me", get(handlers::me))
        .route("/health", get(handlers::health))
        .layer(SessionLayer::new(state.lifecycle.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Tollgate demo");

    let config = Config::from_env()?;
    let state = AppState::from_config(&config.tollgate)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
