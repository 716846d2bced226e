#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
// easier to use when using the functions as callback of foreign functions
#![allow(clippy::needless_pass_by_value)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::Extension;
use axum::Router;
use axum::http::StatusCode;
use axum::middleware::map_response;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::prelude::*;

use crate::config::Config;
use crate::service::Notes;
use crate::service::TracingObserver;
use crate::storage::Memory;
use crate::storage::Postgres;
use crate::storage::Storage;

mod api;
mod config;
mod graceful_shutdown;
mod notes;
mod root;
mod service;
mod storage;
#[cfg(test)]
mod tests;

const DEFAULT_RUST_LOG: &str = "notes_service=debug,tower_http=debug";

#[tokio::main]
async fn main() -> Result<()> {
    setup_environment();
    setup_tracing();

    let config = Config::from_env()?;

    let listener = TcpListener::bind(config.address).await?;
    tracing::info!("Listening on {}", config.address);

    if let Some(database_url) = &config.database_url {
        let storage = Postgres::connect(database_url, config.max_connections).await?;

        let result = serve(listener, create_router(storage.clone(), config.request_timeout)).await;

        storage.close().await;

        result
    } else {
        tracing::warn!("`DATABASE_URL` is not set, notes are kept in memory only");

        serve(listener, create_router(Memory::new(), config.request_timeout)).await
    }
}

/// Serve the app until a shutdown signal is received
async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(graceful_shutdown::handler())
        .await?;

    Ok(())
}

/// Create the router on top of a storage
fn create_router<S: Storage>(storage: S, request_timeout: Duration) -> Router {
    let notes = Notes::new(storage, Arc::new(TracingObserver));

    Router::new()
        .merge(api::router::<S>())
        .route("/health", get(root::health))
        .fallback(root::fallback)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(map_response(root::timeout_as_error))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(notes))
}

fn setup_environment() {
    dotenvy::dotenv().ok();
}

fn setup_tracing() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::registry;

    registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_RUST_LOG.into()),
        ))
        .with(fmt::layer())
        .init();
}
