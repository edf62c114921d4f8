//! REST surface for the historical price statistics, mounted under `/api/crypto`.

pub mod error;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Default bind address; overridden by `CRYPTO_API_ADDR`.
pub const DEFAULT_ADDR: &str = "0.0.0.0:5000";
pub const ADDR_ENV: &str = "CRYPTO_API_ADDR";

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/", get(routes::meta::hello))
        .route("/summary", get(routes::meta::summary))
        .route("/names", get(routes::meta::names))
        .route("/data", post(routes::crypto::crypto_data))
        .route("/date", post(routes::crypto::crypto_by_date))
        .route("/top", post(routes::yearly::top_movers))
        .route("/volatility", post(routes::yearly::volatility))
        .route("/above-mean", post(routes::yearly::above_mean))
        .route("/overview", post(routes::yearly::overview));

    Router::new()
        .nest("/api/crypto", api)
        // Nesting only matches the bare prefix; clients also call it with a trailing slash
        .route("/api/crypto/", get(routes::meta::hello))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn run_server(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
