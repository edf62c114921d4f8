use std::net::SocketAddr;
use std::sync::Arc;

use crypto_api::state::AppState;
use crypto_api::{run_server, ADDR_ENV, DEFAULT_ADDR};
use crypto_history::{AsyncCryptoStats, CryptoStats};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let stats = CryptoStats::builder().from_env().build();
    tracing::info!(%stats, "statistics service configured");

    let state = Arc::new(AppState {
        stats: AsyncCryptoStats::new(stats),
    });

    let addr: SocketAddr = std::env::var(ADDR_ENV)
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()?;
    run_server(addr, state).await
}
