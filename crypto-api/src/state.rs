/// Shared application state available to all route handlers via Axum's
/// `State` extractor.
pub struct AppState {
    /// The async statistics service. Dispatches dataset loads and queries to
    /// the blocking thread pool; every request loads its own table.
    pub stats: crypto_history::AsyncCryptoStats,
}
