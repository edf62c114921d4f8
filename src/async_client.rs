//! Async wrapper around [`CryptoStats`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free.
//! Dataset loads are CPU- and IO-bound, making this approach efficient.
//!
//! # Example
//!
//! ```no_run
//! use crypto_history::AsyncCryptoStats;
//! use crypto_history::CryptoStats;
//!
//! #[tokio::main]
//! async fn main() {
//!     let stats = AsyncCryptoStats::new(CryptoStats::builder().from_env().build());
//!
//!     let summary = stats.run(|s| s.summary()).await.unwrap();
//! }
//! ```

use std::sync::Arc;

use crate::error::{CryptoStatsError, Result};
use crate::CryptoStats;

/// Async wrapper around [`CryptoStats`].
///
/// Cloning is cheap. [`CryptoStats`] holds no per-request state, so calls run
/// in parallel on the blocking pool without a lock.
#[derive(Clone)]
pub struct AsyncCryptoStats {
    inner: Arc<CryptoStats>,
}

impl AsyncCryptoStats {
    pub fn new(stats: CryptoStats) -> Self {
        Self {
            inner: Arc::new(stats),
        }
    }

    /// Run a sync operation on the blocking thread pool.
    ///
    /// The closure receives a `&CryptoStats` reference and should return
    /// a `Result<T>`.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&CryptoStats) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let stats = self.inner.clone();
        tokio::task::spawn_blocking(move || f(&stats))
            .await
            .map_err(|e| CryptoStatsError::Task(format!("task join error: {e}")))?
    }

    /// Drop cached downloads asynchronously.
    pub async fn refresh(&self) -> Result<bool> {
        self.run(|s| s.refresh()).await
    }

    /// Access the wrapped sync instance.
    pub fn inner(&self) -> &CryptoStats {
        &self.inner
    }
}
