//! Historical cryptocurrency price statistics.
//!
//! Loads a flat `(coin_name, date, price, total_volume, market_cap)` CSV
//! through DuckDB, repairs missing values, and answers analytical queries over
//! the resulting in-memory table: summaries, date ranges, per-date snapshots,
//! yearly top movers, volatility extremes and coins above the yearly mean.
//!
//! # Quick start
//!
//! ```no_run
//! use crypto_history::CryptoStats;
//! use crypto_history::queries::YearParams;
//!
//! let stats = CryptoStats::builder()
//!     .data_file("data/crypto_data.csv")
//!     .build();
//!
//! let summary = stats.summary().unwrap();
//! println!("{} coins, average price {}", summary.total_coins, summary.average_price);
//!
//! let movers = stats.top_movers(&YearParams::new(2021)).unwrap();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod cache;
pub mod config;
pub mod connection;
pub mod error;
pub mod loader;
pub mod models;
pub mod queries;
pub mod series;
pub mod table;

#[cfg(feature = "async")]
pub use async_client::AsyncCryptoStats;
pub use cache::DatasetCache;
pub use config::{DatasetConfig, DatasetSource};
pub use connection::Connection;
pub use error::{CryptoStatsError, Result};
pub use loader::DatasetLoader;
pub use table::Table;

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use models::{
    AboveMeanResult, RangeQueryResult, SnapshotResult, SummaryStats, VolatilityExtremesResult,
    YearOverviewResult, YearlyRankingResult,
};
use queries::{RangeParams, SnapshotParams, YearParams};

// ---------------------------------------------------------------------------
// CryptoStatsBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`CryptoStats`] instance.
///
/// Use [`CryptoStats::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](CryptoStatsBuilder::build).
#[derive(Default)]
pub struct CryptoStatsBuilder {
    config: DatasetConfig,
}

impl CryptoStatsBuilder {
    /// Read the dataset from a local CSV file.
    pub fn data_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.source = DatasetSource::File(path.as_ref().to_path_buf());
        self
    }

    /// Download the dataset from a URL (a `.gz` suffix is decompressed).
    pub fn data_url(mut self, url: impl Into<String>) -> Self {
        self.config.source = DatasetSource::Url(url.into());
        self
    }

    /// Set a custom cache directory for downloaded datasets.
    ///
    /// If not set, the platform-appropriate cache directory is used
    /// (e.g. `~/.cache/crypto-history` on Linux).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.cache_dir = path.as_ref().to_path_buf();
        self
    }

    /// Enable or disable offline mode.
    ///
    /// When offline, remote datasets are only read from the cache.
    /// Defaults to `false`.
    pub fn offline(mut self, offline: bool) -> Self {
        self.config.offline = offline;
        self
    }

    /// Set the HTTP timeout for dataset downloads. Defaults to 120 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Apply settings from the environment.
    ///
    /// Reads `CRYPTO_DATA_FILE`, `CRYPTO_DATA_URL` (wins over the file),
    /// `CRYPTO_CACHE_DIR` and `CRYPTO_OFFLINE` (`1`/`true`). Unset variables
    /// leave the current value untouched.
    pub fn from_env(mut self) -> Self {
        if let Ok(file) = std::env::var(config::DATA_FILE_ENV) {
            self.config.source = DatasetSource::File(PathBuf::from(file));
        }
        if let Ok(url) = std::env::var(config::DATA_URL_ENV) {
            self.config.source = DatasetSource::Url(url);
        }
        if let Ok(dir) = std::env::var(config::CACHE_DIR_ENV) {
            self.config.cache_dir = PathBuf::from(dir);
        }
        if let Ok(flag) = std::env::var(config::OFFLINE_ENV) {
            self.config.offline = matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        self
    }

    /// Use a fully prepared configuration.
    pub fn config(mut self, config: DatasetConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the statistics service.
    ///
    /// Does not touch the dataset; it is read on every query.
    pub fn build(self) -> CryptoStats {
        CryptoStats {
            loader: DatasetLoader::new(self.config),
        }
    }
}

// ---------------------------------------------------------------------------
// CryptoStats
// ---------------------------------------------------------------------------

/// The main entry point.
///
/// Every query method validates its parameters, loads a fresh [`Table`] and
/// runs one query over it. Nothing computed is kept between calls, so a
/// single instance can be shared freely across threads.
pub struct CryptoStats {
    loader: DatasetLoader,
}

impl CryptoStats {
    /// Create a new builder for configuring the service.
    pub fn builder() -> CryptoStatsBuilder {
        CryptoStatsBuilder::default()
    }

    /// Load and repair the dataset.
    pub fn load(&self) -> Result<Table> {
        self.loader.load()
    }

    // -- Queries -----------------------------------------------------------

    /// Distinct coin count and the row-wise average price.
    pub fn summary(&self) -> Result<SummaryStats> {
        Ok(self.load()?.summary().summarize())
    }

    /// All distinct coin ids, sorted.
    pub fn coin_names(&self) -> Result<Vec<String>> {
        Ok(self.load()?.summary().coin_names())
    }

    /// One coin's rows between two dates with the price change over the window.
    pub fn range_query(&self, params: &RangeParams) -> Result<RangeQueryResult> {
        let (coin, start, end) = params.resolve()?;
        self.load()?.range().query(&coin, start, end)
    }

    /// Market cap of every coin on one date, smallest first.
    pub fn snapshot(&self, params: &SnapshotParams) -> Result<SnapshotResult> {
        let date = params.resolve()?;
        self.load()?.snapshot().by_date(date)
    }

    /// The coins with the largest absolute price change in a year.
    pub fn top_movers(&self, params: &YearParams) -> Result<YearlyRankingResult> {
        let year = params.resolve()?;
        self.load()?.yearly().top_movers(year)
    }

    /// The most and least volatile coins of a year by price standard deviation.
    pub fn volatility_extremes(&self, params: &YearParams) -> Result<VolatilityExtremesResult> {
        let year = params.resolve()?;
        self.load()?.yearly().volatility_extremes(year)
    }

    /// Coins whose mean price in a year beats the mean of all per-coin means.
    pub fn above_global_mean(&self, params: &YearParams) -> Result<AboveMeanResult> {
        let year = params.resolve()?;
        self.load()?.yearly().above_global_mean(year)
    }

    /// The most stable coin and the above-mean coins of a year together.
    pub fn year_overview(&self, params: &YearParams) -> Result<YearOverviewResult> {
        let year = params.resolve()?;
        self.load()?.yearly().overview(year)
    }

    // -- Metadata and utility methods --------------------------------------

    /// Drop cached downloads so the next load fetches a fresh copy.
    ///
    /// Returns `true` if the source is remote and the cache was cleared,
    /// `false` for local files (which are always read fresh).
    pub fn refresh(&self) -> Result<bool> {
        match self.loader.config().source {
            DatasetSource::Url(_) => {
                self.loader.cache().clear()?;
                tracing::info!("dataset cache cleared");
                Ok(true)
            }
            DatasetSource::File(_) => Ok(false),
        }
    }

    /// The dataset configuration this instance was built with.
    pub fn config(&self) -> &DatasetConfig {
        self.loader.config()
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for CryptoStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = self.loader.config();
        let source = match &config.source {
            DatasetSource::File(p) => p.display().to_string(),
            DatasetSource::Url(u) => u.clone(),
        };
        write!(
            f,
            "CryptoStats(source={}, cache_dir={}, offline={})",
            source,
            config.cache_dir.display(),
            config.offline
        )
    }
}
