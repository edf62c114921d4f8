use std::path::PathBuf;
use std::time::Duration;

/// Dataset used when nothing else is configured, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "data/crypto_data.csv";

pub const DATA_FILE_ENV: &str = "CRYPTO_DATA_FILE";
pub const DATA_URL_ENV: &str = "CRYPTO_DATA_URL";
pub const CACHE_DIR_ENV: &str = "CRYPTO_CACHE_DIR";
pub const OFFLINE_ENV: &str = "CRYPTO_OFFLINE";

/// Sentinel date substituted for missing or unparseable dates.
pub const EPOCH_DATE: &str = "1970-01-01";

/// Number of coins returned by the yearly top-movers ranking.
pub const TOP_MOVERS_LIMIT: usize = 4;

/// Columns every dataset must provide, in canonical order.
pub const CSV_COLUMNS: [&str; 5] = ["coin_name", "date", "price", "total_volume", "market_cap"];

/// Where the raw price table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// A CSV file on the local filesystem, read on every load.
    File(PathBuf),
    /// A CSV (optionally `.gz`) served over HTTP, downloaded once into the cache.
    Url(String),
}

impl Default for DatasetSource {
    fn default() -> Self {
        DatasetSource::File(PathBuf::from(DEFAULT_DATA_FILE))
    }
}

/// Explicit configuration handed to the dataset loader.
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    pub source: DatasetSource,
    pub cache_dir: PathBuf,
    /// If true, remote sources are never downloaded (cached copies only).
    pub offline: bool,
    pub timeout: Duration,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            source: DatasetSource::default(),
            cache_dir: default_cache_dir(),
            offline: false,
            timeout: Duration::from_secs(120),
        }
    }
}

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("crypto-history")
    } else {
        PathBuf::from(".crypto-history-cache")
    }
}
