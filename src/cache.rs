//! Local resolution and download cache for the price dataset.
//!
//! Local files are used in place. Remote datasets are downloaded once into the
//! cache directory and re-used by every subsequent load until [`DatasetCache::clear`]
//! (or `refresh`) removes them.

use crate::config::DatasetSource;
use crate::error::{CryptoStatsError, Result};
use flate2::read::GzDecoder;
use reqwest::blocking::Client;
use std::fs;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

/// Resolves a [`DatasetSource`] to a readable local CSV file.
pub struct DatasetCache {
    /// Directory where downloaded datasets are stored.
    pub cache_dir: PathBuf,
    /// If true, never download (use cached files only).
    pub offline: bool,
    timeout: Duration,
    client: OnceLock<Client>,
    // Serializes downloads so concurrent first loads fetch the file once
    download_lock: Mutex<()>,
}

impl DatasetCache {
    /// Create a new cache rooted at `cache_dir`.
    ///
    /// The directory is created lazily, on the first download.
    pub fn new(cache_dir: PathBuf, offline: bool, timeout: Duration) -> Self {
        Self {
            cache_dir,
            offline,
            timeout,
            client: OnceLock::new(),
            download_lock: Mutex::new(()),
        }
    }

    /// Lazy HTTP client, created on first use.
    fn client(&self) -> Result<&Client> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = Client::builder()
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(self.client.get_or_init(|| client))
    }

    /// Return the local path of the dataset, downloading it first if needed.
    pub fn resolve(&self, source: &DatasetSource) -> Result<PathBuf> {
        match source {
            DatasetSource::File(path) => {
                if path.is_file() {
                    Ok(path.clone())
                } else {
                    Err(CryptoStatsError::DataUnavailable(format!(
                        "dataset file {} does not exist",
                        path.display()
                    )))
                }
            }
            DatasetSource::Url(url) => self.ensure_remote(url),
        }
    }

    /// Local path a remote dataset is cached under.
    ///
    /// The file name is the last URL segment with any `.gz` suffix removed,
    /// since compressed downloads are stored decompressed.
    pub fn cached_path(&self, url: &str) -> PathBuf {
        let name = url
            .split(['?', '#'])
            .next()
            .and_then(|u| u.rsplit('/').next())
            .filter(|n| !n.is_empty())
            .unwrap_or("dataset.csv");
        let name = name.strip_suffix(".gz").unwrap_or(name);
        self.cache_dir.join(name)
    }

    fn ensure_remote(&self, url: &str) -> Result<PathBuf> {
        let local_path = self.cached_path(url);
        if local_path.is_file() {
            return Ok(local_path);
        }

        let _guard = self
            .download_lock
            .lock()
            .map_err(|_| CryptoStatsError::Task("download lock poisoned".into()))?;

        // Another caller may have finished the download while we waited
        if local_path.is_file() {
            return Ok(local_path);
        }

        if self.offline {
            return Err(CryptoStatsError::DataUnavailable(format!(
                "{} is not cached and offline mode is enabled",
                url
            )));
        }

        self.download(url, &local_path).map_err(|e| match e {
            CryptoStatsError::DataUnavailable(_) => e,
            other => CryptoStatsError::DataUnavailable(format!(
                "failed to download {}: {}",
                url, other
            )),
        })?;
        Ok(local_path)
    }

    /// Download a dataset into `dest`.
    ///
    /// Writes to a temp file in the cache directory and persists it on
    /// success, so an interrupted download never leaves a partial file behind.
    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        tracing::info!(url, dest = %dest.display(), "downloading dataset");
        fs::create_dir_all(&self.cache_dir)?;

        let resp = self.client()?.get(url).send()?.error_for_status()?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.cache_dir)?;

        if url.split(['?', '#']).next().unwrap_or(url).ends_with(".gz") {
            let mut decoder = GzDecoder::new(BufReader::new(resp));
            io::copy(&mut decoder, tmp.as_file_mut())?;
        } else {
            let bytes = resp.bytes()?;
            io::copy(&mut bytes.as_ref(), tmp.as_file_mut())?;
        }

        tmp.persist(dest).map_err(|e| CryptoStatsError::Io(e.error))?;
        Ok(())
    }

    /// Remove all cached downloads.
    pub fn clear(&self) -> Result<()> {
        if self.cache_dir.exists() {
            tracing::warn!(dir = %self.cache_dir.display(), "clearing dataset cache");
            fs::remove_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }
}
