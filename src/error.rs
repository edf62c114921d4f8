#[derive(Debug, thiserror::Error)]
pub enum CryptoStatsError {
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required request parameter was absent or blank.
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A filter matched no rows.
    #[error("{0}")]
    NoDataFound(String),

    /// The backing dataset could not be located, downloaded or read.
    #[error("Dataset unavailable: {0}")]
    DataUnavailable(String),

    /// A statistic is undefined for the selected rows.
    #[error("Invalid computation: {0}")]
    InvalidComputation(String),

    #[error("Background task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, CryptoStatsError>;
