use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Json;
use crypto_history::models::{RangeQueryResult, SnapshotResult};
use crypto_history::queries::{RangeParams, SnapshotParams};

use super::body;
use crate::error::AppError;
use crate::state::AppState;

/// POST /api/crypto/data  `{"coin_name": "BTC", "start_date": "2021-01-01", "end_date": "2021-12-31"}`
///
/// One coin's rows within an inclusive date window, with the price change
/// over the window and a volume / market-cap ratio per row.
pub async fn crypto_data(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RangeParams>, JsonRejection>,
) -> Result<Json<RangeQueryResult>, AppError> {
    let params = body(payload)?;
    // Reject incomplete payloads before paying for a dataset load
    params.resolve()?;

    let result = state.stats.run(move |s| s.range_query(&params)).await?;
    Ok(Json(result))
}

/// POST /api/crypto/date  `{"date": "2021-06-01"}`
///
/// Market cap of every coin on the given date, smallest first.
pub async fn crypto_by_date(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SnapshotParams>, JsonRejection>,
) -> Result<Json<SnapshotResult>, AppError> {
    let params = body(payload)?;
    params.resolve()?;

    let result = state.stats.run(move |s| s.snapshot(&params)).await?;
    Ok(Json(result))
}
