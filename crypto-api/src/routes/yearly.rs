use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Json;
use crypto_history::models::{
    AboveMeanResult, VolatilityExtremesResult, YearOverviewResult, YearlyRankingResult,
};
use crypto_history::queries::YearParams;

use super::body;
use crate::error::AppError;
use crate::state::AppState;

/// POST /api/crypto/top  `{"year": 2021}`
///
/// The four coins with the largest absolute price swing in the year.
pub async fn top_movers(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<YearParams>, JsonRejection>,
) -> Result<Json<YearlyRankingResult>, AppError> {
    let params = body(payload)?;
    params.resolve()?;

    let result = state.stats.run(move |s| s.top_movers(&params)).await?;
    Ok(Json(result))
}

/// POST /api/crypto/volatility  `{"year": 2021}`
pub async fn volatility(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<YearParams>, JsonRejection>,
) -> Result<Json<VolatilityExtremesResult>, AppError> {
    let params = body(payload)?;
    params.resolve()?;

    let result = state
        .stats
        .run(move |s| s.volatility_extremes(&params))
        .await?;
    Ok(Json(result))
}

/// POST /api/crypto/above-mean  `{"year": 2021}`
///
/// Coins whose mean price beats the mean of all per-coin means.
pub async fn above_mean(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<YearParams>, JsonRejection>,
) -> Result<Json<AboveMeanResult>, AppError> {
    let params = body(payload)?;
    params.resolve()?;

    let result = state.stats.run(move |s| s.above_global_mean(&params)).await?;
    Ok(Json(result))
}

/// POST /api/crypto/overview  `{"year": 2021}`
pub async fn overview(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<YearParams>, JsonRejection>,
) -> Result<Json<YearOverviewResult>, AppError> {
    let params = body(payload)?;
    params.resolve()?;

    let result = state.stats.run(move |s| s.year_overview(&params)).await?;
    Ok(Json(result))
}
