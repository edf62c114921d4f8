use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use crypto_history::models::SummaryStats;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/crypto
///
/// Liveness check.
pub async fn hello() -> Json<Value> {
    Json(json!({ "message": "Hello, World!" }))
}

/// GET /api/crypto/summary
///
/// Distinct coin count and the row-wise average price.
pub async fn summary(State(state): State<Arc<AppState>>) -> Result<Json<SummaryStats>, AppError> {
    let summary = state.stats.run(|s| s.summary()).await?;
    Ok(Json(summary))
}

/// GET /api/crypto/names
///
/// Sorted list of every coin id in the dataset.
pub async fn names(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>, AppError> {
    let names = state.stats.run(|s| s.coin_names()).await?;
    Ok(Json(names))
}
