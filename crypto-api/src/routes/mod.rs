pub mod crypto;
pub mod meta;
pub mod yearly;

use axum::extract::rejection::JsonRejection;
use axum::response::Json;

use crate::error::AppError;

/// Unwrap a JSON body, turning malformed payloads into a 400.
pub(crate) fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload.map(|Json(p)| p).map_err(AppError::from)
}
