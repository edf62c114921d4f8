use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use crypto_history::CryptoStatsError;
use serde_json::json;

/// Unified error type that renders as a JSON `{"message": "..."}` response
/// with an appropriate HTTP status code.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}

impl From<CryptoStatsError> for AppError {
    fn from(e: CryptoStatsError) -> Self {
        match e {
            CryptoStatsError::MissingField(_) | CryptoStatsError::InvalidArgument(_) => {
                AppError::bad_request(e.to_string())
            }
            CryptoStatsError::NoDataFound(msg) => AppError::not_found(msg),
            CryptoStatsError::InvalidComputation(_) => AppError::unprocessable(e.to_string()),
            CryptoStatsError::DataUnavailable(_) => {
                tracing::error!(error = %e, "dataset unavailable");
                AppError::internal(e.to_string())
            }
            other => {
                tracing::error!(error = ?other, "query failed");
                AppError::internal("An internal error occurred")
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(format!("Malformed request body: {}", rejection.body_text()))
    }
}
