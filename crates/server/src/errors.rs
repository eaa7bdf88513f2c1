use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::counter::ServerFault;
use thiserror::Error;

/// Error body for failed requests. Carries no internal detail.
#[derive(Debug)]
pub struct ApiError(pub StatusCode);

impl From<ServerFault> for ApiError {
    fn from(_: ServerFault) -> Self {
        ApiError(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.0;
        let msg = status.canonical_reason().unwrap_or("error").to_lowercase();
        (status, Json(serde_json::json!({"error": msg}))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
}
