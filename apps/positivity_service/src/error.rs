use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::tone::request_validator::ValidationError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid form data: {0}")]
    InvalidForm(String),

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Upstream model request failed: {0}")]
    Upstream(anyhow::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} not found in environment variables")]
    Missing(&'static str),

    #[error("Invalid configuration for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::InvalidForm(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, self.to_string()),
            AppError::Upstream(e) => {
                tracing::error!("Upstream model request failed: {:#}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Language model service is unavailable".to_string(),
                )
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
