//! Error types for the signing server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::placement::PlacementError;
use crate::processor::ProcessError;
use crate::signature::SignatureError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error(transparent)]
    Process(#[from] ProcessError),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            AppError::Signature(e) => {
                tracing::warn!("Signature generation failed: {}", e);
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            AppError::Process(ProcessError::Task(reason)) => {
                tracing::error!("Signing task failed: {}", reason);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error while processing PDF".to_string(),
                )
            }
            AppError::Process(e) => {
                tracing::warn!("PDF processing failed: {}", e);
                (StatusCode::BAD_REQUEST, format!("Error processing PDF: {}", e))
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<PlacementError> for AppError {
    fn from(err: PlacementError) -> Self {
        AppError::Process(ProcessError::Placement(err))
    }
}
