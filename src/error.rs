//! Unified error handling
//!
//! `RecordError` is what the record service client reports; `ApiError` is
//! what the session API renders back to the view layer.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a single record service call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    /// The call could not complete: network, auth expiry, malformed response.
    #[error("Record service unavailable: {0}")]
    Transport(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Failed to create {0}")]
    CreateFailed(String),

    #[error("Failed to update {0}")]
    UpdateFailed(String),

    #[error("Failed to delete {0}")]
    DeleteFailed(String),
}

pub type RecordResult<T> = Result<T, RecordError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) | Self::Record(RecordError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Record(RecordError::Transport(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Record(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Record(RecordError::Transport(_)) => "TRANSPORT_FAILURE",
            Self::Record(RecordError::NotFound(_)) => "NOT_FOUND",
            Self::Record(RecordError::CreateFailed(_)) => "CREATE_FAILED",
            Self::Record(RecordError::UpdateFailed(_)) => "UPDATE_FAILED",
            Self::Record(RecordError::DeleteFailed(_)) => "DELETE_FAILED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::Unauthorized(msg) | Self::NotFound(msg) | Self::BadRequest(msg) => msg.clone(),
            Self::Record(e) => e.to_string(),
            // Don't leak internal error details
            Self::Internal(_) => "An internal error occurred".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Internal(e) => {
                tracing::error!(error = ?e, "Internal server error");
            }
            Self::Record(e) => {
                tracing::warn!(error = %e, "Record service error");
            }
            _ => {
                tracing::debug!(error = %self, "API error");
            }
        }

        let status = self.status_code();
        let body = ErrorResponse {
            code: self.error_code().to_string(),
            message: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}
