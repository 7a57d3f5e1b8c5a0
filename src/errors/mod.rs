//! Error handling module for the directory gateway and its client.
//!
//! Provides one failure taxonomy for both sides of the wire: the gateway maps
//! `AppError` onto HTTP status codes with an `{"error": "..."}` body, and the
//! client decodes that body back into `ClientError::Rejected` while folding
//! transport faults into `ClientError::Network`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Gateway-side error type.
#[derive(Debug)]
pub enum AppError {
    /// A required field is missing or a provided value is outside the fixed
    /// vocabulary. The collection is left untouched.
    Validation(String),
    /// No record carries the addressed member id
    NotFound(String),
    /// The backing store failed (file I/O or hosted backend fault)
    Storage(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        match self {
            AppError::Validation(msg) => msg,
            AppError::NotFound(msg) => msg,
            AppError::Storage(msg) => msg,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("Hosted backend error: {:?}", err);
        AppError::Storage(format!("Hosted backend error: {}", err))
    }
}

/// Wire shape of every gateway failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let body = ErrorBody {
            error: self.message().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Client-side error type raised by gateway calls.
#[derive(Debug)]
pub enum ClientError {
    /// The gateway answered with an error status; `message` is the decoded
    /// wire body.
    Rejected { status: u16, message: String },
    /// The gateway could not be reached, or its response was undecodable
    Network(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Rejected { status, message } => {
                write!(f, "gateway rejected request ({}): {}", status, message)
            }
            ClientError::Network(msg) => write!(f, "network error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}
