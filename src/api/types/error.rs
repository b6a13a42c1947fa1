//! Error responses in the `{error, service}` shape

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Error body returned by every forum service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
    pub service: String,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, service: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: message.into(),
                service: service.into(),
            },
        }
    }

    pub fn bad_request(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, service, message)
    }

    pub fn not_found(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, service, message)
    }

    pub fn internal(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, service, message)
    }

    /// Maps a domain error raised while serving `service`
    pub fn from_domain(err: DomainError, service: impl Into<String>) -> Self {
        match err {
            DomainError::NotFound { message } => Self::not_found(service, message),
            DomainError::Validation { message } => Self::bad_request(service, message),
            DomainError::Configuration { message }
            | DomainError::Storage { message }
            | DomainError::Internal { message } => {
                tracing::error!(error = %message, "Request failed");
                Self::internal(service, message)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}): {}",
            self.status, self.response.service, self.response.error
        )
    }
}

impl std::error::Error for ApiError {}
