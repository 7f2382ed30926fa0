//! API error type and `{"detail": ...}` response formatting.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use quill_core::QuillError;
use serde::Serialize;

/// Every failure a handler can return with `?`
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Dispatch(#[from] QuillError),

    /// Body was not JSON or did not match the request model
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] JsonRejection),
}

/// JSON error body read by the front-end
#[derive(Debug, Clone, Serialize)]
struct ErrorResponse {
    detail: String,
}

impl ApiError {
    /// Upstream statuses outside the valid HTTP range become 502
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Dispatch(err) => {
                StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::InvalidBody(rejection) => rejection.status(),
        }
    }

    pub fn detail(&self) -> String {
        match self {
            ApiError::Dispatch(err) => err.detail(),
            ApiError::InvalidBody(rejection) => rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Dispatch(QuillError::UpstreamError {
                status: upstream,
                message,
            }) => {
                tracing::warn!(target: "api", upstream_status = upstream, message = %message, "upstream error");
            }
            ApiError::Dispatch(QuillError::TransportError(e)) => {
                tracing::warn!(target: "api", error = %e, "upstream unreachable");
            }
            ApiError::Dispatch(other) => {
                tracing::error!(target: "api", error = %other, "request failed");
            }
            ApiError::InvalidBody(rejection) => {
                tracing::info!(target: "api", status = %status, error = %rejection, "rejected request body");
            }
        }

        let body = ErrorResponse {
            detail: self.detail(),
        };
        (status, Json(body)).into_response()
    }
}
