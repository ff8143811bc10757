//! Mapping of service errors onto HTTP responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::llm::LlmError;
use crate::loader::LoaderError;
use crate::qa::QaError;
use crate::session::SessionError;
use crate::summarizer::SummarizeError;

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable failure description.
    pub detail: String,
}

/// Request handler error type.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request body is not the expected JSON document.
    #[error("{}", .0.body_text())]
    InvalidBody(#[from] JsonRejection),
    /// The URL could not be fetched or yielded no text.
    #[error("{0}")]
    Fetch(#[from] LoaderError),
    /// Session lookup failed.
    #[error("{0}")]
    Session(#[from] SessionError),
    /// The model call failed or the credential is missing.
    #[error("{0}")]
    Llm(#[from] LlmError),
    /// The model reply could not be turned into a summary.
    #[error("{0}")]
    Summarize(String),
}

impl From<SummarizeError> for ApiError {
    fn from(err: SummarizeError) -> Self {
        match err {
            SummarizeError::Llm(e) => Self::Llm(e),
            SummarizeError::Parse(msg) => Self::Summarize(msg),
        }
    }
}

impl From<QaError> for ApiError {
    fn from(err: QaError) -> Self {
        match err {
            QaError::Session(e) => Self::Session(e),
            QaError::Llm(e) => Self::Llm(e),
        }
    }
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidBody(rejection) => rejection.status(),
            Self::Fetch(_) => StatusCode::BAD_REQUEST,
            Self::Session(SessionError::NotFound) => StatusCode::NOT_FOUND,
            Self::Llm(_) | Self::Summarize(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = ErrorBody {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
