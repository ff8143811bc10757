//! Error types for remote model calls.

use thiserror::Error;

/// Errors produced while talking to the hosted model.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The provider credential is not set in the environment.
    #[error("{0} not found in environment variables")]
    MissingApiKey(String),
    /// HTTP client error from Rig.
    #[error("http client error: {0}")]
    HttpClient(#[from] rig::http_client::Error),
    /// Completion error.
    #[error("completion error: {0}")]
    Completion(#[from] rig::completion::CompletionError),
    /// The model answered without any text.
    #[error("model returned an empty response")]
    EmptyResponse,
}

/// Convenience result alias for model operations.
pub type LlmResult<T> = Result<T, LlmError>;
