//! Error types for the content loader.

use thiserror::Error;

/// Errors that can occur while loading remote content.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// HTTP client configuration error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Remote server answered with a non-success status.
    #[error("Remote server returned status {status} for {url}")]
    HttpStatus {
        /// Status code returned by the server.
        status: u16,
        /// URL that was requested.
        url: String,
    },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Player metadata embedded in the watch page could not be decoded.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Content type not supported.
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// Content exceeds the configured download limit.
    #[error("Content too large: {0} bytes")]
    TooLarge(u64),

    /// The URL does not point to a video we know how to read.
    #[error("Not a recognised video URL: {0}")]
    NotAVideo(String),

    /// No caption track matches the preferred languages.
    #[error("No transcript available for video {video_id} in languages [{languages}]")]
    NoTranscript {
        /// Video identifier.
        video_id: String,
        /// Preferred languages that were tried.
        languages: String,
    },

    /// The fetch succeeded but produced no text.
    #[error("Could not fetch content from URL")]
    EmptyContent,
}

/// Convenience result alias for loader operations.
pub type LoaderResult<T> = Result<T, LoaderError>;
