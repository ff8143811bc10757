//! Remote text-generation model access.
//!
//! Callers depend on the [`ChatModel`] trait; [`GroqChat`] is the hosted
//! implementation.

pub mod client;
pub mod error;

pub use client::GroqChat;
pub use error::{LlmError, LlmResult};

use std::future::Future;
use std::pin::Pin;

/// Boxed future type for model operations.
pub type ModelFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A single-shot completion request.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatRequest {
    /// System instruction.
    pub preamble: String,
    /// User prompt.
    pub prompt: String,
    /// Sampling temperature.
    pub temperature: f64,
}

impl ChatRequest {
    /// Build a request.
    #[must_use]
    pub fn new(preamble: impl Into<String>, prompt: impl Into<String>, temperature: f64) -> Self {
        Self {
            preamble: preamble.into(),
            prompt: prompt.into(),
            temperature,
        }
    }
}

/// Trait abstraction over completion models.
pub trait ChatModel: Send + Sync {
    /// Verify that the provider credential is available.
    ///
    /// # Errors
    /// Returns [`LlmError::MissingApiKey`] when it is not.
    fn check_credentials(&self) -> LlmResult<()>;

    /// Run a completion and return the raw text of the reply.
    ///
    /// # Errors
    /// Returns an error if the request fails or the reply is empty.
    fn complete(&self, request: ChatRequest) -> ModelFuture<'_, LlmResult<String>>;

    /// Name of the model at the provider.
    fn model_name(&self) -> &str;
}
