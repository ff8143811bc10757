//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::llm::{ChatModel, GroqChat};
use crate::loader::{ContentLoader, LoaderResult};
use crate::qa::QaEngine;
use crate::session::{InMemorySessionStore, SessionStore};
use crate::summarizer::Summarizer;

/// Shared application state.
pub struct AppState {
    /// URL classification and content fetching.
    pub loader: ContentLoader,
    /// Structured summary generation.
    pub summarizer: Summarizer,
    /// Follow-up question answering.
    pub qa: QaEngine,
    /// Session storage.
    pub store: Arc<dyn SessionStore>,
    /// Completion model, used for credential checks and reporting.
    pub model: Arc<dyn ChatModel>,
}

impl AppState {
    /// Create the production state from configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &AppConfig) -> LoaderResult<Arc<Self>> {
        let loader = ContentLoader::new(&config.loader)?;
        let model: Arc<dyn ChatModel> = Arc::new(GroqChat::new(config.model.clone()));
        let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new(&config.session));

        if model.check_credentials().is_err() {
            tracing::warn!(
                env = %config.model.api_key_env,
                "Model credential not set; summarize and ask requests will fail until it is"
            );
        }

        Ok(Self::from_parts(config, loader, model, store))
    }

    /// Assemble state from explicit components.
    #[must_use]
    pub fn from_parts(
        config: &AppConfig,
        loader: ContentLoader,
        model: Arc<dyn ChatModel>,
        store: Arc<dyn SessionStore>,
    ) -> Arc<Self> {
        let summarizer = Summarizer::new(
            Arc::clone(&model),
            config.model.summary_temperature,
            config.qa.max_content_chars,
        );
        let qa = QaEngine::new(
            Arc::clone(&model),
            Arc::clone(&store),
            config.model.answer_temperature,
            config.qa.clone(),
        );

        Arc::new(Self {
            loader,
            summarizer,
            qa,
            store,
            model,
        })
    }
}
