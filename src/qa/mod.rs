//! Follow-up question answering scoped to a summarized session.

pub mod prompt;

pub use prompt::{QA_PREAMBLE, build_prompt};

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::QaConfig;
use crate::llm::{ChatModel, ChatRequest, LlmError};
use crate::session::{SessionError, SessionId, SessionStore, Turn};

/// Question answering error type.
#[derive(Debug, Error)]
pub enum QaError {
    /// Session lookup or update failed.
    #[error(transparent)]
    Session(#[from] SessionError),
    /// The model call failed.
    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Convenience result alias for question answering.
pub type QaResult<T> = Result<T, QaError>;

/// Answer plus the session's full conversation log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Answer {
    /// Model answer.
    pub answer: String,
    /// Every turn of the session, including this one.
    pub history: Vec<Turn>,
}

/// Answers questions about previously summarized content.
pub struct QaEngine {
    model: Arc<dyn ChatModel>,
    store: Arc<dyn SessionStore>,
    temperature: f64,
    config: QaConfig,
}

impl QaEngine {
    /// Create a new engine.
    #[must_use]
    pub fn new(
        model: Arc<dyn ChatModel>,
        store: Arc<dyn SessionStore>,
        temperature: f64,
        config: QaConfig,
    ) -> Self {
        Self {
            model,
            store,
            temperature,
            config,
        }
    }

    /// Answer `question` in the context of session `id` and record the turn.
    ///
    /// The session is looked up before anything else, so an unknown
    /// identifier never reaches the model.
    ///
    /// # Errors
    /// Returns an error if the session is unknown, the credential is missing,
    /// or the model call fails.
    pub async fn answer(&self, id: SessionId, question: &str) -> QaResult<Answer> {
        let session = self.store.get(id).await?;
        self.model.check_credentials()?;

        let prompt = build_prompt(
            &session,
            question,
            self.config.max_history_turns,
            self.config.max_content_chars,
        );
        debug!(
            session_id = %id,
            prior_turns = session.history.len(),
            "Answering follow-up question"
        );

        let reply = self
            .model
            .complete(ChatRequest::new(QA_PREAMBLE, prompt, self.temperature))
            .await?;
        let answer = reply.trim().to_string();

        let history = self
            .store
            .append_turn(id, Turn::new(question, answer.clone()))
            .await?;
        info!(session_id = %id, turns = history.len(), "Recorded conversation turn");

        Ok(Answer { answer, history })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::llm::{LlmResult, ModelFuture};
    use crate::loader::ContentKind;
    use crate::session::InMemorySessionStore;
    use crate::summarizer::Summary;

    /// Answers with a numbered reply and keeps the prompts it saw.
    #[derive(Default)]
    struct EchoModel {
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
        missing_key: bool,
    }

    impl ChatModel for EchoModel {
        fn check_credentials(&self) -> LlmResult<()> {
            if self.missing_key {
                Err(LlmError::MissingApiKey("GROQ_API_KEY".to_string()))
            } else {
                Ok(())
            }
        }

        fn complete(&self, request: ChatRequest) -> ModelFuture<'_, LlmResult<String>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut prompts) = self.prompts.lock() {
                prompts.push(request.prompt);
            }
            Box::pin(async move { Ok(format!("  answer {n}\n")) })
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    async fn engine_with_session(model: Arc<EchoModel>) -> (QaEngine, Arc<dyn SessionStore>, SessionId) {
        let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::default());
        let id = store
            .create(
                "Original content".to_string(),
                ContentKind::Article,
                Summary {
                    summary: "Summary".to_string(),
                    key_insights: vec!["Insight".to_string()],
                },
            )
            .await
            .unwrap_or_default();
        let engine = QaEngine::new(model, Arc::clone(&store), 0.5, QaConfig::default());
        (engine, store, id)
    }

    #[tokio::test]
    async fn test_answers_accumulate_in_call_order() {
        let model = Arc::new(EchoModel::default());
        let (engine, store, id) = engine_with_session(Arc::clone(&model)).await;

        for i in 0..3 {
            let answer = engine.answer(id, &format!("question {i}")).await;
            assert!(answer.is_ok_and(|a| a.answer == format!("answer {i}") && a.history.len() == i + 1));
        }

        let session = store.get(id).await;
        let questions: Vec<String> = session
            .map(|s| s.history.into_iter().map(|t| t.question).collect())
            .unwrap_or_default();
        assert_eq!(questions, vec!["question 0", "question 1", "question 2"]);
    }

    #[tokio::test]
    async fn test_prior_turns_reach_the_prompt() {
        let model = Arc::new(EchoModel::default());
        let (engine, _store, id) = engine_with_session(Arc::clone(&model)).await;

        let _ = engine.answer(id, "first?").await;
        let _ = engine.answer(id, "second?").await;

        let prompts = model.prompts.lock().map(|p| p.clone()).unwrap_or_default();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("(none)"));
        assert!(prompts[1].contains("User: first?\nAssistant: answer 0"));
        assert!(prompts[1].contains("- Insight"));
        assert!(prompts[1].contains("Original content"));
    }

    #[tokio::test]
    async fn test_unknown_session_never_calls_model() {
        let model = Arc::new(EchoModel {
            missing_key: true,
            ..EchoModel::default()
        });
        let (engine, _store, _id) = engine_with_session(Arc::clone(&model)).await;

        let result = engine.answer(SessionId::new(), "hello?").await;
        assert!(matches!(result, Err(QaError::Session(SessionError::NotFound))));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_credential_leaves_log_untouched() {
        let model = Arc::new(EchoModel {
            missing_key: true,
            ..EchoModel::default()
        });
        let (engine, store, id) = engine_with_session(Arc::clone(&model)).await;

        let result = engine.answer(id, "hello?").await;
        assert!(matches!(result, Err(QaError::Llm(LlmError::MissingApiKey(_)))));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
        assert!(store.get(id).await.is_ok_and(|s| s.history.is_empty()));
    }
}
