//! Style-configurable summarization of loaded content.

pub mod parse;
pub mod style;

pub use parse::{Summary, parse_summary};
pub use style::{STYLE_TEMPLATES, StyleTemplate, SummaryStyle};

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::llm::{ChatModel, ChatRequest, LlmError};
use crate::loader::ContentKind;

/// Summarization error type.
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// The model call failed.
    #[error(transparent)]
    Llm(#[from] LlmError),
    /// The reply was not the requested JSON object.
    #[error("{0}")]
    Parse(String),
}

/// Convenience result alias for summarization.
pub type SummarizeResult<T> = Result<T, SummarizeError>;

/// Renders style templates and asks the model for a structured summary.
pub struct Summarizer {
    model: Arc<dyn ChatModel>,
    temperature: f64,
    max_content_chars: usize,
}

impl Summarizer {
    /// Create a new summarizer.
    #[must_use]
    pub fn new(model: Arc<dyn ChatModel>, temperature: f64, max_content_chars: usize) -> Self {
        Self {
            model,
            temperature,
            max_content_chars,
        }
    }

    /// Summarize `text` in the given style.
    ///
    /// # Errors
    /// Returns an error if the model call fails or its reply cannot be parsed.
    pub async fn summarize(
        &self,
        text: &str,
        kind: ContentKind,
        style: SummaryStyle,
    ) -> SummarizeResult<Summary> {
        let request = build_request(text, kind, style, self.temperature, self.max_content_chars);

        debug!(%style, content_type = %kind, "Summarizing content");
        let raw = self.model.complete(request).await?;
        let summary = parse_summary(&raw)?;

        let template = style.template();
        if !template.accepts_insight_count(summary.key_insights.len()) {
            warn!(
                %style,
                insights = summary.key_insights.len(),
                min = template.min_insights,
                max = template.max_insights,
                "Model returned an unexpected number of insights"
            );
        }

        Ok(summary)
    }
}

/// Render the completion request for one summary.
#[must_use]
pub fn build_request(
    text: &str,
    kind: ContentKind,
    style: SummaryStyle,
    temperature: f64,
    max_content_chars: usize,
) -> ChatRequest {
    let template = style.template();
    let noun = kind.prompt_noun();
    let content = truncate_to_chars(text, max_content_chars);

    let preamble = format!("You are an expert {noun} summarizer.");
    let prompt = format!(
        "Read the following {noun} and provide:\n\
         1. In the \"summary\" field: {shape}.\n\
         2. In the \"key_insights\" field: a list of {min}-{max} key insights or takeaways.\n\
         \n\
         {instructions}\n\
         \n\
         Format the output as a JSON object with keys \"summary\" (string) and \"key_insights\" (list of strings).\n\
         Ensure the JSON is valid and does not contain any other text.\n\
         \n\
         Content:\n\
         {content}",
        shape = template.summary_shape,
        min = template.min_insights,
        max = template.max_insights,
        instructions = template.instructions,
    );

    ChatRequest::new(preamble, prompt, temperature)
}

/// Truncate a string to a maximum number of characters.
pub(crate) fn truncate_to_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}
