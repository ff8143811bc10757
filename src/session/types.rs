//! Session records and conversation turns.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::loader::ContentKind;
use crate::session::ids::SessionId;
use crate::summarizer::Summary;

/// One question/answer exchange.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Question asked by the client.
    pub question: String,
    /// Answer produced by the model.
    pub answer: String,
    /// When the answer was produced.
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Build a turn stamped with the current time.
    #[must_use]
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Server-side record of a summarized piece of content.
///
/// Content, content type and summary are fixed at creation; only
/// `history` grows.
#[derive(Clone, Debug)]
pub struct Session {
    /// Identifier returned to the client.
    pub id: SessionId,
    /// Original text the summary was produced from.
    pub content: Arc<str>,
    /// How the source URL was classified.
    pub content_type: ContentKind,
    /// Summary produced at creation.
    pub summary: Summary,
    /// Conversation log, oldest first.
    pub history: Vec<Turn>,
}

impl Session {
    /// Build a session with an empty conversation log.
    #[must_use]
    pub fn new(
        id: SessionId,
        content: impl Into<Arc<str>>,
        content_type: ContentKind,
        summary: Summary,
    ) -> Self {
        Self {
            id,
            content: content.into(),
            content_type,
            summary,
            history: Vec::new(),
        }
    }

    /// The last `n` turns, oldest first.
    #[must_use]
    pub fn recent_turns(&self, n: usize) -> &[Turn] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }
}
