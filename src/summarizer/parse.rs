//! Parsing of the model's JSON reply.
//!
//! The JSON shape is only requested in the prompt, so the reply may come
//! wrapped in a Markdown fence or surrounded by prose.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::summarizer::SummarizeError;

/// Matches a fenced block, optionally tagged `json`.
static FENCED_BLOCK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)\s*```").ok());

/// Structured summary returned by the model.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Summary text.
    pub summary: String,
    /// Ordered key insights.
    pub key_insights: Vec<String>,
}

/// Parse a raw model reply into a [`Summary`].
///
/// # Errors
/// Returns [`SummarizeError::Parse`] if no JSON object of the expected shape
/// can be found.
pub fn parse_summary(raw: &str) -> Result<Summary, SummarizeError> {
    let mut last_error = None;

    for candidate in candidates(raw) {
        match serde_json::from_str::<Summary>(candidate) {
            Ok(summary) => return Ok(normalize(summary)),
            Err(err) => last_error = Some(err),
        }
    }

    Err(SummarizeError::Parse(last_error.map_or_else(
        || "model reply did not contain a JSON object".to_string(),
        |err| format!("invalid JSON output from model: {err}"),
    )))
}

/// Slices of `raw` worth trying, most specific first.
fn candidates(raw: &str) -> Vec<&str> {
    let trimmed = raw.trim();
    let mut out = vec![trimmed];

    if let Some(inner) = FENCED_BLOCK
        .as_ref()
        .and_then(|re| re.captures(trimmed))
        .and_then(|caps| caps.get(1))
    {
        out.push(inner.as_str());
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            out.push(&trimmed[start..=end]);
        }
    }

    out
}

fn normalize(summary: Summary) -> Summary {
    Summary {
        summary: summary.summary.trim().to_string(),
        key_insights: summary
            .key_insights
            .into_iter()
            .map(|insight| insight.trim().to_string())
            .filter(|insight| !insight.is_empty())
            .collect(),
    }
}
