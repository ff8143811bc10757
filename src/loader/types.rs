//! Core types for loaded content.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of remote content behind a URL.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Generic web page.
    Article,
    /// YouTube video, read through its transcript.
    Youtube,
}

impl ContentKind {
    /// Stable wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Youtube => "youtube",
        }
    }

    /// Noun used when describing the content to the model.
    #[must_use]
    pub const fn prompt_noun(self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Youtube => "video transcript",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Plain text pulled from a URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedContent {
    /// Extracted text.
    pub text: String,
    /// How the URL was classified.
    pub kind: ContentKind,
}
