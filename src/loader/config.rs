//! Configuration for the content loader.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Configuration for fetching articles and transcripts.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Request timeout.
    #[serde(with = "duration_serde")]
    pub request_timeout: Duration,
    /// Connection timeout.
    #[serde(with = "duration_serde")]
    pub connect_timeout: Duration,
    /// User agents to rotate.
    pub user_agents: Vec<String>,
    /// Maximum content length to download (bytes).
    pub max_content_length: usize,
    /// Transcript languages, most preferred first.
    pub transcript_languages: Vec<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agents: default_user_agents(),
            max_content_length: 10 * 1024 * 1024, // 10 MB
            transcript_languages: vec!["en".to_string()],
        }
    }
}

impl LoaderConfig {
    /// Replace the preferred transcript languages, dropping blank entries.
    #[must_use]
    pub fn with_transcript_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.transcript_languages = languages
            .into_iter()
            .map(|lang| lang.as_ref().trim().to_string())
            .filter(|lang| !lang.is_empty())
            .collect();
        self
    }

    /// Get a random user agent from the rotation list.
    #[must_use]
    pub fn random_user_agent(&self) -> String {
        if self.user_agents.is_empty() {
            return DEFAULT_USER_AGENTS[0].to_string();
        }
        let mut rng = rand::thread_rng();
        let idx = rng.gen_range(0..self.user_agents.len());
        self.user_agents[idx].clone()
    }

    /// `Accept-Language` header value built from the transcript languages.
    #[must_use]
    pub fn accept_language(&self) -> String {
        if self.transcript_languages.is_empty() {
            return "en-US,en;q=0.5".to_string();
        }
        self.transcript_languages
            .iter()
            .enumerate()
            .map(|(idx, lang)| {
                if idx == 0 {
                    lang.clone()
                } else {
                    format!("{lang};q=0.{}", 9usize.saturating_sub(idx).max(1))
                }
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

const DEFAULT_USER_AGENTS: [&str; 5] = [
    // Chrome on Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    // Chrome on macOS
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    // Firefox on Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    // Safari on macOS
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
    // Firefox on Linux
    "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0",
];

fn default_user_agents() -> Vec<String> {
    DEFAULT_USER_AGENTS.iter().map(ToString::to_string).collect()
}

/// Serde module for Duration serialization.
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
