//! Service configuration.
//!
//! Defaults match the hosted deployment; every field can be overridden from
//! the environment through [`AppConfig::from_env`]. The model credential is
//! deliberately not part of the config: it is read from the environment on
//! each request.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::loader::LoaderConfig;

/// Environment variable holding the model provider credential.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value is out of range or malformed.
    #[error("invalid configuration: {0}")]
    Invalid(String),
    /// URL parse error.
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
}

/// Convenience result alias for configuration handling.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level configuration for the service.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Remote model settings.
    pub model: ModelConfig,
    /// Content fetching settings.
    pub loader: LoaderConfig,
    /// Session retention settings.
    pub session: SessionConfig,
    /// Follow-up question settings.
    pub qa: QaConfig,
}

impl AppConfig {
    /// Build the default configuration and apply environment overrides.
    ///
    /// # Errors
    /// Returns an error if an override cannot be parsed or the result is invalid.
    pub fn from_env() -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(port) = env_parse::<u16>("SUMMARIZER_PORT")? {
            config.server.port = port;
        }
        if let Some(model) = env_string("SUMMARIZER_MODEL") {
            config.model.model = model;
        }
        if let Some(base_url) = env_string("SUMMARIZER_LLM_BASE_URL") {
            config.model.base_url = Some(base_url);
        }
        if let Some(ttl) = env_parse::<u64>("SUMMARIZER_SESSION_TTL_SECS")? {
            config.session.ttl_seconds = ttl;
        }
        if let Some(max) = env_parse::<usize>("SUMMARIZER_MAX_SESSIONS")? {
            config.session.max_sessions = max;
        }
        if let Some(turns) = env_parse::<usize>("SUMMARIZER_HISTORY_TURNS")? {
            config.qa.max_history_turns = turns;
        }
        if let Some(langs) = env_string("SUMMARIZER_TRANSCRIPT_LANGS") {
            config.loader = config.loader.with_transcript_languages(langs.split(','));
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.model.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model.model must not be empty".to_string()));
        }

        if let Some(base_url) = &self.model.base_url {
            Url::parse(base_url)?;
        }

        if self.session.max_sessions == 0 {
            return Err(ConfigError::Invalid(
                "session.max_sessions must be > 0".to_string(),
            ));
        }

        if self.session.cleanup_interval_seconds == 0 {
            return Err(ConfigError::Invalid(
                "session.cleanup_interval_seconds must be > 0".to_string(),
            ));
        }

        if self.qa.max_history_turns == 0 {
            return Err(ConfigError::Invalid(
                "qa.max_history_turns must be > 0".to_string(),
            ));
        }

        if self.qa.max_content_chars == 0 {
            return Err(ConfigError::Invalid(
                "qa.max_content_chars must be > 0".to_string(),
            ));
        }

        if self.loader.transcript_languages.is_empty() {
            return Err(ConfigError::Invalid(
                "loader.transcript_languages must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port bound on all interfaces.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8000 }
    }
}

/// Remote model settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model name at the provider.
    pub model: String,
    /// Environment variable read for the credential.
    pub api_key_env: String,
    /// Optional custom base URL.
    pub base_url: Option<String>,
    /// Temperature used for summaries.
    pub summary_temperature: f64,
    /// Temperature used for follow-up answers.
    pub answer_temperature: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: "llama-3.3-70b-versatile".to_string(),
            api_key_env: API_KEY_ENV.to_string(),
            base_url: None,
            summary_temperature: 0.0,
            answer_temperature: 0.5,
        }
    }
}

/// Session retention settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Idle lifetime of a session in seconds; `0` keeps sessions forever.
    pub ttl_seconds: u64,
    /// Maximum number of live sessions.
    pub max_sessions: usize,
    /// Interval between expiry sweeps in seconds.
    pub cleanup_interval_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 86_400, // 24 hours
            max_sessions: 1000,
            cleanup_interval_seconds: 600,
        }
    }
}

/// Follow-up question settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QaConfig {
    /// Number of most recent turns rendered into the prompt.
    pub max_history_turns: usize,
    /// Content is cut to this many characters before prompting.
    pub max_content_chars: usize,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            max_history_turns: 10,
            max_content_chars: 60_000,
        }
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_parse<T>(name: &str) -> ConfigResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_string(name)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| ConfigError::Invalid(format!("{name}={raw}: {e}")))
        })
        .transpose()
}
