//! Service configuration read from the environment.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use petit_adam_core::QuizTiming;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Gemini credentials; generation is disabled without them.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub sentences_path: PathBuf,
    pub timing: QuizTiming,
    pub session_ttl: chrono::Duration,
    pub gemini: Option<GeminiConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            sentences_path: PathBuf::from("data/sentences.json"),
            timing: QuizTiming::default(),
            session_ttl: chrono::Duration::hours(1),
            gemini: None,
        }
    }
}

impl Config {
    /// Read configuration from environment variables.
    ///
    /// Recognized vars:
    /// - HOST, PORT: listen address (default 0.0.0.0:3000)
    /// - SENTENCES_PATH: JSON sentence bank (default data/sentences.json)
    /// - LOADING_DELAY_MS, FEEDBACK_DELAY_MS: quiz pacing
    /// - SESSION_TTL_SECS: idle time before a session is dropped
    /// - GEMINI_API_KEY: enables sentence generation
    /// - GEMINI_MODEL, GENERATOR_TIMEOUT_SECS: generator tuning
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = std::env::var("HOST").unwrap_or(defaults.host);
        let port = parse_var("PORT")?.unwrap_or(defaults.port);
        let sentences_path = std::env::var("SENTENCES_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.sentences_path);

        let timing = QuizTiming {
            loading_delay: parse_var("LOADING_DELAY_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.timing.loading_delay),
            feedback_delay: parse_var("FEEDBACK_DELAY_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.timing.feedback_delay),
        };

        let session_ttl = parse_var("SESSION_TTL_SECS")?
            .map(chrono::Duration::seconds)
            .unwrap_or(defaults.session_ttl);

        let gemini = match std::env::var("GEMINI_API_KEY") {
            Ok(api_key) if !api_key.trim().is_empty() => Some(GeminiConfig {
                api_key,
                model: std::env::var("GEMINI_MODEL")
                    .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
                timeout: Duration::from_secs(
                    parse_var("GENERATOR_TIMEOUT_SECS")?.unwrap_or(30),
                ),
            }),
            _ => None,
        };

        Ok(Self {
            host,
            port,
            sentences_path,
            timing,
            session_ttl,
            gemini,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(None),
    }
}
