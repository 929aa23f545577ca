//! Generation-service configuration.
//!
//! Built once at startup and passed by reference to the client. A missing
//! credential fails construction instead of the first request.

use std::time::Duration;

use thiserror::Error;

pub const ENV_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_API_KEY_FALLBACK: &str = "GOOGLE_API_KEY";
pub const ENV_MODEL: &str = "MEDSAFE_MODEL";
pub const ENV_BASE_URL: &str = "MEDSAFE_API_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "MEDSAFE_TIMEOUT_SECS";
pub const ENV_TEMPERATURE: &str = "MEDSAFE_TEMPERATURE";

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Request timeout when `MEDSAFE_TIMEOUT_SECS` is unset. `0` disables the timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration errors. Always fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("missing generation service credential: set GEMINI_API_KEY or GOOGLE_API_KEY")]
    MissingApiKey,

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings for the generation service client.
#[derive(Clone, PartialEq)]
pub struct GenerationConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    /// `None` means no timeout.
    pub timeout: Option<Duration>,
    pub temperature: Option<f32>,
}

impl std::fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl GenerationConfig {
    /// Config with defaults for everything but the credential.
    pub fn new(api_key: impl Into<String>) -> ConfigResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            temperature: None,
        })
    }

    /// Read `.env` (if present) and then the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        // A missing .env file is normal outside development.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty(ENV_API_KEY)
            .or_else(|| non_empty(ENV_API_KEY_FALLBACK))
            .ok_or(ConfigError::MissingApiKey)?;

        let mut config = Self::new(api_key)?;

        if let Some(model) = non_empty(ENV_MODEL) {
            config.model = model.trim().to_string();
        }
        if let Some(base_url) = non_empty(ENV_BASE_URL) {
            config.base_url = base_url.trim().trim_end_matches('/').to_string();
        }
        if let Some(raw) = non_empty(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_TIMEOUT_SECS,
                value: raw.clone(),
            })?;
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(raw) = non_empty(ENV_TEMPERATURE) {
            let temperature: f32 = raw
                .trim()
                .parse()
                .ok()
                .filter(|t: &f32| t.is_finite() && *t >= 0.0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: ENV_TEMPERATURE,
                    value: raw.clone(),
                })?;
            config.temperature = Some(temperature);
        }

        Ok(config)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full `generateContent` endpoint for the configured model.
    pub fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}
