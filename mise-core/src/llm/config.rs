//! Generation client configuration from environment variables.

use std::time::Duration;
use thiserror::Error;

/// Default Gemini REST base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used for every recipe.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

/// Default bound on a single generation call, in seconds.
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 60;

/// Default TCP connect timeout, in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
}

/// Gemini client configuration.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key for the Generative Language API.
    pub api_key: String,
    /// Model identifier (e.g., "gemini-1.5-flash-latest").
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Upper bound on one generation call.
    pub generation_timeout: Duration,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("generation_timeout", &self.generation_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl GeminiConfig {
    /// Configuration with defaults for everything except the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            generation_timeout: Duration::from_secs(DEFAULT_GENERATION_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `GOOGLE_API_KEY`: API key for Gemini
    ///
    /// Optional:
    /// - `MISE_GEMINI_MODEL`: Model name (default: "gemini-1.5-flash-latest")
    /// - `MISE_GEMINI_BASE_URL`: API base URL
    /// - `MISE_GENERATION_TIMEOUT_SECS`: Bound on one generation call (default: 60)
    /// - `MISE_CONNECT_TIMEOUT_SECS`: Connect timeout (default: 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`GeminiConfig::from_env`], reading variables through `lookup`.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("GOOGLE_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("GOOGLE_API_KEY".to_string()))?;

        let model = lookup("MISE_GEMINI_MODEL")
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url = lookup("MISE_GEMINI_BASE_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let generation_timeout_secs = lookup("MISE_GENERATION_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_GENERATION_TIMEOUT_SECS);

        let connect_timeout_secs = lookup("MISE_CONNECT_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);

        Ok(Self {
            api_key,
            model,
            base_url,
            generation_timeout: Duration::from_secs(generation_timeout_secs),
            connect_timeout: Duration::from_secs(connect_timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_key_fails() {
        let err = GeminiConfig::from_vars(vars(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingEnvVar("GOOGLE_API_KEY".to_string()));
    }

    #[test]
    fn test_blank_key_fails() {
        let result = GeminiConfig::from_vars(vars(&[("GOOGLE_API_KEY", "   ")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults() {
        let config = GeminiConfig::from_vars(vars(&[("GOOGLE_API_KEY", "secret")])).unwrap();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.generation_timeout, Duration::from_secs(60));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_zero_timeouts_fall_back_to_defaults() {
        let config = GeminiConfig::from_vars(vars(&[
            ("GOOGLE_API_KEY", "secret"),
            ("MISE_GENERATION_TIMEOUT_SECS", "0"),
            ("MISE_CONNECT_TIMEOUT_SECS", "0"),
        ]))
        .unwrap();

        assert_eq!(
            config.generation_timeout,
            Duration::from_secs(DEFAULT_GENERATION_TIMEOUT_SECS)
        );
        assert_eq!(
            config.connect_timeout,
            Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_overrides() {
        let config = GeminiConfig::from_vars(vars(&[
            ("GOOGLE_API_KEY", "secret"),
            ("MISE_GEMINI_MODEL", "gemini-2.0-flash"),
            ("MISE_GEMINI_BASE_URL", "http://127.0.0.1:9999/v1beta/"),
            ("MISE_GENERATION_TIMEOUT_SECS", "5"),
            ("MISE_CONNECT_TIMEOUT_SECS", "not-a-number"),
        ]))
        .unwrap();

        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.base_url, "http://127.0.0.1:9999/v1beta");
        assert_eq!(config.generation_timeout, Duration::from_secs(5));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = GeminiConfig::new("super-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
    }
}
