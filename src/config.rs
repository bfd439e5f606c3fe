//! Service configuration loaded from the process environment.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Environment variable holding the Gemini API credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Environment variable overriding the Gemini model name.
pub const MODEL_ENV: &str = "REELGEN_MODEL";
/// Environment variable overriding the Gemini API base URL.
pub const GEMINI_URL_ENV: &str = "REELGEN_GEMINI_URL";
/// Environment variable overriding the listening port.
pub const PORT_ENV: &str = "REELGEN_PORT";
/// Environment variable overriding the story output directory.
pub const STORIES_DIR_ENV: &str = "REELGEN_STORIES_DIR";
/// Environment variable overriding the generation timeout, in seconds.
pub const TIMEOUT_ENV: &str = "REELGEN_GENERATION_TIMEOUT_SECS";

/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
/// Default Gemini API base URL.
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
/// Default server port.
pub const DEFAULT_PORT: u16 = 8080;
/// Default directory stories are written under.
pub const DEFAULT_STORIES_DIR: &str = "./stories";
/// Default upper bound on a single generation call.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors raised while loading configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The API credential is absent or blank.
    #[error("GEMINI_API_KEY is not set; export it or add it to .env")]
    MissingApiKey,
    /// A variable is present but cannot be parsed.
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue {
        /// Variable name.
        name: &'static str,
        /// Raw value found in the environment.
        value: String,
    },
}

/// Secret API credential; never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a credential, rejecting blank values.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingApiKey`] if the key is empty or whitespace.
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(Self(key))
    }

    /// Expose the raw credential for request signing.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Runtime configuration for the service.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// Gemini API credential.
    pub api_key: ApiKey,
    /// Gemini model name.
    pub model: String,
    /// Gemini API base URL (scheme and host, no path).
    pub gemini_base_url: String,
    /// TCP port to listen on.
    pub port: u16,
    /// Directory story folders are created under.
    pub stories_dir: PathBuf,
    /// Upper bound on one generation call.
    pub generation_timeout: Duration,
}

impl ServiceConfig {
    /// Create a config with defaults for everything but the credential.
    #[must_use]
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_URL.to_string(),
            port: DEFAULT_PORT,
            stories_dir: PathBuf::from(DEFAULT_STORIES_DIR),
            generation_timeout: DEFAULT_GENERATION_TIMEOUT,
        }
    }

    /// Load the config from the process environment.
    ///
    /// # Errors
    /// Returns an error if the credential is missing or a value is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load the config through an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns an error if the credential is missing or a value is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = ApiKey::new(lookup(API_KEY_ENV).unwrap_or_default())?;
        let mut config = Self::new(api_key);

        if let Some(model) = non_blank(lookup(MODEL_ENV)) {
            config.model = model;
        }
        if let Some(url) = non_blank(lookup(GEMINI_URL_ENV)) {
            config.gemini_base_url = url;
        }
        if let Some(port) = non_blank(lookup(PORT_ENV)) {
            config.port = parse_var(PORT_ENV, port)?;
        }
        if let Some(dir) = non_blank(lookup(STORIES_DIR_ENV)) {
            config.stories_dir = PathBuf::from(dir);
        }
        if let Some(secs) = non_blank(lookup(TIMEOUT_ENV)) {
            let secs: u64 = parse_var(TIMEOUT_ENV, secs)?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    name: TIMEOUT_ENV,
                    value: "0".to_string(),
                });
            }
            config.generation_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Set the model name.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the stories directory.
    #[must_use]
    pub fn with_stories_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.stories_dir = dir.into();
        self
    }

    /// Set the generation timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_missing_api_key_fails() {
        let result = ServiceConfig::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn test_blank_api_key_fails() {
        let result = ServiceConfig::from_lookup(lookup_from(&[(API_KEY_ENV, "   ")]));
        assert!(matches!(result, Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::from_lookup(lookup_from(&[(API_KEY_ENV, "secret")])).unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.stories_dir, PathBuf::from(DEFAULT_STORIES_DIR));
        assert_eq!(config.generation_timeout, DEFAULT_GENERATION_TIMEOUT);
        assert_eq!(config.api_key.expose(), "secret");
    }

    #[test]
    fn test_overrides() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            (API_KEY_ENV, "secret"),
            (MODEL_ENV, "gemini-2.0-flash"),
            (PORT_ENV, "9000"),
            (STORIES_DIR_ENV, "/tmp/reels"),
            (TIMEOUT_ENV, "15"),
        ]))
        .unwrap();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.port, 9000);
        assert_eq!(config.stories_dir, PathBuf::from("/tmp/reels"));
        assert_eq!(config.generation_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = ServiceConfig::from_lookup(lookup_from(&[
            (API_KEY_ENV, "secret"),
            (PORT_ENV, "eighty"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { name: PORT_ENV, .. })
        ));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let result = ServiceConfig::from_lookup(lookup_from(&[
            (API_KEY_ENV, "secret"),
            (TIMEOUT_ENV, "0"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { name: TIMEOUT_ENV, .. })
        ));
    }

    #[test]
    fn test_api_key_is_redacted() {
        let key = ApiKey::new("super-secret").unwrap();
        let printed = format!("{key:?}");
        assert!(!printed.contains("super-secret"));
    }
}
