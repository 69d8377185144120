//! Configuration loading from purser.toml.

use policy::Policy;
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Backend configuration.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Path access rules (allow/deny).
    #[serde(flatten)]
    pub policy: Policy,
}

/// Backend provider configuration.
#[derive(Debug, Deserialize)]
pub struct BackendConfig {
    /// Provider name (currently only "anthropic" supported).
    #[serde(default = "default_provider")]
    #[allow(dead_code)]
    pub provider: String,

    /// Model to use.
    #[serde(default = "default_model")]
    pub model: String,

    /// Anthropic API key. Falls back to the ANTHROPIC_API_KEY environment
    /// variable when absent.
    pub api_key: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key: None,
        }
    }
}

fn default_provider() -> String {
    "anthropic".to_string()
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from the given path if it exists, otherwise the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default_config())
        }
    }

    /// Create a default configuration.
    pub fn default_config() -> Self {
        Self {
            backend: BackendConfig::default(),
            policy: Policy::restrictive(),
        }
    }

    /// Resolve the API key from config or environment.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        if let Some(key) = &self.backend.api_key {
            return Ok(key.clone());
        }
        std::env::var("ANTHROPIC_API_KEY").map_err(|_| ConfigError::MissingAuth)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("authentication not configured: set backend.api_key in purser.toml or ANTHROPIC_API_KEY")]
    MissingAuth,
}

#[cfg(test)]
mod tests {
    use super::*;
    use policy::PathRequest;

    #[test]
    fn parse_full_config() {
        let toml = r#"
[backend]
model = "claude-haiku-4-5"
api_key = "sk-ant-api01-test"

[allow]
read = ["./"]
write = ["./out/**"]
"#;
        let config = Config::parse(toml).unwrap();
        assert_eq!(config.backend.model, "claude-haiku-4-5");
        assert_eq!(config.api_key().unwrap(), "sk-ant-api01-test");
        assert!(config.policy.check(&PathRequest::write("./out/a/b")).is_allowed());
        assert!(!config.policy.check(&PathRequest::write("/etc")).is_allowed());
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.backend.provider, "anthropic");
        assert_eq!(config.backend.model, default_model());
        // No allow tables in the TOML means no access at all; the default
        // config (not an empty file) is what grants the working directory.
        assert!(!config.policy.check(&PathRequest::read("./x")).is_allowed());

        let default = Config::default_config();
        assert!(default.policy.check(&PathRequest::read("./x")).is_allowed());
    }
}
