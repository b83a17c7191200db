//! Relay configuration.
//!
//! Resolved once at startup from defaults, an optional TOML file and the
//! environment, then handed to the relay as an immutable value.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::error::ConfigError;

/// Default chat-completion endpoint of the AI gateway.
pub const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";

/// Default multimodal model id.
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

/// Environment variable holding the upstream credential.
pub const API_KEY_ENV: &str = "AI_GATEWAY_API_KEY";

pub const GATEWAY_URL_ENV: &str = "FRUITSCAN_GATEWAY_URL";
pub const MODEL_ENV: &str = "FRUITSCAN_MODEL";
pub const RELAY_TOKEN_ENV: &str = "FRUITSCAN_RELAY_TOKEN";
pub const STRICT_SCHEMA_ENV: &str = "FRUITSCAN_STRICT_SCHEMA";

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Upstream credential. Its absence is reported per request, not at load.
    pub api_key: Option<String>,
    pub gateway_url: String,
    pub model: String,
    /// Static bearer token callers must present. `None` disables the check.
    pub relay_token: Option<String>,
    /// Reject upstream objects that do not match the diagnosis schema.
    pub strict_schema: bool,
    pub upstream_timeout_secs: Option<u64>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            relay_token: None,
            strict_schema: false,
            upstream_timeout_secs: None,
        }
    }
}

impl std::fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("gateway_url", &self.gateway_url)
            .field("model", &self.model)
            .field("relay_token", &self.relay_token.as_ref().map(|_| "<redacted>"))
            .field("strict_schema", &self.strict_schema)
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .finish()
    }
}

impl RelayConfig {
    /// Load defaults, then the TOML file (if any), then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        debug!(path = %path.display(), "Loaded relay config file");
        Ok(config)
    }

    /// Override fields from environment-style lookups. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(API_KEY_ENV) {
            self.api_key = Some(key);
        }
        if let Some(url) = get(GATEWAY_URL_ENV) {
            self.gateway_url = url;
        }
        if let Some(model) = get(MODEL_ENV) {
            self.model = model;
        }
        if let Some(token) = get(RELAY_TOKEN_ENV) {
            self.relay_token = Some(token);
        }
        if let Some(strict) = get(STRICT_SCHEMA_ENV) {
            self.strict_schema = parse_bool(STRICT_SCHEMA_ENV, &strict)?;
        }
        Ok(())
    }

    /// The upstream credential, if configured and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn upstream_timeout(&self) -> Option<Duration> {
        self.upstream_timeout_secs.map(Duration::from_secs)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = RelayConfig::default();
        assert!(config.api_key().is_none());
        assert_eq!(config.gateway_url, DEFAULT_GATEWAY_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!(!config.strict_schema);
        assert!(config.upstream_timeout().is_none());
    }

    #[test]
    fn test_env_overrides() {
        let vars = env(&[
            (API_KEY_ENV, "secret"),
            (MODEL_ENV, "some/other-model"),
            (RELAY_TOKEN_ENV, "letmein"),
            (STRICT_SCHEMA_ENV, "yes"),
            (GATEWAY_URL_ENV, ""),
        ]);
        let mut config = RelayConfig::default();
        config.apply_env(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.api_key(), Some("secret"));
        assert_eq!(config.model, "some/other-model");
        assert_eq!(config.relay_token.as_deref(), Some("letmein"));
        assert!(config.strict_schema);
        // Empty values leave the default in place.
        assert_eq!(config.gateway_url, DEFAULT_GATEWAY_URL);
    }

    #[test]
    fn test_invalid_bool() {
        let vars = env(&[(STRICT_SCHEMA_ENV, "maybe")]);
        let mut config = RelayConfig::default();
        let err = config.apply_env(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_toml_file() {
        let dir = std::env::temp_dir().join(format!("fruitscan-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("fruitscan.toml");
        std::fs::write(
            &path,
            "model = \"vision/test\"\nstrict_schema = true\nupstream_timeout_secs = 45\n",
        )
        .unwrap();

        let config = RelayConfig::from_file(&path).unwrap();
        assert_eq!(config.model, "vision/test");
        assert!(config.strict_schema);
        assert_eq!(config.upstream_timeout(), Some(Duration::from_secs(45)));
        assert_eq!(config.gateway_url, DEFAULT_GATEWAY_URL);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = RelayConfig {
            api_key: Some("sk-very-secret".into()),
            ..RelayConfig::default()
        };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("sk-very-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
