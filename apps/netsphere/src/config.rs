//! # Oracle Configuration
//!
//! Endpoint, key and model selection for the oracle client, loaded from
//! `netsphere.toml` with environment-variable overrides.

use serde::Deserialize;
use std::path::Path;

/// Default chat-completion base URL.
const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default model identifier.
const DEFAULT_MODEL: &str = "deepseek/deepseek-r1:free";

/// Oracle connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Base URL of the OpenAI-compatible endpoint.
    pub base_url: String,
    /// Bearer token. Optional: local endpoints may not require one.
    pub api_key: Option<String>,
    /// Model identifier sent with every completion request.
    pub model: String,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// Top-level configuration file shape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    oracle: OracleConfig,
}

impl OracleConfig {
    /// Load configuration: defaults, then `netsphere.toml` if present,
    /// then `NETSPHERE_ORACLE_URL` / `NETSPHERE_ORACLE_KEY` /
    /// `NETSPHERE_ORACLE_MODEL` environment overrides.
    pub fn load(path: &Path) -> Result<Self, String> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            let file: ConfigFile = toml::from_str(&raw)
                .map_err(|e| format!("cannot parse {}: {e}", path.display()))?;
            file.oracle
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var("NETSPHERE_ORACLE_URL") {
            config.base_url = url;
        }
        if let Ok(key) = std::env::var("NETSPHERE_ORACLE_KEY") {
            config.api_key = Some(key);
        }
        if let Ok(model) = std::env::var("NETSPHERE_ORACLE_MODEL") {
            config.model = model;
        }
        Ok(config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_file_is_partial() {
        let file: ConfigFile =
            toml::from_str("[oracle]\nmodel = \"test/model\"\n").expect("parse");
        assert_eq!(file.oracle.model, "test/model");
        assert_eq!(file.oracle.base_url, DEFAULT_BASE_URL);
        assert!(file.oracle.api_key.is_none());
    }

    #[test]
    fn empty_file_yields_defaults() {
        let file: ConfigFile = toml::from_str("").expect("parse");
        assert_eq!(file.oracle.base_url, DEFAULT_BASE_URL);
        assert_eq!(file.oracle.model, DEFAULT_MODEL);
    }
}
