//! Configuration structures for the extraction pipeline.

use logiparse_model::ModelSettings;
use serde::{Deserialize, Serialize};

/// Main configuration for the logiparse pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogiConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Delegated model service configuration.
    pub model: ModelConfig,
}

/// Deterministic extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Currency assumed when an amount is found without a currency token.
    pub default_currency: String,

    /// Weight unit assumed when a weight is found without a unit.
    pub default_weight_unit: String,

    /// Maximum number of line items taken from a document.
    pub max_line_items: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            default_currency: "PHP".to_string(),
            default_weight_unit: "kg".to_string(),
            max_line_items: 10,
        }
    }
}

/// Delegated model service configuration.
///
/// The API key is deliberately absent: it is resolved from the environment
/// at startup, never stored alongside the rest of the configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model identifier.
    pub model: String,

    /// Messages endpoint URL.
    pub endpoint: String,

    /// Maximum tokens in the response.
    pub max_tokens: u32,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let defaults = ModelSettings::default();
        Self {
            model: defaults.model,
            endpoint: defaults.endpoint,
            max_tokens: defaults.max_tokens,
            timeout_secs: defaults.timeout_secs,
        }
    }
}

impl ModelConfig {
    /// Combine with an API key into connection settings.
    pub fn to_settings(&self, api_key: String) -> ModelSettings {
        ModelSettings {
            api_key,
            model: self.model.clone(),
            endpoint: self.endpoint.clone(),
            max_tokens: self.max_tokens,
            timeout_secs: self.timeout_secs,
        }
    }
}

impl LogiConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = LogiConfig::default();
        assert_eq!(config.extraction.default_currency, "PHP");
        assert_eq!(config.extraction.default_weight_unit, "kg");
        assert_eq!(config.extraction.max_line_items, 10);
        assert_eq!(config.model.timeout_secs, 60);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = LogiConfig::default();
        config.extraction.default_currency = "USD".to_string();
        config.save(&path).unwrap();

        let loaded = LogiConfig::from_file(&path).unwrap();
        assert_eq!(loaded.extraction.default_currency, "USD");
        assert_eq!(loaded.extraction.max_line_items, 10);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"model": {"max_tokens": 2048}}"#).unwrap();

        let loaded = LogiConfig::from_file(&path).unwrap();
        assert_eq!(loaded.model.max_tokens, 2048);
        assert_eq!(loaded.extraction.default_currency, "PHP");
    }

    #[test]
    fn test_to_settings_carries_key() {
        let settings = ModelConfig::default().to_settings("sk-test".to_string());
        assert_eq!(settings.api_key, "sk-test");
        assert_eq!(settings.max_tokens, 1024);
    }
}
