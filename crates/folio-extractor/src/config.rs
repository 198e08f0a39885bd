//! Configuration for the Extractor

use serde::{Deserialize, Serialize};

/// Largest file accepted for upload in file mode (50 MiB)
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Characters of a raw response kept in parse error messages
pub const DEFAULT_EXCERPT_CHARS: usize = 500;

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Upload size limit for file mode (bytes)
    pub max_upload_bytes: u64,

    /// Raw response characters quoted when a response cannot be parsed
    pub max_excerpt_chars: usize,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_upload_bytes == 0 {
            return Err("max_upload_bytes must be greater than 0".to_string());
        }
        if self.max_excerpt_chars == 0 {
            return Err("max_excerpt_chars must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: MAX_UPLOAD_BYTES,
            max_excerpt_chars: DEFAULT_EXCERPT_CHARS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_upload_bytes, 52_428_800);
    }

    #[test]
    fn test_invalid_upload_limit() {
        let config = ExtractorConfig {
            max_upload_bytes: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_excerpt_length() {
        let config = ExtractorConfig {
            max_excerpt_chars: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ExtractorConfig::from_toml("max_upload_bytes = 1024").unwrap();
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(config.max_excerpt_chars, DEFAULT_EXCERPT_CHARS);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig {
            max_upload_bytes: 10 * 1024 * 1024,
            max_excerpt_chars: 200,
        };
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }
}
