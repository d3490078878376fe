//! Runtime configuration.
//!
//! Loaded from YAML; every field has a sensible default so an empty
//! file (or no file at all) yields a working configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
}

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    pub provider: ProviderConfig,
    pub retry: RetryPolicy,
    pub cache: CacheConfig,
}

impl RuntimeConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

/// LLM provider settings.
///
/// `api_key` is optional here; when absent the `GEMINI_API_KEY`
/// environment variable is consulted at provider construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: None,
            base_url: None,
        }
    }
}

/// Retry behavior for transient provider failures.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryPolicy {
    /// Retries after the first attempt. 3 retries = 4 total tries.
    pub max_retries: u32,

    /// Initial backoff after a rate-limit response.
    #[serde(with = "humantime_serde")]
    pub rate_limit_base: Duration,

    /// Initial backoff after a service-unavailable response.
    #[serde(with = "humantime_serde")]
    pub unavailable_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            rate_limit_base: Duration::from_secs(2),
            unavailable_base: Duration::from_secs(3),
        }
    }
}

/// Verdict cache settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub enabled: bool,
    pub capacity: u64,
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 1_000,
            ttl: Duration::from_secs(600),
        }
    }
}

/// Serde adapter for human-readable durations ("2s", "5m", "1h 30m").
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.retry.max_retries, 3);
        assert_eq!(config.retry.rate_limit_base, Duration::from_secs(2));
        assert_eq!(config.retry.unavailable_base, Duration::from_secs(3));
        assert!(config.cache.enabled);
    }

    #[test]
    fn test_empty_yaml_yields_defaults() {
        let config: RuntimeConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.retry.max_retries, 3);
        assert!(config.provider.api_key.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
provider:
  model: gemini-2.0-pro
retry:
  max_retries: 5
  rate_limit_base: 1s
  unavailable_base: 10s
cache:
  enabled: false
  capacity: 50
  ttl: 5m
"#;
        let config: RuntimeConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.provider.model.as_deref(), Some("gemini-2.0-pro"));
        assert_eq!(config.retry.max_retries, 5);
        assert_eq!(config.retry.rate_limit_base, Duration::from_secs(1));
        assert_eq!(config.retry.unavailable_base, Duration::from_secs(10));
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.ttl, Duration::from_secs(300));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<RuntimeConfig, _> = serde_yaml::from_str("nonsense: true");
        assert!(result.is_err());
    }

    #[test]
    fn test_duration_round_trip() {
        let policy = RetryPolicy::default();
        let yaml = serde_yaml::to_string(&policy).unwrap();
        let back: RetryPolicy = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back.rate_limit_base, policy.rate_limit_base);
        assert_eq!(back.unavailable_base, policy.unavailable_base);
    }
}
