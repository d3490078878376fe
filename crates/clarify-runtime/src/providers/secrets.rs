//! Secure credential handling for the oracle API key.
//!
//! The key is wrapped the moment it is loaded so it:
//! - cannot appear in `Debug` output (shows `[REDACTED]`)
//! - is zeroed on drop via the `secrecy` crate
//! - must be explicitly exposed via `.expose()` at the point of use

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use super::ProviderError;

/// Where a credential was loaded from. Useful for debugging
/// configuration issues without exposing the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Loaded from a configuration file
    Config,
    /// Loaded from an environment variable
    Environment,
    /// Provided programmatically
    Programmatic,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Config => write!(f, "config"),
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::Programmatic => write!(f, "programmatic"),
        }
    }
}

/// A securely-stored API credential.
pub struct ApiCredential {
    value: SecretString,
    source: CredentialSource,
    name: &'static str,
}

impl ApiCredential {
    /// Wrap a credential value. After this point the value cannot be
    /// accidentally logged.
    pub fn new(value: impl Into<String>, source: CredentialSource, name: &'static str) -> Self {
        Self {
            value: SecretString::from(value.into()),
            source,
            name,
        }
    }

    /// Load a credential from an environment variable.
    pub fn from_env(env_var: &str, name: &'static str) -> Result<Self, ProviderError> {
        std::env::var(env_var)
            .map(|v| Self::new(v, CredentialSource::Environment, name))
            .map_err(|_| {
                ProviderError::NotConfigured(format!(
                    "{} not set: configure '{}' environment variable",
                    name, env_var
                ))
            })
    }

    /// Load from an optional config value, falling back to the
    /// environment variable.
    pub fn from_config_or_env(
        config_value: Option<&str>,
        env_var: &str,
        name: &'static str,
    ) -> Result<Self, ProviderError> {
        if let Some(value) = config_value {
            return Ok(Self::new(value, CredentialSource::Config, name));
        }
        Self::from_env(env_var, name)
    }

    /// Explicitly expose the credential for use in a request header.
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    /// True when the stored value is empty.
    pub fn is_empty(&self) -> bool {
        self.value.expose_secret().is_empty()
    }

    /// Where the credential came from.
    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("name", &self.name)
            .field("source", &self.source)
            .field("value", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_value() {
        let cred = ApiCredential::new("super-secret", CredentialSource::Programmatic, "test key");
        let debug = format!("{:?}", cred);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_expose_returns_value() {
        let cred = ApiCredential::new("the-key", CredentialSource::Programmatic, "test key");
        assert_eq!(cred.expose(), "the-key");
        assert!(!cred.is_empty());
    }

    #[test]
    fn test_config_value_wins_over_env() {
        let cred = ApiCredential::from_config_or_env(
            Some("from-config"),
            "CLARIFY_TEST_UNSET_VAR",
            "test key",
        )
        .unwrap();
        assert_eq!(cred.expose(), "from-config");
        assert_eq!(cred.source(), CredentialSource::Config);
    }

    #[test]
    fn test_missing_everywhere_is_not_configured() {
        let result =
            ApiCredential::from_config_or_env(None, "CLARIFY_TEST_UNSET_VAR", "test key");
        assert!(matches!(result, Err(ProviderError::NotConfigured(_))));
    }
}
