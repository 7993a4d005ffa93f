//! Aggregate host configuration.
//!
//! # Example
//!
//! ```ignore
//! use webview_bridge::config::HostConfig;
//!
//! let config = HostConfig::new()
//!     .with_api_level(34)
//!     .with_trusted_domain("example.org")
//!     .with_debug();
//! config.validate()?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;

use super::cache::CacheConfig;
use super::names::BridgeNames;
use super::policy::SecurityPolicy;
use super::settings::{ApiLevel, PageSettings};

// ============================================================================
// Constants
// ============================================================================

/// Default time the UI thread gets to answer a script evaluation.
pub const DEFAULT_SCRIPT_TIMEOUT_MS: u64 = 15_000;

// ============================================================================
// HostConfig
// ============================================================================

/// Everything a page host needs to know before loading a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HostConfig {
    /// Shared script names.
    pub names: BridgeNames,
    /// URL and script policy.
    pub security: SecurityPolicy,
    /// Cache layout and limits.
    pub cache: CacheConfig,
    /// Retry policy for waiting on injected globals.
    pub retry: RetryPolicy,
    /// Platform API level the settings profile targets.
    pub api_level: u32,
    /// Enables contents debugging.
    pub debug: bool,
    /// Script evaluation timeout in milliseconds.
    pub script_timeout_ms: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            names: BridgeNames::default(),
            security: SecurityPolicy::default(),
            cache: CacheConfig::default(),
            retry: RetryPolicy::default(),
            api_level: ApiLevel::V16,
            debug: false,
            script_timeout_ms: DEFAULT_SCRIPT_TIMEOUT_MS,
        }
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl HostConfig {
    /// Creates a configuration with default settings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON document; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// - [`Error::Json`] if the document is malformed
    /// - [`Error::Config`] if the parsed configuration is invalid
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl HostConfig {
    /// Replaces the shared names.
    #[inline]
    #[must_use]
    pub fn with_names(mut self, names: BridgeNames) -> Self {
        self.names = names;
        self
    }

    /// Replaces the security policy.
    #[inline]
    #[must_use]
    pub fn with_security(mut self, security: SecurityPolicy) -> Self {
        self.security = security;
        self
    }

    /// Adds a trusted domain.
    #[inline]
    #[must_use]
    pub fn with_trusted_domain(mut self, domain: impl Into<String>) -> Self {
        self.security = self.security.with_domain(domain);
        self
    }

    /// Replaces the cache configuration.
    #[inline]
    #[must_use]
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Replaces the retry policy.
    #[inline]
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the target API level.
    #[inline]
    #[must_use]
    pub fn with_api_level(mut self, api_level: u32) -> Self {
        self.api_level = api_level;
        self
    }

    /// Enables contents debugging.
    #[inline]
    #[must_use]
    pub fn with_debug(mut self) -> Self {
        self.debug = true;
        self
    }

    /// Sets the script evaluation timeout.
    #[inline]
    #[must_use]
    pub fn with_script_timeout(mut self, timeout: Duration) -> Self {
        self.script_timeout_ms = timeout.as_millis() as u64;
        self
    }
}

// ============================================================================
// Derived Values
// ============================================================================

impl HostConfig {
    /// Settings profile for the configured API level.
    #[inline]
    #[must_use]
    pub fn page_settings(&self) -> PageSettings {
        PageSettings::hardened(self.api_level, self.debug)
    }

    /// Script evaluation timeout.
    #[inline]
    #[must_use]
    pub fn script_timeout(&self) -> Duration {
        Duration::from_millis(self.script_timeout_ms)
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first invalid section.
    pub fn validate(&self) -> Result<()> {
        self.names
            .validate()
            .map_err(|e| Error::config(format!("names: {e}")))?;
        self.security
            .validate()
            .map_err(|e| Error::config(format!("security: {e}")))?;
        self.cache
            .validate()
            .map_err(|e| Error::config(format!("cache: {e}")))?;
        self.retry
            .validate()
            .map_err(|e| Error::config(format!("retry: {e}")))?;

        if self.api_level < ApiLevel::LOLLIPOP {
            return Err(Error::config(format!(
                "api level {} is below the supported minimum {}",
                self.api_level,
                ApiLevel::LOLLIPOP
            )));
        }
        if self.script_timeout_ms == 0 {
            return Err(Error::config("script timeout must be greater than zero"));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(HostConfig::new().validate().is_ok());
    }

    #[test]
    fn test_builder_chain() {
        let config = HostConfig::new()
            .with_api_level(ApiLevel::PIE)
            .with_trusted_domain("example.org")
            .with_debug()
            .with_script_timeout(Duration::from_secs(3));

        assert_eq!(config.api_level, 28);
        assert!(config.debug);
        assert_eq!(config.script_timeout(), Duration::from_secs(3));
        assert!(config.security.allowed_domains.contains(&"example.org".to_string()));
        assert!(config.page_settings().contents_debugging);
    }

    #[test]
    fn test_from_json_partial() {
        let config = HostConfig::from_json_str(
            r#"{"apiLevel": 30, "security": {"allowedDomains": ["example.org"]}}"#,
        )
        .expect("valid config");

        assert_eq!(config.api_level, 30);
        assert_eq!(config.security.allowed_domains, vec!["example.org".to_string()]);
        assert_eq!(config.security.asset_prefix, "file:///android_asset/");
        assert_eq!(config.names.bridge, "AdvanceAndroidJsBridge");
    }

    #[test]
    fn test_from_json_mixed_case_domain_trusted() {
        let config = HostConfig::from_json_str(
            r#"{"security": {"allowedDomains": ["GitHub.com"]}}"#,
        )
        .expect("valid config");

        let verdict = crate::security::url::evaluate(&config.security, "https://github.com/");
        assert!(verdict.is_safe(), "{verdict}");
    }

    #[test]
    fn test_from_json_malformed() {
        let err = HostConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_from_json_invalid_section() {
        let err = HostConfig::from_json_str(r#"{"names": {"bridge": "has space"}}"#).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("names"));
    }

    #[test]
    fn test_rejects_old_api_level() {
        let err = HostConfig::new().with_api_level(19).validate().unwrap_err();
        assert!(err.to_string().contains("below the supported minimum"));
    }
}
