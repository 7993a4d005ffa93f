//! Security policy: what URLs and scripts the host accepts.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Prefix of the app-bundled asset directory.
pub const DEFAULT_ASSET_PREFIX: &str = "file:///android_asset/";

/// Characters that make a URL unconditionally unsafe.
pub const DEFAULT_FORBIDDEN_URL_CHARS: &[char] = &['<', '>', '|', '*', '?', '%', '&', '$', '#'];

// ============================================================================
// SecurityPolicy
// ============================================================================

/// Allow-lists and denylists used by the security filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecurityPolicy {
    /// Accepted URL schemes (lowercase).
    pub allowed_schemes: Vec<String>,
    /// Trusted domains; subdomains are trusted too.
    pub allowed_domains: Vec<String>,
    /// The only accepted prefix for `file` URLs.
    pub asset_prefix: String,
    /// Characters that cause any URL to be refused.
    pub forbidden_url_chars: Vec<char>,
    /// Keywords that make injected script unsafe (matched case-insensitively).
    pub injection_denylist: Vec<String>,
    /// Keywords reported as malicious in XSS filter reports.
    pub malicious_keywords: Vec<String>,
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        Self {
            allowed_schemes: ["https", "http", "file"].map(String::from).to_vec(),
            allowed_domains: ["baidu.com", "google.com", "github.com", "localhost"]
                .map(String::from)
                .to_vec(),
            asset_prefix: DEFAULT_ASSET_PREFIX.to_string(),
            forbidden_url_chars: DEFAULT_FORBIDDEN_URL_CHARS.to_vec(),
            injection_denylist: [
                "eval(",
                "alert(",
                "confirm(",
                "javascript:",
                "file://",
                "intent://",
            ]
            .map(String::from)
            .to_vec(),
            malicious_keywords: [
                "<script>",
                "javascript:",
                "eval(",
                "alert(",
                "document.cookie",
                "localStorage",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl SecurityPolicy {
    /// Adds a trusted domain.
    #[inline]
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.allowed_domains.push(domain.into().to_ascii_lowercase());
        self
    }

    /// Replaces the trusted domain list.
    #[inline]
    #[must_use]
    pub fn with_domains(mut self, domains: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.allowed_domains = domains
            .into_iter()
            .map(|d| d.into().to_ascii_lowercase())
            .collect();
        self
    }

    /// Sets the local asset prefix.
    #[inline]
    #[must_use]
    pub fn with_asset_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.asset_prefix = prefix.into();
        self
    }

    /// Validates the policy.
    ///
    /// # Errors
    ///
    /// Returns error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.allowed_schemes.is_empty() {
            return Err("at least one URL scheme must be allowed".to_string());
        }
        if self.allowed_schemes.iter().any(|s| s != &s.to_ascii_lowercase()) {
            return Err("allowed schemes must be lowercase".to_string());
        }
        if !self.asset_prefix.starts_with("file:///") || !self.asset_prefix.ends_with('/') {
            return Err(format!(
                "asset prefix must look like file:///dir/, got {:?}",
                self.asset_prefix
            ));
        }
        if self.allowed_domains.iter().any(|d| d.is_empty() || d.contains('/')) {
            return Err("allowed domains must be bare host names".to_string());
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
        assert!(SecurityPolicy::default().validate().is_ok());
    }

    #[test]
    fn test_with_domain_lowercases() {
        let policy = SecurityPolicy::default().with_domain("Example.ORG");
        assert!(policy.allowed_domains.contains(&"example.org".to_string()));
    }

    #[test]
    fn test_rejects_bad_asset_prefix() {
        let policy = SecurityPolicy::default().with_asset_prefix("/sdcard/");
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_rejects_domain_with_path() {
        let policy = SecurityPolicy::default().with_domains(["github.com/evil"]);
        assert!(policy.validate().is_err());
    }
}
