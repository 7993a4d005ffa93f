//! Payloads pushed to the page.
//!
//! All payloads serialize with camelCase keys, matching what the page
//! scripts read.

// ============================================================================
// Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{MixedContentMode, PageSettings, SecurityPolicy};

// ============================================================================
// DeviceInfo
// ============================================================================

/// Placeholder key used when no device information is available.
pub const DEVICE_INFO_PLACEHOLDER_KEY: &str = "msg";

/// Placeholder value used when no device information is available.
pub const DEVICE_INFO_PLACEHOLDER: &str = "no device info";

/// Free-form device information as string pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceInfo(BTreeMap<String, String>);

impl DeviceInfo {
    /// Creates an empty map.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field.
    #[inline]
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Returns `true` if no fields are set.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Looks up a field.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Replaces an empty map with the placeholder entry.
    #[must_use]
    pub fn or_placeholder(self) -> Self {
        if self.is_empty() {
            Self::new().with(DEVICE_INFO_PLACEHOLDER_KEY, DEVICE_INFO_PLACEHOLDER)
        } else {
            self
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DeviceInfo {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// ============================================================================
// UrlCheckReport
// ============================================================================

/// Result of a URL check requested by the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlCheckReport {
    /// The URL as received.
    pub url: String,
    /// Whether the URL passed.
    pub valid: bool,
    /// Outcome description.
    pub message: String,
}

// ============================================================================
// XssFilterReport
// ============================================================================

/// Result of filtering content requested by the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XssFilterReport {
    /// Content as received.
    pub original_content: String,
    /// Content after filtering.
    pub filtered_content: String,
    /// Whether the original carried a known malicious keyword.
    pub has_malicious: bool,
    /// Outcome description.
    pub message: String,
}

// ============================================================================
// SecuritySnapshot
// ============================================================================

/// Active security configuration, pushed to the page for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySnapshot {
    /// Trusted domains, comma separated.
    pub safe_domain_whitelist: String,
    /// XSS filtering is active.
    pub xss_filter_enabled: bool,
    /// Local file access is on.
    pub file_access_enabled: bool,
    /// Mixed content may load.
    pub mixed_content_enabled: bool,
    /// Safe browsing is on.
    pub safe_browsing_enabled: bool,
}

impl SecuritySnapshot {
    /// Builds a snapshot from the active policy and settings.
    #[must_use]
    pub fn new(policy: &SecurityPolicy, settings: &PageSettings) -> Self {
        Self {
            safe_domain_whitelist: policy.allowed_domains.join(","),
            xss_filter_enabled: true,
            file_access_enabled: settings.allow_file_access,
            mixed_content_enabled: settings.mixed_content != MixedContentMode::NeverAllow,
            safe_browsing_enabled: settings.safe_browsing_enabled,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
