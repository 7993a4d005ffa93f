//! Page settings derived from the platform API level.
//!
//! The values mirror the hardened profile a host applies before loading any
//! page: local file access off, form saving off, and progressively stricter
//! defaults as the platform gains the relevant switches.
//!
//! # Example
//!
//! ```ignore
//! use webview_bridge::config::{ApiLevel, PageSettings};
//!
//! let settings = PageSettings::hardened(ApiLevel::V16, false);
//! assert!(settings.safe_browsing_enabled);
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

// ============================================================================
// ApiLevel
// ============================================================================

/// Platform API levels the settings profile branches on.
pub struct ApiLevel;

impl ApiLevel {
    /// Lollipop (5.0).
    pub const LOLLIPOP: u32 = 21;
    /// Nougat (7.0).
    pub const NOUGAT: u32 = 24;
    /// Oreo (8.0).
    pub const OREO: u32 = 26;
    /// Pie (9.0).
    pub const PIE: u32 = 28;
    /// Android 10.
    pub const Q: u32 = 29;
    /// Android 12.
    pub const S: u32 = 31;
    /// Android 14.
    pub const U: u32 = 34;
    /// Android 16.
    pub const V16: u32 = 36;
}

/// Built-in script interfaces removed on newer platforms.
pub const DANGEROUS_INTERFACES: &[&str] =
    &["searchBoxJavaBridge_", "accessibility", "accessibilityTraversal"];

// ============================================================================
// MixedContentMode
// ============================================================================

/// Whether an HTTPS page may load HTTP subresources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MixedContentMode {
    /// Allow all mixed content.
    AlwaysAllow,
    /// Block all mixed content.
    NeverAllow,
    /// Allow passive content only.
    Compatibility,
}

// ============================================================================
// PageSettings
// ============================================================================

/// The settings applied to a page host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSettings {
    /// API level the profile was computed for.
    pub api_level: u32,
    /// Script execution.
    pub javascript_enabled: bool,
    /// Scripts may open windows without a user gesture.
    pub javascript_can_open_windows: bool,
    /// Local file access.
    pub allow_file_access: bool,
    /// `file` URLs may read other `file` URLs.
    pub allow_file_access_from_file_urls: bool,
    /// `file` URLs may read any origin.
    pub allow_universal_access_from_file_urls: bool,
    /// Content provider access.
    pub allow_content_access: bool,
    /// Form data persistence.
    pub save_form_data: bool,
    /// DOM storage.
    pub dom_storage_enabled: bool,
    /// Web SQL database.
    pub database_enabled: bool,
    /// Geolocation.
    pub geolocation_enabled: bool,
    /// Media playback requires a user gesture.
    pub media_requires_user_gesture: bool,
    /// Images load without an explicit request.
    #[serde(default = "default_load_images")]
    pub load_images_automatically: bool,
    /// Third-party cookies.
    pub accept_third_party_cookies: bool,
    /// Safe browsing.
    pub safe_browsing_enabled: bool,
    /// Mixed content handling.
    pub mixed_content: MixedContentMode,
    /// Remote debugging of page contents.
    pub contents_debugging: bool,
    /// Default text encoding.
    pub text_encoding: String,
    /// Built-in interfaces removed from the page.
    pub removed_interfaces: Vec<String>,
}

impl PageSettings {
    /// Computes the hardened settings profile for `api_level`.
    #[must_use]
    pub fn hardened(api_level: u32, debug: bool) -> Self {
        let mixed_content = if api_level < ApiLevel::NOUGAT {
            MixedContentMode::AlwaysAllow
        } else {
            MixedContentMode::NeverAllow
        };

        let removed_interfaces = if api_level >= ApiLevel::S {
            DANGEROUS_INTERFACES.iter().map(|s| (*s).to_string()).collect()
        } else {
            Vec::new()
        };

        Self {
            api_level,
            javascript_enabled: true,
            javascript_can_open_windows: false,
            allow_file_access: false,
            allow_file_access_from_file_urls: false,
            allow_universal_access_from_file_urls: false,
            allow_content_access: false,
            save_form_data: false,
            dom_storage_enabled: true,
            database_enabled: true,
            geolocation_enabled: false,
            media_requires_user_gesture: true,
            load_images_automatically: true,
            accept_third_party_cookies: false,
            safe_browsing_enabled: api_level >= ApiLevel::OREO,
            mixed_content,
            contents_debugging: debug && api_level >= ApiLevel::LOLLIPOP,
            text_encoding: "UTF-8".to_string(),
            removed_interfaces,
        }
    }

    /// Returns `true` if `name` must not be exposed to script.
    #[inline]
    #[must_use]
    pub fn is_interface_removed(&self, name: &str) -> bool {
        self.removed_interfaces.iter().any(|n| n == name)
    }
}

fn default_load_images() -> bool {
    true
}

impl Default for PageSettings {
    fn default() -> Self {
        Self::hardened(ApiLevel::V16, false)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_access_always_off() {
        for level in [ApiLevel::LOLLIPOP, ApiLevel::PIE, ApiLevel::V16] {
            let settings = PageSettings::hardened(level, false);
            assert!(!settings.allow_file_access);
            assert!(!settings.allow_universal_access_from_file_urls);
            assert!(!settings.save_form_data);
        }
    }

    #[test]
    fn test_mixed_content_by_level() {
        assert_eq!(
            PageSettings::hardened(ApiLevel::LOLLIPOP, false).mixed_content,
            MixedContentMode::AlwaysAllow
        );
        assert_eq!(
            PageSettings::hardened(ApiLevel::PIE, false).mixed_content,
            MixedContentMode::NeverAllow
        );
    }

    #[test]
    fn test_safe_browsing_from_oreo() {
        assert!(!PageSettings::hardened(ApiLevel::NOUGAT, false).safe_browsing_enabled);
        assert!(PageSettings::hardened(ApiLevel::OREO, false).safe_browsing_enabled);
    }

    #[test]
    fn test_dangerous_interfaces_removed_from_s() {
        let old = PageSettings::hardened(ApiLevel::Q, false);
        let new = PageSettings::hardened(ApiLevel::S, false);
        assert!(!old.is_interface_removed("searchBoxJavaBridge_"));
        assert!(new.is_interface_removed("searchBoxJavaBridge_"));
        assert!(new.is_interface_removed("accessibilityTraversal"));
    }

    #[test]
    fn test_images_load_by_default() {
        assert!(PageSettings::hardened(ApiLevel::LOLLIPOP, false).load_images_automatically);

        let mut value = serde_json::to_value(PageSettings::default()).expect("serialize");
        value
            .as_object_mut()
            .expect("object")
            .remove("loadImagesAutomatically");
        let settings: PageSettings = serde_json::from_value(value).expect("deserialize");
        assert!(settings.load_images_automatically);
    }

    #[test]
    fn test_debugging_only_when_requested() {
        assert!(!PageSettings::hardened(ApiLevel::V16, false).contents_debugging);
        assert!(PageSettings::hardened(ApiLevel::V16, true).contents_debugging);
    }
}
