//! Bridge, entry point and module names.
//!
//! Every name that ends up interpolated into script text lives here so the
//! page side and the native side agree on one vocabulary.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

// ============================================================================
// JsMethodNames
// ============================================================================

/// Method names the page may send through the JS-to-native entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JsMethodNames {
    /// Show a native toast.
    pub show_toast: String,
    /// Request device information.
    pub get_device_info: String,
    /// Clear all page caches.
    pub clear_cache: String,
    /// Check a URL against the security policy.
    pub check_url_safety: String,
    /// Run content through the XSS filter.
    pub filter_xss: String,
    /// Request user information.
    pub get_user_info: String,
    /// Open a native page by name.
    pub open_native_page: String,
}

impl Default for JsMethodNames {
    fn default() -> Self {
        Self {
            show_toast: "showAdvanceToast".to_string(),
            get_device_info: "getAdvanceDeviceInfo".to_string(),
            clear_cache: "clearAdvanceCache".to_string(),
            check_url_safety: "checkAdvanceUrlSafety".to_string(),
            filter_xss: "filterAdvanceXss".to_string(),
            get_user_info: "getUserInfo".to_string(),
            open_native_page: "openNativePage".to_string(),
        }
    }
}

impl JsMethodNames {
    /// Returns all names in declaration order.
    #[must_use]
    pub fn all(&self) -> [&str; 7] {
        [
            &self.show_toast,
            &self.get_device_info,
            &self.clear_cache,
            &self.check_url_safety,
            &self.filter_xss,
            &self.get_user_info,
            &self.open_native_page,
        ]
    }
}

// ============================================================================
// NativeMethodNames
// ============================================================================

/// Method names native code passes to the page's JS entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NativeMethodNames {
    /// Push UI data.
    pub update_ui: String,
    /// Report cache state changes.
    pub notify_cache_state: String,
    /// Deliver device information.
    pub device_info: String,
    /// Push the active security configuration.
    pub security_config: String,
    /// Report a URL check result.
    pub url_check: String,
    /// Report an XSS filter result.
    pub xss_filter: String,
    /// Ask the page to show a toast.
    pub show_toast: String,
    /// Deliver user information.
    pub user_info: String,
}

impl Default for NativeMethodNames {
    fn default() -> Self {
        Self {
            update_ui: "updateAdvanceUi".to_string(),
            notify_cache_state: "notifyAdvanceCacheState".to_string(),
            device_info: "getAdvanceDeviceInfo".to_string(),
            security_config: "updateAdvanceSecurityConfig".to_string(),
            url_check: "notifyAdvanceUrlCheck".to_string(),
            xss_filter: "notifyAdvanceXssFilter".to_string(),
            show_toast: "showToast".to_string(),
            user_info: "getUserInfo".to_string(),
        }
    }
}

// ============================================================================
// BridgeNames
// ============================================================================

/// Names shared between the native side and injected script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BridgeNames {
    /// Global name of the bridge object exposed to script.
    pub bridge: String,
    /// Method on the bridge object that script calls into native code.
    pub native_entry: String,
    /// Global JS function native code calls into.
    pub js_entry: String,
    /// Global utilities module injected at page start.
    pub global_tool: String,
    /// Business module injected at page finish.
    pub business_logic: String,
    /// DOM element the injected modules log into.
    pub result_element: String,
    /// JS-to-native vocabulary.
    pub js_methods: JsMethodNames,
    /// Native-to-JS vocabulary.
    pub native_methods: NativeMethodNames,
}

impl Default for BridgeNames {
    fn default() -> Self {
        Self {
            bridge: "AdvanceAndroidJsBridge".to_string(),
            native_entry: "callAdvanceAndroid".to_string(),
            js_entry: "callAdvanceJs".to_string(),
            global_tool: "AdvanceGlobalTool".to_string(),
            business_logic: "AdvanceBusinessLogic".to_string(),
            result_element: "advanceInjectResult".to_string(),
            js_methods: JsMethodNames::default(),
            native_methods: NativeMethodNames::default(),
        }
    }
}

impl BridgeNames {
    /// Validates that every interpolated name is a plain JS identifier and
    /// that the JS-to-native vocabulary has no duplicates.
    ///
    /// # Errors
    ///
    /// Returns error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        let globals = [
            ("bridge", &self.bridge),
            ("nativeEntry", &self.native_entry),
            ("jsEntry", &self.js_entry),
            ("globalTool", &self.global_tool),
            ("businessLogic", &self.business_logic),
        ];
        for (field, name) in globals {
            if !is_js_identifier(name) {
                return Err(format!("{field} is not a valid JS identifier: {name:?}"));
            }
        }

        if self.global_tool == self.business_logic {
            return Err("globalTool and businessLogic must differ".to_string());
        }

        let methods = self.js_methods.all();
        for (i, name) in methods.iter().enumerate() {
            if name.is_empty() {
                return Err("JS method names must not be empty".to_string());
            }
            if methods[..i].contains(name) {
                return Err(format!("duplicate JS method name: {name}"));
            }
        }
        Ok(())
    }
}

/// Returns `true` if `name` is usable as a bare JS identifier.
pub(crate) fn is_js_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(BridgeNames::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_identifier_bridge() {
        let names = BridgeNames {
            bridge: "Advance Bridge".to_string(),
            ..Default::default()
        };
        assert!(names.validate().is_err());
    }

    #[test]
    fn test_rejects_duplicate_method() {
        let mut names = BridgeNames::default();
        names.js_methods.clear_cache = names.js_methods.show_toast.clone();
        let err = names.validate().unwrap_err();
        assert!(err.contains("duplicate"));
    }

    #[test]
    fn test_is_js_identifier() {
        assert!(is_js_identifier("callAdvanceJs"));
        assert!(is_js_identifier("_private$1"));
        assert!(!is_js_identifier("1abc"));
        assert!(!is_js_identifier("a.b"));
        assert!(!is_js_identifier(""));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let names: BridgeNames =
            serde_json::from_str(r#"{"bridge":"AndroidJsBridge","nativeEntry":"callAndroid"}"#)
                .expect("parse");
        assert_eq!(names.bridge, "AndroidJsBridge");
        assert_eq!(names.native_entry, "callAndroid");
        assert_eq!(names.js_entry, "callAdvanceJs");
        assert_eq!(names.js_methods.show_toast, "showAdvanceToast");
    }
}
