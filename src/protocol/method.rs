//! Bridge method vocabulary.
//!
//! Names are configurable, so resolution goes through [`JsMethodNames`] and
//! [`NativeMethodNames`] rather than string constants.

// ============================================================================
// Imports
// ============================================================================

use crate::config::{JsMethodNames, NativeMethodNames};

// ============================================================================
// JsMethod
// ============================================================================

/// A method the page may call on the native side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsMethod {
    /// Show a native toast. Param: message string.
    ShowToast,
    /// Request device information. No param.
    GetDeviceInfo,
    /// Clear all page caches. No param.
    ClearCache,
    /// Check a URL. Param: URL string.
    CheckUrlSafety,
    /// Filter content. Param: content string.
    FilterXss,
    /// Request user information. No param.
    GetUserInfo,
    /// Open a native page. Param: page name string.
    OpenNativePage,
    /// Anything outside the whitelist.
    Unknown(String),
}

impl JsMethod {
    /// Resolves `name` by exact match against `names`.
    #[must_use]
    pub fn resolve(name: &str, names: &JsMethodNames) -> Self {
        match name {
            n if n == names.show_toast => Self::ShowToast,
            n if n == names.get_device_info => Self::GetDeviceInfo,
            n if n == names.clear_cache => Self::ClearCache,
            n if n == names.check_url_safety => Self::CheckUrlSafety,
            n if n == names.filter_xss => Self::FilterXss,
            n if n == names.get_user_info => Self::GetUserInfo,
            n if n == names.open_native_page => Self::OpenNativePage,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Returns `true` if the method takes a JSON string parameter.
    #[inline]
    #[must_use]
    pub fn takes_string_param(&self) -> bool {
        matches!(
            self,
            Self::ShowToast | Self::CheckUrlSafety | Self::FilterXss | Self::OpenNativePage
        )
    }

    /// Returns `true` for [`JsMethod::Unknown`].
    #[inline]
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

// ============================================================================
// NativeMethod
// ============================================================================

/// A method native code calls on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeMethod {
    /// Push UI data.
    UpdateUi,
    /// Report a cache state change.
    NotifyCacheState,
    /// Deliver device information.
    DeviceInfo,
    /// Push the security configuration.
    SecurityConfig,
    /// Report a URL check result.
    UrlCheck,
    /// Report an XSS filter result.
    XssFilter,
    /// Ask the page to show a toast.
    ShowToast,
    /// Deliver user information.
    UserInfo,
}

impl NativeMethod {
    /// Configured page-side name.
    #[must_use]
    pub fn name<'a>(&self, names: &'a NativeMethodNames) -> &'a str {
        match self {
            Self::UpdateUi => &names.update_ui,
            Self::NotifyCacheState => &names.notify_cache_state,
            Self::DeviceInfo => &names.device_info,
            Self::SecurityConfig => &names.security_config,
            Self::UrlCheck => &names.url_check,
            Self::XssFilter => &names.xss_filter,
            Self::ShowToast => &names.show_toast,
            Self::UserInfo => &names.user_info,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
