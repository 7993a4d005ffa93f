//! Native-to-JS calls.
//!
//! Every call becomes one script, `<jsEntry>("<method>", "<json>")`, posted
//! to the UI thread. The method name and the JSON text are both passed as
//! string literals, and every string inside the payload is stripped of
//! dangerous patterns before it is serialized.
//!
//! A call made while the page is not ready is skipped, not queued.

// ============================================================================
// Imports
// ============================================================================

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::BridgeNames;
use crate::host::PageHost;
use crate::inject::scripts::{json_string, sanitize_value};
use crate::protocol::{
    DeviceInfo, NativeMethod, SecuritySnapshot, UrlCheckReport, XssFilterReport,
};

// ============================================================================
// Delivery
// ============================================================================

/// Outcome of a native-to-JS call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The page ran the call. Holds the script's return value, if any.
    Delivered(Option<String>),
    /// The page was not ready; nothing was sent.
    Skipped,
    /// The page ran the call and it failed.
    Failed(String),
}

impl Delivery {
    /// Returns `true` if the page ran the call.
    #[inline]
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered(_))
    }
}

// ============================================================================
// NativeToJs
// ============================================================================

/// Sends calls from native code into a page.
#[derive(Debug, Clone)]
pub struct NativeToJs {
    host: PageHost,
    names: BridgeNames,
}

impl NativeToJs {
    /// Creates a caller for `host`.
    #[inline]
    #[must_use]
    pub fn new(host: PageHost, names: BridgeNames) -> Self {
        Self { host, names }
    }

    /// Returns the target page.
    #[inline]
    #[must_use]
    pub fn host(&self) -> &PageHost {
        &self.host
    }

    /// Calls `method` with `params` as its payload.
    pub async fn call_js<T: Serialize + ?Sized>(&self, method: NativeMethod, params: &T) -> Delivery {
        let name = method.name(&self.names.native_methods).to_string();
        self.call_js_named(&name, params).await
    }

    /// Calls the page function `method` by name.
    pub async fn call_js_named<T: Serialize + ?Sized>(&self, method: &str, params: &T) -> Delivery {
        if !self.host.is_ready() {
            warn!(page = %self.host.id(), method, state = %self.host.state(), "Page not ready, call skipped");
            return Delivery::Skipped;
        }

        let json = encode_params(params);
        let script = format!(
            "{}({}, {})",
            self.names.js_entry,
            json_string(method),
            json_string(&json)
        );
        debug!(page = %self.host.id(), method, params = %json, "Calling page");

        match self.host.evaluate(&script).await {
            Ok(Value::Null) => Delivery::Delivered(None),
            Ok(Value::String(s)) => Delivery::Delivered(Some(s)),
            Ok(other) => Delivery::Delivered(Some(other.to_string())),
            Err(e) if e.is_page_unavailable() => {
                debug!(page = %self.host.id(), method, error = %e, "Page went away, call skipped");
                Delivery::Skipped
            }
            Err(e) => {
                warn!(page = %self.host.id(), method, error = %e, "Page call failed");
                Delivery::Failed(e.to_string())
            }
        }
    }

    /// Pushes UI data.
    pub async fn update_ui(&self, data: &Value) -> Delivery {
        self.call_js(NativeMethod::UpdateUi, data).await
    }

    /// Reports a cache state change.
    pub async fn notify_cache_state(&self, state: &str) -> Delivery {
        self.call_js(NativeMethod::NotifyCacheState, state).await
    }

    /// Delivers device information, or a placeholder when there is none.
    pub async fn send_device_info(&self, info: DeviceInfo) -> Delivery {
        self.call_js(NativeMethod::DeviceInfo, &info.or_placeholder()).await
    }

    /// Asks the page to show a toast.
    pub async fn show_toast(&self, message: &str) -> Delivery {
        self.call_js(NativeMethod::ShowToast, message).await
    }

    /// Delivers user information.
    pub async fn return_user_info(&self, info: &Value) -> Delivery {
        self.call_js(NativeMethod::UserInfo, info).await
    }

    /// Pushes the active security configuration.
    pub async fn update_security_config(&self, snapshot: &SecuritySnapshot) -> Delivery {
        self.call_js(NativeMethod::SecurityConfig, snapshot).await
    }

    /// Reports a URL check.
    pub async fn notify_url_check_result(&self, report: &UrlCheckReport) -> Delivery {
        self.call_js(NativeMethod::UrlCheck, report).await
    }

    /// Reports an XSS filter run.
    pub async fn notify_xss_filter_result(&self, report: &XssFilterReport) -> Delivery {
        self.call_js(NativeMethod::XssFilter, report).await
    }
}

/// Serializes and sanitizes `params`. Falls back to `{}`.
fn encode_params<T: Serialize + ?Sized>(params: &T) -> String {
    serde_json::to_value(params)
        .map(sanitize_value)
        .and_then(|value| serde_json::to_string(&value))
        .unwrap_or_else(|e| {
            warn!(error = %e, "Params not serializable, sending {{}}");
            "{}".to_string()
        })
}

// ============================================================================
// Tests
// ============================================================================
