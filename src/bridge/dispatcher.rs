//! JS-to-native dispatch.
//!
//! The page reaches native code through one entry point,
//! `<bridge>.<nativeEntry>(methodName, jsonParams)`. Both strings are
//! stripped of dangerous patterns, the params are decoded, and the method is
//! routed by exact name to a [`NativeHandler`]. Every call produces a
//! [`BridgeResult`]; nothing is raised back into the page.
//!
//! The XSS filter method is the one exception to stripping: its handler
//! receives the content as sent, so it can report what was removed.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::JsMethodNames;
use crate::error::{Error, Result};
use crate::protocol::{BridgeCall, BridgeResult, JsMethod};

// ============================================================================
// Constants
// ============================================================================

/// Message used when the page asks for an empty toast.
pub const EMPTY_TOAST_PLACEHOLDER: &str = "empty message";

// ============================================================================
// NativeHandler
// ============================================================================

/// Native side of the bridge.
///
/// Handlers return optional data that is placed in [`BridgeResult::data`].
/// Returned errors become result codes via [`Error::bridge_code`].
#[async_trait]
pub trait NativeHandler: Send + Sync {
    /// Show a toast with `message`.
    async fn on_show_toast(&self, message: String) -> Result<Option<Value>>;

    /// Provide device information.
    async fn on_get_device_info(&self) -> Result<Option<Value>>;

    /// Clear page caches.
    async fn on_clear_cache(&self) -> Result<Option<Value>>;

    /// Check `url` against the security policy.
    async fn on_check_url_safety(&self, url: String) -> Result<Option<Value>>;

    /// Filter `content` for XSS.
    async fn on_filter_xss(&self, content: String) -> Result<Option<Value>>;

    /// Provide user information.
    async fn on_get_user_info(&self) -> Result<Option<Value>> {
        Ok(None)
    }

    /// Open the native page called `page`.
    async fn on_open_native_page(&self, page: String) -> Result<Option<Value>> {
        Err(Error::handler(
            "openNativePage",
            format!("no native page named {page:?}"),
        ))
    }

    /// Called once for every method outside the whitelist.
    async fn on_unknown_method(&self, method: &str, params: &str);
}

// ============================================================================
// BridgeDispatcher
// ============================================================================

/// Routes bridge calls to a [`NativeHandler`].
#[derive(Clone)]
pub struct BridgeDispatcher {
    names: JsMethodNames,
    handler: Arc<dyn NativeHandler>,
}

impl fmt::Debug for BridgeDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeDispatcher")
            .field("names", &self.names)
            .finish_non_exhaustive()
    }
}

impl BridgeDispatcher {
    /// Creates a dispatcher for `names` backed by `handler`.
    #[inline]
    #[must_use]
    pub fn new(names: JsMethodNames, handler: Arc<dyn NativeHandler>) -> Self {
        Self { names, handler }
    }

    /// The single JS-to-native entry point. Returns the serialized result.
    pub async fn invoke(&self, method_name: &str, raw_params: &str) -> String {
        self.dispatch(method_name, raw_params).await.to_json()
    }

    /// Sanitizes, decodes and routes one call.
    pub async fn dispatch(&self, method_name: &str, raw_params: &str) -> BridgeResult {
        let call = BridgeCall::sanitized(method_name, raw_params);
        let method = JsMethod::resolve(&call.method_name, &self.names);
        debug!(call = %call.id, method = %call.method_name, params = %call.raw_params, "Bridge call");

        let params = call.params();

        if let JsMethod::Unknown(name) = &method {
            warn!(call = %call.id, method = %name, "Unknown bridge method");
            self.handler.on_unknown_method(name, &call.raw_params).await;
            return match params {
                Ok(_) => BridgeResult::unknown_method(name),
                Err(e) => BridgeResult::from_error(&e),
            };
        }

        let params = match params {
            Ok(params) => params,
            Err(e) => {
                warn!(call = %call.id, error = %e, "Bridge params rejected");
                return BridgeResult::from_error(&e);
            }
        };

        match self.route(&method, &call, params).await {
            Ok(data) => {
                debug!(call = %call.id, "Bridge call handled");
                BridgeResult::with_data(data)
            }
            Err(e) => {
                warn!(call = %call.id, code = e.bridge_code(), error = %e, "Bridge call failed");
                BridgeResult::from_error(&e)
            }
        }
    }

    async fn route(&self, method: &JsMethod, call: &BridgeCall, params: Value) -> Result<Option<Value>> {
        let handler = &self.handler;
        match method {
            JsMethod::ShowToast => {
                let message = string_param(call, params)?;
                let message = if message.is_empty() {
                    EMPTY_TOAST_PLACEHOLDER.to_string()
                } else {
                    message
                };
                handler.on_show_toast(message).await
            }
            JsMethod::GetDeviceInfo => handler.on_get_device_info().await,
            JsMethod::ClearCache => handler.on_clear_cache().await,
            JsMethod::CheckUrlSafety => handler.on_check_url_safety(string_param(call, params)?).await,
            JsMethod::FilterXss => handler.on_filter_xss(string_param(call, call.unfiltered()?)?).await,
            JsMethod::GetUserInfo => handler.on_get_user_info().await,
            JsMethod::OpenNativePage => handler.on_open_native_page(string_param(call, params)?).await,
            JsMethod::Unknown(name) => Err(Error::unknown_method(name)),
        }
    }
}

/// Extracts a JSON string param.
fn string_param(call: &BridgeCall, params: Value) -> Result<String> {
    match params {
        Value::String(s) => Ok(s),
        other => Err(Error::invalid_params(
            &call.method_name,
            format!("expected a JSON string, got {other}"),
        )),
    }
}

// ============================================================================
// Tests
// ============================================================================
