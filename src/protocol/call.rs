//! Bridge call and result types.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CODE_OK, CODE_UNKNOWN_METHOD, Error};
use crate::identifiers::CallId;
use crate::security::strip_dangerous_patterns;

// ============================================================================
// BridgeCall
// ============================================================================

/// One JS-to-native invocation, after sanitizing.
///
/// Lives for the duration of a dispatch and is never persisted.
#[derive(Debug, Clone)]
pub struct BridgeCall {
    /// Correlation id for logs.
    pub id: CallId,
    /// Sanitized method name.
    pub method_name: String,
    /// Sanitized JSON params.
    pub raw_params: String,
    /// Params exactly as the page sent them. Only content filtering reads
    /// these; every other method sees [`raw_params`](Self::raw_params).
    unfiltered_params: String,
}

impl BridgeCall {
    /// Creates a call with a fresh id from already sanitized strings.
    #[inline]
    #[must_use]
    pub fn new(method_name: impl Into<String>, raw_params: impl Into<String>) -> Self {
        let raw_params = raw_params.into();
        Self {
            id: CallId::generate(),
            method_name: method_name.into(),
            unfiltered_params: raw_params.clone(),
            raw_params,
        }
    }

    /// Creates a call from the strings the page sent, stripping both of
    /// dangerous patterns.
    #[must_use]
    pub fn sanitized(method_name: &str, params: &str) -> Self {
        Self {
            id: CallId::generate(),
            method_name: strip_dangerous_patterns(method_name),
            raw_params: strip_dangerous_patterns(params),
            unfiltered_params: params.to_string(),
        }
    }

    /// Decodes the sanitized params.
    ///
    /// Empty params decode to `null`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] with the decoder reason.
    pub fn params(&self) -> Result<Value, Error> {
        self.decode(&self.raw_params)
    }

    /// Decodes the params as the page sent them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParams`] with the decoder reason.
    pub fn unfiltered(&self) -> Result<Value, Error> {
        self.decode(&self.unfiltered_params)
    }

    fn decode(&self, params: &str) -> Result<Value, Error> {
        if params.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(params).map_err(|e| Error::invalid_params(&self.method_name, e.to_string()))
    }
}

// ============================================================================
// BridgeResult
// ============================================================================

/// Result returned to the page for every call.
///
/// # Format
///
/// ```json
/// { "code": 0, "message": "success", "data": { ... } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeResult {
    /// `0` on success, otherwise one of the `CODE_*` constants.
    pub code: i32,
    /// Human readable outcome.
    pub message: String,
    /// Optional payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl BridgeResult {
    /// Success without a payload.
    #[inline]
    #[must_use]
    pub fn ok() -> Self {
        Self {
            code: CODE_OK,
            message: "success".to_string(),
            data: None,
        }
    }

    /// Success with an optional payload.
    #[inline]
    #[must_use]
    pub fn with_data(data: Option<Value>) -> Self {
        Self {
            data,
            ..Self::ok()
        }
    }

    /// Acknowledgement of a method outside the whitelist.
    #[inline]
    #[must_use]
    pub fn unknown_method(method: &str) -> Self {
        Self {
            code: CODE_UNKNOWN_METHOD,
            message: format!("unknown method: {method}"),
            data: None,
        }
    }

    /// Failure built from a crate error.
    #[must_use]
    pub fn from_error(error: &Error) -> Self {
        Self {
            code: error.bridge_code(),
            message: error.to_string(),
            data: None,
        }
    }

    /// Returns `true` if `code` is [`CODE_OK`].
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code == CODE_OK
    }

    /// Serializes the result to the JSON string handed back to the page.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"code":{},"message":"serialization failed: {e}"}}"#, self.code)
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
