//! Error types for the WebView bridge.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use webview_bridge::{Result, Error};
//!
//! async fn example(host: &PageHost) -> Result<()> {
//!     host.load_page("https://github.com/").await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`] |
//! | Bridge | [`Error::InvalidParams`], [`Error::UnknownMethod`], [`Error::Handler`] |
//! | Security | [`Error::UnsafeUrl`], [`Error::UnsafeScript`] |
//! | Page | [`Error::PageNotLoaded`], [`Error::PageDestroyed`], [`Error::UiThreadClosed`] |
//! | Execution | [`Error::ScriptError`], [`Error::Timeout`], [`Error::RetryExhausted`] |
//! | External | [`Error::Io`], [`Error::Json`] |
//!
//! # Bridge Codes
//!
//! Errors that reach the JS side are never raised there; they are folded into
//! a `BridgeResult` using [`Error::bridge_code`].

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;
use tokio::sync::oneshot::error::RecvError;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Bridge Codes
// ============================================================================

/// Bridge result code for a successful call.
pub const CODE_OK: i32 = 0;

/// Bridge result code for malformed parameters.
pub const CODE_INVALID_PARAMS: i32 = 400;

/// Bridge result code for content refused by the security filter.
pub const CODE_REFUSED: i32 = 403;

/// Bridge result code for an acknowledged but unrecognized method.
pub const CODE_UNKNOWN_METHOD: i32 = 404;

/// Bridge result code for a failure inside a native handler.
pub const CODE_HANDLER_FAILED: i32 = 500;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when host or bridge configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Bridge Errors
    // ========================================================================
    /// Bridge call parameters could not be decoded.
    #[error("Invalid params for {method}: {reason}")]
    InvalidParams {
        /// Method the params were sent to.
        method: String,
        /// Decoder failure reason.
        reason: String,
    },

    /// Method name is not part of the bridge vocabulary.
    #[error("Unknown method: {method}")]
    UnknownMethod {
        /// The unrecognized method name.
        method: String,
    },

    /// A native handler reported a failure.
    #[error("Handler for {method} failed: {message}")]
    Handler {
        /// Method being handled.
        method: String,
        /// Failure description.
        message: String,
    },

    // ========================================================================
    // Security Errors
    // ========================================================================
    /// URL refused by the security policy.
    #[error("Unsafe URL refused: {url} ({reason})")]
    UnsafeUrl {
        /// The refused URL.
        url: String,
        /// Why it was refused.
        reason: String,
    },

    /// Script refused by the injection check.
    #[error("Unsafe script refused: {name}")]
    UnsafeScript {
        /// Name of the module or script.
        name: String,
    },

    // ========================================================================
    // Page Errors
    // ========================================================================
    /// The page has not loaded a URL yet.
    #[error("Page not loaded")]
    PageNotLoaded,

    /// The page host was destroyed.
    #[error("Page destroyed")]
    PageDestroyed,

    /// The UI thread stopped before replying.
    #[error("UI thread closed")]
    UiThreadClosed(#[from] RecvError),

    // ========================================================================
    // Execution Errors
    // ========================================================================
    /// Script evaluation failed inside the engine.
    #[error("Script error: {message}")]
    ScriptError {
        /// Error message from the engine.
        message: String,
    },

    /// Operation timeout.
    ///
    /// Returned when the UI thread does not answer in time.
    #[error("Timeout after {timeout_ms}ms: {operation}")]
    Timeout {
        /// Description of the operation that timed out.
        operation: String,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// A bounded retry ran out of attempts or budget.
    #[error("Gave up on {operation} after {attempts} attempts ({elapsed_ms}ms)")]
    RetryExhausted {
        /// Description of the operation being retried.
        operation: String,
        /// Attempts made.
        attempts: u32,
        /// Milliseconds spent waiting between attempts.
        elapsed_ms: u64,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid params error.
    #[inline]
    pub fn invalid_params(method: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            method: method.into(),
            reason: reason.into(),
        }
    }

    /// Creates an unknown method error.
    #[inline]
    pub fn unknown_method(method: impl Into<String>) -> Self {
        Self::UnknownMethod {
            method: method.into(),
        }
    }

    /// Creates a handler failure.
    #[inline]
    pub fn handler(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Handler {
            method: method.into(),
            message: message.into(),
        }
    }

    /// Creates an unsafe URL error.
    #[inline]
    pub fn unsafe_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsafeUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates an unsafe script error.
    #[inline]
    pub fn unsafe_script(name: impl Into<String>) -> Self {
        Self::UnsafeScript { name: name.into() }
    }

    /// Creates a script error.
    #[inline]
    pub fn script_error(message: impl Into<String>) -> Self {
        Self::ScriptError {
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    #[inline]
    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Creates a retry exhausted error.
    #[inline]
    pub fn retry_exhausted(operation: impl Into<String>, attempts: u32, elapsed_ms: u64) -> Self {
        Self::RetryExhausted {
            operation: operation.into(),
            attempts,
            elapsed_ms,
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this error was a security refusal.
    #[inline]
    #[must_use]
    pub fn is_refusal(&self) -> bool {
        matches!(self, Self::UnsafeUrl { .. } | Self::UnsafeScript { .. })
    }

    /// Returns `true` if the page could not be reached.
    #[inline]
    #[must_use]
    pub fn is_page_unavailable(&self) -> bool {
        matches!(
            self,
            Self::PageNotLoaded | Self::PageDestroyed | Self::UiThreadClosed(_)
        )
    }

    /// Returns `true` if this error is recoverable.
    ///
    /// Recoverable errors may succeed on retry.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::PageNotLoaded
                | Self::ScriptError { .. }
                | Self::Timeout { .. }
                | Self::RetryExhausted { .. }
        )
    }

    /// Maps the error to the numeric code reported across the bridge.
    #[must_use]
    pub fn bridge_code(&self) -> i32 {
        match self {
            Self::InvalidParams { .. } | Self::Json(_) => CODE_INVALID_PARAMS,
            Self::UnsafeUrl { .. } | Self::UnsafeScript { .. } => CODE_REFUSED,
            Self::UnknownMethod { .. } => CODE_UNKNOWN_METHOD,
            _ => CODE_HANDLER_FAILED,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::ErrorKind;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_params("showAdvanceToast", "expected value at line 1 column 1");
        assert_eq!(
            err.to_string(),
            "Invalid params for showAdvanceToast: expected value at line 1 column 1"
        );
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("bridge name is empty");
        assert_eq!(err.to_string(), "Configuration error: bridge name is empty");
    }

    #[test]
    fn test_is_refusal() {
        assert!(Error::unsafe_url("javascript:alert(1)", "scheme").is_refusal());
        assert!(Error::unsafe_script("AdvanceGlobalTool").is_refusal());
        assert!(!Error::PageNotLoaded.is_refusal());
    }

    #[test]
    fn test_is_page_unavailable() {
        assert!(Error::PageNotLoaded.is_page_unavailable());
        assert!(Error::PageDestroyed.is_page_unavailable());
        assert!(!Error::config("x").is_page_unavailable());
    }

    #[test]
    fn test_bridge_codes() {
        assert_eq!(Error::invalid_params("m", "r").bridge_code(), CODE_INVALID_PARAMS);
        assert_eq!(Error::unsafe_url("u", "r").bridge_code(), CODE_REFUSED);
        assert_eq!(Error::unknown_method("m").bridge_code(), CODE_UNKNOWN_METHOD);
        assert_eq!(Error::handler("m", "boom").bridge_code(), CODE_HANDLER_FAILED);
        assert_ne!(CODE_OK, CODE_HANDLER_FAILED);
    }

    #[test]
    fn test_is_recoverable() {
        assert!(Error::timeout("evaluate", 15_000).is_recoverable());
        assert!(Error::retry_exhausted("wait for AdvanceGlobalTool", 3, 500).is_recoverable());
        assert!(!Error::config("test").is_recoverable());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = IoError::new(ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
        assert_eq!(err.bridge_code(), CODE_INVALID_PARAMS);
    }
}
