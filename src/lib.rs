//! WebView bridge - embedded web page host with a JS-to-native bridge.
//!
//! This library hosts a web page behind a [`WebEngine`] and connects script
//! running in that page to native handlers, with URL and XSS filtering on
//! every crossing.
//!
//! # Architecture
//!
//! - **Page side**: calls `<bridge>.<nativeEntry>(method, json)` and exposes
//!   `<jsEntry>(method, json)` for native calls
//! - **Native side**: a [`BridgeDispatcher`] routes inbound calls to a
//!   [`NativeHandler`]; [`NativeToJs`] sends outbound calls
//!
//! Key design principles:
//!
//! - The engine is owned by one UI task; everything else holds a [`UiHandle`]
//! - Each [`PageHost`] carries its own state, cache mode and injected modules
//! - Bridge calls never raise into the page; failures are result codes
//! - Untrusted strings are stripped before routing and before serialization
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use webview_bridge::{
//!     BridgeContext, HostConfig, PageController, PageHost, Result, StaticNetwork,
//! };
//!
//! async fn run(engine: impl webview_bridge::WebEngine) -> Result<()> {
//!     let config = HostConfig::default();
//!     let host = PageHost::start(engine, &config).await?;
//!     let (controller, mut events) = PageController::new(
//!         BridgeContext::new(host.clone(), &config),
//!         Arc::new(StaticNetwork::online()),
//!     );
//!
//!     host.load_page("file:///android_asset/basic.html").await?;
//!     let reply = controller
//!         .dispatcher()
//!         .invoke("showAdvanceToast", r#""hello""#)
//!         .await;
//!     println!("{reply} {:?}", events.recv().await);
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`bridge`] | Dispatcher, native-to-JS caller, bridge context |
//! | [`cache`] | Cache modes, network probe, on-disk cache maintenance |
//! | [`config`] | Host configuration, names, security policy, page settings |
//! | [`controller`] | Reference handler and page client callbacks |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`host`] | Engine trait, UI thread, page host |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`inject`] | Injected module scripts and registry |
//! | [`protocol`] | Bridge calls, results and payloads |
//! | [`retry`] | Bounded retry with backoff |
//! | [`security`] | URL, XSS and injection checks |

// ============================================================================
// Modules
// ============================================================================

/// JS bridge in both directions.
pub mod bridge;

/// Cache strategy and maintenance.
pub mod cache;

/// Configuration.
///
/// Use [`HostConfig::default()`] or [`HostConfig::from_json_str`].
pub mod config;

/// Reference page controller.
pub mod controller;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Page host and UI thread.
pub mod host;

/// Type-safe identifiers.
pub mod identifiers;

/// Script injection.
pub mod inject;

/// Bridge message types.
pub mod protocol;

/// Bounded retry.
pub mod retry;

/// Security filter.
pub mod security;

#[cfg(test)]
mod testing;

// ============================================================================
// Re-exports
// ============================================================================

// Bridge types
pub use bridge::{BridgeContext, BridgeDispatcher, Delivery, NativeHandler, NativeToJs};

// Cache types
pub use cache::{CacheManager, CacheMode, CacheStore, ClearReport, NetworkProbe, StaticNetwork};

// Configuration types
pub use config::{
    BridgeNames, CacheConfig, HostConfig, JsMethodNames, NativeMethodNames, PageSettings,
    SecurityPolicy,
};

// Controller types
pub use controller::{JsDialogKind, NativeEvent, PageController};

// Error types
pub use error::{Error, Result};

// Host types
pub use host::{PageHost, PageState, UiHandle, WebEngine};

// Identifier types
pub use identifiers::{CallId, PageId};

// Injection types
pub use inject::{InjectedModule, InjectionManager, InjectionPoint};

// Protocol types
pub use protocol::{BridgeCall, BridgeResult, DeviceInfo, JsMethod, NativeMethod};

// Retry types
pub use retry::{RetryPolicy, retry_async, wait_for_global};

// Security types
pub use security::{SecurityFilter, UrlVerdict};
