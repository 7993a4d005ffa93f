//! The JS bridge.
//!
//! # Directions
//!
//! | Direction | Entry | Type |
//! |-----------|-------|------|
//! | JS → native | `<bridge>.<nativeEntry>(method, params)` | [`BridgeDispatcher`] |
//! | native → JS | `<jsEntry>(method, params)` | [`NativeToJs`] |
//!
//! Both directions carry a method name and a JSON string. Inbound strings
//! are stripped of dangerous patterns before routing; outbound payloads are
//! stripped per JSON string before serialization.
//!
//! [`BridgeContext`] bundles the per-page pieces a handler needs.

// ============================================================================
// Submodules
// ============================================================================

/// Native-to-JS caller.
pub mod caller;

/// Per-page context.
pub mod context;

/// JS-to-native dispatch.
pub mod dispatcher;

// ============================================================================
// Re-exports
// ============================================================================

pub use caller::{Delivery, NativeToJs};
pub use context::BridgeContext;
pub use dispatcher::{BridgeDispatcher, EMPTY_TOAST_PLACEHOLDER, NativeHandler};
