//! Host configuration.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`HostConfig`] | Aggregate configuration, builder and JSON loading |
//! | [`BridgeNames`] | Bridge, entry point, module and method names |
//! | [`SecurityPolicy`] | URL allow-lists and script denylists |
//! | [`CacheConfig`] | Cache directories, size ceiling, expiry |
//! | [`PageSettings`] | Hardened settings profile per API level |

// ============================================================================
// Submodules
// ============================================================================

/// Cache directory layout and limits.
pub mod cache;

/// Aggregate host configuration.
pub mod host;

/// Script-facing names.
pub mod names;

/// Security allow-lists and denylists.
pub mod policy;

/// Page settings profile.
pub mod settings;

// ============================================================================
// Re-exports
// ============================================================================

pub use cache::CacheConfig;
pub use host::HostConfig;
pub use names::{BridgeNames, JsMethodNames, NativeMethodNames};
pub use policy::SecurityPolicy;
pub use settings::{ApiLevel, MixedContentMode, PageSettings};
