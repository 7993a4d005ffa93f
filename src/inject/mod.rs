//! Script injection.
//!
//! Two modules are injected into every page:
//!
//! | Module | Point | Contents |
//! |--------|-------|----------|
//! | global tool | [`InjectionPoint::PageStart`] | `showToast`, `log`, `setStorage`, `getStorage`, `clearCache` |
//! | business logic | [`InjectionPoint::PageFinish`] | `businessData`, `handleBusinessData`, `getDeviceInfo` |
//!
//! Each script passes the injection safety check before it is evaluated.
//! The per-page [`InjectionRegistry`] is cleared whenever the page
//! navigates or is destroyed.

// ============================================================================
// Submodules
// ============================================================================

/// Injection manager.
pub mod manager;

/// Per-page registry.
pub mod registry;

/// Script templates.
pub mod scripts;

// ============================================================================
// Re-exports
// ============================================================================

pub use manager::InjectionManager;
pub use registry::{InjectedModule, InjectionPoint, InjectionRegistry};
pub use scripts::{business_script, global_probe_script, global_tool_script};
