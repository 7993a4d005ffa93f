//! Page host and UI thread.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`WebEngine`] | Trait a concrete web view implements |
//! | [`UiThread`] | Spawns the task that owns the engine |
//! | [`UiHandle`] | Cloneable handle posting work to that task |
//! | [`PageHost`] | Page state, URL, settings, cache mode, injected modules |
//!
//! # Threading
//!
//! The engine is touched only by the UI thread. Bridge handlers, background
//! cache workers and retry loops all go through [`UiHandle`], which waits
//! for each reply with the configured script timeout.

// ============================================================================
// Submodules
// ============================================================================

/// The platform seam.
pub mod engine;

/// Page state and operations.
pub mod page;

/// UI thread event loop.
pub mod ui;

// ============================================================================
// Re-exports
// ============================================================================

pub use engine::WebEngine;
pub use page::{PageHost, PageState};
pub use ui::{UiHandle, UiThread};
