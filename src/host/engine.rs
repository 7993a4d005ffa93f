//! The platform seam.

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use serde_json::Value;

use crate::cache::CacheMode;
use crate::config::PageSettings;
use crate::error::Result;

// ============================================================================
// WebEngine
// ============================================================================

/// A concrete web view the host drives.
///
/// Implementations are owned by the UI thread and are never shared, so every
/// method takes `&mut self`. Only [`evaluate`](Self::evaluate),
/// [`load_url`](Self::load_url) and [`stop_loading`](Self::stop_loading) are
/// required; the rest default to no-ops for engines without the switch.
#[async_trait]
pub trait WebEngine: Send + 'static {
    /// Evaluates `script` in the page and returns its completion value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ScriptError`](crate::Error::ScriptError) if the
    /// script throws or the engine rejects it.
    async fn evaluate(&mut self, script: &str) -> Result<Value>;

    /// Starts loading `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot start the load.
    async fn load_url(&mut self, url: &str) -> Result<()>;

    /// Stops any in-flight load.
    async fn stop_loading(&mut self);

    /// Applies a settings profile.
    async fn apply_settings(&mut self, _settings: &PageSettings) {}

    /// Switches the engine's cache mode.
    async fn set_cache_mode(&mut self, _mode: CacheMode) {}

    /// Pauses or resumes timers and media.
    async fn set_paused(&mut self, _paused: bool) {}

    /// Enables or blocks automatic image loading.
    async fn set_images_enabled(&mut self, _enabled: bool) {}

    /// Drops the engine's in-memory and HTTP cache, history, form data and
    /// cookies.
    async fn clear_browsing_data(&mut self) {}
}
