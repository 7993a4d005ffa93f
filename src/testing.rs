//! Test doubles.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::cache::CacheMode;
use crate::config::PageSettings;
use crate::error::{Error, Result};
use crate::host::WebEngine;

// ============================================================================
// EngineLog
// ============================================================================

/// Shared record of the calls a [`RecordingEngine`] received.
#[derive(Debug, Clone, Default)]
pub(crate) struct EngineLog(Arc<Mutex<Vec<String>>>);

impl EngineLog {
    fn push(&self, entry: String) {
        self.0.lock().push(entry);
    }

    /// All entries in call order.
    pub(crate) fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    /// Scripts passed to `evaluate`, in call order.
    pub(crate) fn scripts(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|e| e.strip_prefix("eval ").map(str::to_string))
            .collect()
    }
}

// ============================================================================
// RecordingEngine
// ============================================================================

/// A [`WebEngine`] that records every call.
///
/// Scripts return `null` unless a canned response matches; scripts
/// containing a failure marker return [`Error::ScriptError`].
#[derive(Debug, Default)]
pub(crate) struct RecordingEngine {
    log: EngineLog,
    responses: Vec<(String, Value)>,
    fail_marker: Option<String>,
    fail_loads: bool,
    delay: Option<Duration>,
}

impl RecordingEngine {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn log(&self) -> EngineLog {
        self.log.clone()
    }

    /// Scripts containing `needle` evaluate to `value`.
    pub(crate) fn responding(mut self, needle: &str, value: Value) -> Self {
        self.responses.push((needle.to_string(), value));
        self
    }

    /// Scripts containing `marker` fail.
    pub(crate) fn failing_on(mut self, marker: &str) -> Self {
        self.fail_marker = Some(marker.to_string());
        self
    }

    /// Every `load_url` fails.
    pub(crate) fn failing_loads(mut self) -> Self {
        self.fail_loads = true;
        self
    }

    /// Every call sleeps for `delay` first.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl WebEngine for RecordingEngine {
    async fn evaluate(&mut self, script: &str) -> Result<Value> {
        self.pause().await;
        self.log.push(format!("eval {script}"));

        if let Some(marker) = &self.fail_marker
            && script.contains(marker.as_str())
        {
            return Err(Error::script_error(format!("script failed: {marker}")));
        }

        Ok(self
            .responses
            .iter()
            .find(|(needle, _)| script.contains(needle.as_str()))
            .map(|(_, value)| value.clone())
            .unwrap_or(Value::Null))
    }

    async fn load_url(&mut self, url: &str) -> Result<()> {
        self.pause().await;
        self.log.push(format!("load {url}"));
        if self.fail_loads {
            return Err(Error::script_error("load failed"));
        }
        Ok(())
    }

    async fn stop_loading(&mut self) {
        self.log.push("stop".to_string());
    }

    async fn apply_settings(&mut self, settings: &PageSettings) {
        self.log.push(format!("settings {}", settings.api_level));
    }

    async fn set_cache_mode(&mut self, mode: CacheMode) {
        self.log.push(format!("cache {mode}"));
    }

    async fn set_paused(&mut self, paused: bool) {
        self.log.push(format!("paused {paused}"));
    }

    async fn set_images_enabled(&mut self, enabled: bool) {
        self.log.push(format!("images {enabled}"));
    }

    async fn clear_browsing_data(&mut self) {
        self.log.push("clear-data".to_string());
    }
}
