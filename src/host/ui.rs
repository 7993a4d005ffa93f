//! UI thread and its handle.
//!
//! The engine is owned by one tokio task. Every other task reaches it by
//! sending a command with a oneshot reply channel, so engine calls are
//! serialized in arrival order no matter which task issued them.
//!
//! # Event Loop
//!
//! | Command | Engine call | Reply |
//! |---------|-------------|-------|
//! | `Evaluate` | [`WebEngine::evaluate`] | script result |
//! | `Load` | [`WebEngine::load_url`] | load started |
//! | `Stop` | [`WebEngine::stop_loading`] | `()` |
//! | `ApplySettings` | [`WebEngine::apply_settings`] | `()` |
//! | `SetCacheMode` | [`WebEngine::set_cache_mode`] | `()` |
//! | `SetPaused` | [`WebEngine::set_paused`] | `()` |
//! | `SetImagesEnabled` | [`WebEngine::set_images_enabled`] | `()` |
//! | `ClearData` | [`WebEngine::clear_browsing_data`] | `()` |
//! | `Shutdown` | [`WebEngine::stop_loading`], then exit | `()` |

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{debug, trace};

use crate::cache::CacheMode;
use crate::config::PageSettings;
use crate::error::{Error, Result};

use super::engine::WebEngine;

// ============================================================================
// UiCommand
// ============================================================================

/// Work posted to the UI thread.
enum UiCommand {
    /// Evaluate a script.
    Evaluate {
        script: String,
        reply: oneshot::Sender<Result<Value>>,
    },
    /// Start loading a URL.
    Load {
        url: String,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Stop loading.
    Stop { reply: oneshot::Sender<()> },
    /// Apply a settings profile.
    ApplySettings {
        settings: Box<PageSettings>,
        reply: oneshot::Sender<()>,
    },
    /// Switch cache mode.
    SetCacheMode {
        mode: CacheMode,
        reply: oneshot::Sender<()>,
    },
    /// Pause or resume.
    SetPaused {
        paused: bool,
        reply: oneshot::Sender<()>,
    },
    /// Enable or block image loading.
    SetImagesEnabled {
        enabled: bool,
        reply: oneshot::Sender<()>,
    },
    /// Clear cache, history, form data and cookies.
    ClearData { reply: oneshot::Sender<()> },
    /// Stop and exit the loop.
    Shutdown { reply: oneshot::Sender<()> },
}

// ============================================================================
// UiThread
// ============================================================================

/// Spawns the task that owns a [`WebEngine`].
pub struct UiThread;

impl UiThread {
    /// Moves `engine` onto a new task and returns a handle to it.
    ///
    /// Each reply is awaited for at most `reply_timeout`.
    #[must_use]
    pub fn spawn<E: WebEngine>(engine: E, reply_timeout: Duration) -> UiHandle {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        tokio::spawn(Self::run_event_loop(engine, command_rx));
        debug!(timeout_ms = reply_timeout.as_millis() as u64, "UI thread started");
        UiHandle {
            command_tx,
            reply_timeout,
        }
    }

    async fn run_event_loop<E: WebEngine>(
        mut engine: E,
        mut command_rx: mpsc::UnboundedReceiver<UiCommand>,
    ) {
        while let Some(command) = command_rx.recv().await {
            match command {
                UiCommand::Evaluate { script, reply } => {
                    trace!(script_len = script.len(), "Evaluating script");
                    let _ = reply.send(engine.evaluate(&script).await);
                }

                UiCommand::Load { url, reply } => {
                    debug!(url = %url, "Loading URL");
                    let _ = reply.send(engine.load_url(&url).await);
                }

                UiCommand::Stop { reply } => {
                    engine.stop_loading().await;
                    let _ = reply.send(());
                }

                UiCommand::ApplySettings { settings, reply } => {
                    engine.apply_settings(&settings).await;
                    let _ = reply.send(());
                }

                UiCommand::SetCacheMode { mode, reply } => {
                    engine.set_cache_mode(mode).await;
                    let _ = reply.send(());
                }

                UiCommand::SetPaused { paused, reply } => {
                    engine.set_paused(paused).await;
                    let _ = reply.send(());
                }

                UiCommand::SetImagesEnabled { enabled, reply } => {
                    engine.set_images_enabled(enabled).await;
                    let _ = reply.send(());
                }

                UiCommand::ClearData { reply } => {
                    debug!("Clearing browsing data");
                    engine.clear_browsing_data().await;
                    let _ = reply.send(());
                }

                UiCommand::Shutdown { reply } => {
                    debug!("Shutdown command received");
                    engine.stop_loading().await;
                    let _ = reply.send(());
                    break;
                }
            }
        }

        debug!("UI thread terminated");
    }
}

// ============================================================================
// UiHandle
// ============================================================================

/// Cloneable sender side of the UI thread.
#[derive(Debug, Clone)]
pub struct UiHandle {
    command_tx: mpsc::UnboundedSender<UiCommand>,
    reply_timeout: Duration,
}

impl UiHandle {
    /// Evaluates `script` on the UI thread.
    ///
    /// # Errors
    ///
    /// - [`Error::PageDestroyed`] if the UI thread has exited
    /// - [`Error::Timeout`] if no reply arrives in time
    /// - Any error the engine returns
    pub async fn evaluate(&self, script: impl Into<String>) -> Result<Value> {
        let script = script.into();
        self.request("evaluate script", |reply| UiCommand::Evaluate { script, reply })
            .await?
    }

    /// Starts loading `url` on the UI thread.
    ///
    /// # Errors
    ///
    /// Same as [`evaluate`](Self::evaluate).
    pub async fn load_url(&self, url: impl Into<String>) -> Result<()> {
        let url = url.into();
        self.request("load url", |reply| UiCommand::Load { url, reply })
            .await?
    }

    /// Stops loading.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PageDestroyed`] or [`Error::Timeout`].
    pub async fn stop_loading(&self) -> Result<()> {
        self.request("stop loading", |reply| UiCommand::Stop { reply })
            .await
    }

    /// Applies `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PageDestroyed`] or [`Error::Timeout`].
    pub async fn apply_settings(&self, settings: PageSettings) -> Result<()> {
        let settings = Box::new(settings);
        self.request("apply settings", |reply| UiCommand::ApplySettings { settings, reply })
            .await
    }

    /// Switches the engine cache mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PageDestroyed`] or [`Error::Timeout`].
    pub async fn set_cache_mode(&self, mode: CacheMode) -> Result<()> {
        self.request("set cache mode", |reply| UiCommand::SetCacheMode { mode, reply })
            .await
    }

    /// Pauses or resumes the engine.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PageDestroyed`] or [`Error::Timeout`].
    pub async fn set_paused(&self, paused: bool) -> Result<()> {
        self.request("set paused", |reply| UiCommand::SetPaused { paused, reply })
            .await
    }

    /// Enables or blocks automatic image loading.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PageDestroyed`] or [`Error::Timeout`].
    pub async fn set_images_enabled(&self, enabled: bool) -> Result<()> {
        self.request("set images enabled", |reply| UiCommand::SetImagesEnabled { enabled, reply })
            .await
    }

    /// Clears the engine's cache, history, form data and cookies.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PageDestroyed`] or [`Error::Timeout`].
    pub async fn clear_browsing_data(&self) -> Result<()> {
        self.request("clear browsing data", |reply| UiCommand::ClearData { reply })
            .await
    }

    /// Stops the engine and ends the UI thread.
    ///
    /// Shutting down an already closed thread is a no-op.
    pub async fn shutdown(&self) {
        if self.is_closed() {
            return;
        }
        if let Err(e) = self.request("shutdown", |reply| UiCommand::Shutdown { reply }).await {
            debug!(error = %e, "UI thread already gone at shutdown");
        }
    }

    /// Returns `true` once the UI thread has exited.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.command_tx.is_closed()
    }

    /// Posts a command and waits for its reply.
    async fn request<T>(
        &self,
        operation: &str,
        build: impl FnOnce(oneshot::Sender<T>) -> UiCommand,
    ) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(build(reply_tx))
            .map_err(|_| Error::PageDestroyed)?;

        match timeout(self.reply_timeout, reply_rx).await {
            Ok(reply) => Ok(reply?),
            Err(_) => Err(Error::timeout(
                operation,
                self.reply_timeout.as_millis() as u64,
            )),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
