//! Page host: one page, its state and its UI thread.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::{CacheManager, CacheMode, NetworkProbe};
use crate::config::{HostConfig, PageSettings};
use crate::error::{Error, Result};
use crate::identifiers::PageId;
use crate::inject::InjectionRegistry;
use crate::security::SecurityFilter;

use super::engine::WebEngine;
use super::ui::{UiHandle, UiThread};

// ============================================================================
// PageState
// ============================================================================

/// Lifecycle state of a page host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    /// Nothing loaded yet.
    Idle,
    /// A navigation is in progress.
    Loading,
    /// The current page finished loading.
    Loaded,
    /// Timers and media are paused.
    Paused,
    /// The last navigation was refused.
    Blocked,
    /// Torn down; every operation fails.
    Destroyed,
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::Paused => "paused",
            Self::Blocked => "blocked",
            Self::Destroyed => "destroyed",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Types
// ============================================================================

#[derive(Debug)]
struct PageStatus {
    state: PageState,
    url: Option<String>,
    /// State to restore on resume. Set only while paused.
    paused_from: Option<PageState>,
    images_enabled: bool,
}

/// Internal shared state for a page host.
pub(crate) struct PageInner {
    id: PageId,
    ui: UiHandle,
    status: RwLock<PageStatus>,
    settings: PageSettings,
    security: SecurityFilter,
    cache: CacheManager,
    injected: InjectionRegistry,
}

// ============================================================================
// PageHost
// ============================================================================

/// A handle to a hosted page.
///
/// Cloning is cheap; all clones drive the same page.
///
/// # Example
///
/// ```ignore
/// let host = PageHost::start(engine, &HostConfig::default()).await?;
/// host.load_page("https://github.com/").await?;
/// let title = host.evaluate("document.title").await?;
/// host.destroy().await;
/// ```
#[derive(Clone)]
pub struct PageHost {
    pub(crate) inner: Arc<PageInner>,
}

impl fmt::Debug for PageHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.inner.status.read();
        f.debug_struct("PageHost")
            .field("id", &self.inner.id)
            .field("state", &status.state)
            .field("url", &status.url)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// PageHost - Constructor
// ============================================================================

impl PageHost {
    /// Validates `config`, moves `engine` onto a UI thread and applies the
    /// hardened settings profile.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if `config` is invalid
    /// - [`Error::Timeout`] if the engine does not accept the settings in time
    pub async fn start<E: WebEngine>(engine: E, config: &HostConfig) -> Result<Self> {
        config.validate()?;

        let ui = UiThread::spawn(engine, config.script_timeout());
        let settings = config.page_settings();
        ui.apply_settings(settings.clone()).await?;

        let host = Self {
            inner: Arc::new(PageInner {
                id: PageId::generate(),
                ui,
                status: RwLock::new(PageStatus {
                    state: PageState::Idle,
                    url: None,
                    paused_from: None,
                    images_enabled: settings.load_images_automatically,
                }),
                settings,
                security: SecurityFilter::new(config.security.clone()),
                cache: CacheManager::default(),
                injected: InjectionRegistry::default(),
            }),
        };

        info!(
            page = %host.inner.id,
            api_level = host.inner.settings.api_level,
            "Page host started"
        );
        Ok(host)
    }
}

// ============================================================================
// PageHost - Accessors
// ============================================================================

impl PageHost {
    /// Returns the page ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> PageId {
        self.inner.id
    }

    /// Returns the lifecycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> PageState {
        self.inner.status.read().state
    }

    /// Returns the URL of the current page, if any.
    #[inline]
    #[must_use]
    pub fn current_url(&self) -> Option<String> {
        self.inner.status.read().url.clone()
    }

    /// Returns `true` if the page has a URL scripts can run against.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        let status = self.inner.status.read();
        status.url.is_some()
            && matches!(
                status.state,
                PageState::Loading | PageState::Loaded | PageState::Paused
            )
    }

    /// Returns `true` if images load automatically.
    #[inline]
    #[must_use]
    pub fn images_enabled(&self) -> bool {
        self.inner.status.read().images_enabled
    }

    /// Returns `true` once [`destroy`](Self::destroy) has run.
    #[inline]
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.state() == PageState::Destroyed
    }

    /// Returns the applied settings profile.
    #[inline]
    #[must_use]
    pub fn settings(&self) -> &PageSettings {
        &self.inner.settings
    }

    /// Returns the security filter.
    #[inline]
    #[must_use]
    pub fn security(&self) -> &SecurityFilter {
        &self.inner.security
    }

    /// Returns the cache mode holder.
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &CacheManager {
        &self.inner.cache
    }

    /// Returns the active cache mode.
    #[inline]
    #[must_use]
    pub fn cache_mode(&self) -> CacheMode {
        self.inner.cache.mode()
    }

    /// Returns the modules injected into the current page.
    #[inline]
    #[must_use]
    pub fn injected(&self) -> &InjectionRegistry {
        &self.inner.injected
    }
}

// ============================================================================
// PageHost - Navigation
// ============================================================================

impl PageHost {
    /// Loads `url` after checking it against the security policy.
    ///
    /// # Errors
    ///
    /// - [`Error::PageDestroyed`] after [`destroy`](Self::destroy)
    /// - [`Error::UnsafeUrl`] if the policy refuses `url`
    /// - Any error the engine returns while starting the load
    pub async fn load_page(&self, url: &str) -> Result<()> {
        self.ensure_alive()?;

        let verdict = self.inner.security.evaluate_url(url);
        if !verdict.is_safe() {
            return Err(Error::unsafe_url(url, verdict.to_string()));
        }

        self.begin_navigation(url);
        if let Err(e) = self.inner.ui.load_url(url).await {
            warn!(page = %self.inner.id, url, error = %e, "Load failed to start");
            self.set_status(PageState::Idle, None);
            return Err(e);
        }
        Ok(())
    }

    /// Records that a navigation to `url` started.
    ///
    /// Injected modules belong to the previous document and are forgotten.
    pub fn begin_navigation(&self, url: &str) {
        if self.is_destroyed() {
            return;
        }
        let dropped = self.inner.injected.clear();
        self.set_status(PageState::Loading, Some(url.to_string()));
        debug!(page = %self.inner.id, url, dropped_modules = dropped, "Navigation started");
    }

    /// Records that `url` finished loading.
    pub fn mark_loaded(&self, url: &str) {
        let mut status = self.inner.status.write();
        match status.state {
            PageState::Destroyed | PageState::Blocked => return,
            PageState::Paused => {
                if status.paused_from == Some(PageState::Blocked) {
                    return;
                }
                status.paused_from = Some(PageState::Loaded);
            }
            _ => status.state = PageState::Loaded,
        }
        status.url = Some(url.to_string());
        debug!(page = %self.inner.id, url, "Page loaded");
    }

    /// Refuses the current navigation: stops loading and marks the page
    /// blocked.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PageDestroyed`] or [`Error::Timeout`].
    pub async fn block(&self, url: &str) -> Result<()> {
        self.ensure_alive()?;
        self.inner.injected.clear();
        self.set_status(PageState::Blocked, None);
        warn!(page = %self.inner.id, url, "Navigation blocked");
        self.inner.ui.stop_loading().await
    }

    /// Stops any in-flight load.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PageDestroyed`] or [`Error::Timeout`].
    pub async fn stop_loading(&self) -> Result<()> {
        self.ensure_alive()?;
        self.inner.ui.stop_loading().await
    }
}

// ============================================================================
// PageHost - Scripting
// ============================================================================

impl PageHost {
    /// Evaluates `script` in the current page on the UI thread.
    ///
    /// # Errors
    ///
    /// - [`Error::PageDestroyed`] after [`destroy`](Self::destroy)
    /// - [`Error::PageNotLoaded`] if no page is loaded
    /// - [`Error::Timeout`] or [`Error::ScriptError`] from the engine
    pub async fn evaluate(&self, script: &str) -> Result<Value> {
        self.ensure_alive()?;
        if !self.is_ready() {
            return Err(Error::PageNotLoaded);
        }
        self.inner.ui.evaluate(script).await
    }
}

// ============================================================================
// PageHost - Cache
// ============================================================================

impl PageHost {
    /// Sets the cache mode on the host and the engine.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PageDestroyed`] or [`Error::Timeout`].
    pub async fn set_cache_mode(&self, mode: CacheMode) -> Result<()> {
        self.ensure_alive()?;
        self.inner.cache.set_mode(mode);
        self.inner.ui.set_cache_mode(mode).await
    }

    /// Picks the cache mode for current connectivity and applies it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PageDestroyed`] or [`Error::Timeout`].
    pub async fn switch_cache_strategy(&self, probe: &dyn NetworkProbe) -> Result<CacheMode> {
        self.ensure_alive()?;
        let mode = self.inner.cache.switch_strategy(probe);
        self.inner.ui.set_cache_mode(mode).await?;
        Ok(mode)
    }

    /// Drops the engine's cache, history, form data and cookies.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PageDestroyed`] or [`Error::Timeout`].
    pub async fn clear_browsing_data(&self) -> Result<()> {
        self.ensure_alive()?;
        self.inner.ui.clear_browsing_data().await?;
        debug!(page = %self.inner.id, "Browsing data cleared");
        Ok(())
    }

    /// Enables or blocks automatic image loading.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PageDestroyed`] or [`Error::Timeout`].
    pub async fn toggle_image_loading(&self, enabled: bool) -> Result<()> {
        self.ensure_alive()?;
        self.inner.status.write().images_enabled = enabled;
        debug!(page = %self.inner.id, enabled, "Image loading toggled");
        self.inner.ui.set_images_enabled(enabled).await
    }
}

// ============================================================================
// PageHost - Lifecycle
// ============================================================================

impl PageHost {
    /// Pauses timers and media.
    ///
    /// Only a loading or loaded page can pause. In any other state this is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PageDestroyed`] or [`Error::Timeout`].
    pub async fn pause(&self) -> Result<()> {
        self.ensure_alive()?;
        {
            let mut status = self.inner.status.write();
            if !matches!(status.state, PageState::Loading | PageState::Loaded) {
                return Ok(());
            }
            let current = status.state;
            status.paused_from = Some(current);
            status.state = PageState::Paused;
        }
        debug!(page = %self.inner.id, "Page paused");
        self.inner.ui.set_paused(true).await
    }

    /// Resumes after [`pause`](Self::pause), restoring the state the page
    /// had when it paused.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PageDestroyed`] or [`Error::Timeout`].
    pub async fn resume(&self) -> Result<()> {
        self.ensure_alive()?;
        {
            let mut status = self.inner.status.write();
            if status.state != PageState::Paused {
                return Ok(());
            }
            status.state = status.paused_from.take().unwrap_or(PageState::Idle);
        }
        debug!(page = %self.inner.id, "Page resumed");
        self.inner.ui.set_paused(false).await
    }

    /// Stops loading, forgets injected modules and ends the UI thread.
    ///
    /// Idempotent.
    pub async fn destroy(&self) {
        {
            let mut status = self.inner.status.write();
            if status.state == PageState::Destroyed {
                return;
            }
            status.state = PageState::Destroyed;
            status.url = None;
            status.paused_from = None;
        }
        self.inner.injected.clear();
        self.inner.ui.shutdown().await;
        info!(page = %self.inner.id, "Page host destroyed");
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.is_destroyed() {
            Err(Error::PageDestroyed)
        } else {
            Ok(())
        }
    }

    /// Moves to `state`. A paused page stays paused and resumes into
    /// `state` instead.
    fn set_status(&self, state: PageState, url: Option<String>) {
        let mut status = self.inner.status.write();
        match status.state {
            PageState::Destroyed => return,
            PageState::Paused => status.paused_from = Some(state),
            _ => status.state = state,
        }
        status.url = url;
    }
}

// ============================================================================
// Tests
// ============================================================================
