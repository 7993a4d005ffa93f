//! Reference wiring of one page to the bridge.
//!
//! [`PageController`] implements [`NativeHandler`] on top of a
//! [`BridgeContext`], and reacts to the page client callbacks a platform
//! web view reports:
//!
//! | Callback | Effect |
//! |----------|--------|
//! | [`on_page_started`](PageController::on_page_started) | URL check, cache strategy switch, global tool injection |
//! | [`on_page_finished`](PageController::on_page_finished) | business injection, network and security push |
//! | [`should_override_url_loading`](PageController::should_override_url_loading) | intercepts untrusted navigations |
//! | [`on_received_error`](PageController::on_received_error) | cache strategy switch |
//! | [`on_received_ssl_error`](PageController::on_received_ssl_error) | always cancels the connection |
//! | [`on_js_dialog`](PageController::on_js_dialog) | always cancels the dialog |
//!
//! Anything the embedding UI has to act on (toasts, native page requests,
//! unknown calls, finished cache clears) is published as a [`NativeEvent`].

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::bridge::{BridgeContext, BridgeDispatcher, NativeHandler};
use crate::cache::{CacheMode, ClearReport, NetworkProbe};
use crate::error::Result;
use crate::protocol::{DeviceInfo, SecuritySnapshot, UrlCheckReport, XssFilterReport};

// ============================================================================
// JsDialogKind
// ============================================================================

/// A script dialog the page tried to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsDialogKind {
    /// `alert()`.
    Alert,
    /// `confirm()`.
    Confirm,
    /// `prompt()`.
    Prompt,
}

impl fmt::Display for JsDialogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Alert => "alert",
            Self::Confirm => "confirm",
            Self::Prompt => "prompt",
        };
        f.write_str(name)
    }
}

// ============================================================================
// NativeEvent
// ============================================================================

/// Something the embedding UI should act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeEvent {
    /// Show a toast.
    Toast(String),
    /// Open a native page.
    OpenNativePage(String),
    /// The page called a method outside the whitelist.
    UnknownMethod {
        /// Method name as received (sanitized).
        method: String,
        /// Raw params (sanitized).
        params: String,
    },
    /// A navigation was refused.
    NavigationBlocked(String),
    /// A connection with a certificate error was cancelled.
    SslErrorRefused {
        /// URL of the failing request.
        url: String,
        /// Certificate error as reported by the engine.
        error: String,
    },
    /// A script dialog was cancelled without being shown.
    DialogBlocked {
        /// Dialog type.
        kind: JsDialogKind,
        /// Page that opened it.
        url: String,
        /// Dialog text.
        message: String,
    },
    /// A background cache clear finished.
    CacheCleared(ClearReport),
    /// A background cache clear failed.
    CacheClearFailed(String),
}

// ============================================================================
// PageController
// ============================================================================

/// Handles bridge calls and page client callbacks for one page.
#[derive(Clone)]
pub struct PageController {
    context: BridgeContext,
    network: Arc<dyn NetworkProbe>,
    events: mpsc::UnboundedSender<NativeEvent>,
    device_info: DeviceInfo,
    user_info: Option<Value>,
    business_data: Option<Value>,
}

impl fmt::Debug for PageController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageController")
            .field("page", &self.context.host().id())
            .field("device_info", &self.device_info)
            .finish_non_exhaustive()
    }
}

impl PageController {
    /// Creates a controller and the receiving end of its event channel.
    #[must_use]
    pub fn new(
        context: BridgeContext,
        network: Arc<dyn NetworkProbe>,
    ) -> (Self, mpsc::UnboundedReceiver<NativeEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let controller = Self {
            context,
            network,
            events,
            device_info: DeviceInfo::new(),
            user_info: None,
            business_data: None,
        };
        (controller, rx)
    }

    /// Sets the device information handed to the page.
    #[inline]
    #[must_use]
    pub fn with_device_info(mut self, info: DeviceInfo) -> Self {
        self.device_info = info;
        self
    }

    /// Sets the user information handed to the page.
    #[inline]
    #[must_use]
    pub fn with_user_info(mut self, info: Value) -> Self {
        self.user_info = Some(info);
        self
    }

    /// Sets the payload injected with the business module.
    #[inline]
    #[must_use]
    pub fn with_business_data(mut self, data: Value) -> Self {
        self.business_data = Some(data);
        self
    }

    /// Returns the bridge context.
    #[inline]
    #[must_use]
    pub fn context(&self) -> &BridgeContext {
        &self.context
    }

    /// Builds the dispatcher the page's bridge object forwards to.
    #[must_use]
    pub fn dispatcher(&self) -> BridgeDispatcher {
        BridgeDispatcher::new(
            self.context.names().js_methods.clone(),
            Arc::new(self.clone()),
        )
    }

    fn publish(&self, event: NativeEvent) {
        if self.events.send(event).is_err() {
            debug!(page = %self.context.host().id(), "Event receiver dropped");
        }
    }
}

// ============================================================================
// PageController - Page Client Callbacks
// ============================================================================

impl PageController {
    /// A navigation to `url` started.
    ///
    /// Returns `false` if the URL was refused and loading stopped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PageDestroyed`](crate::Error::PageDestroyed) or a
    /// UI thread timeout.
    pub async fn on_page_started(&self, url: &str) -> Result<bool> {
        let host = self.context.host();
        debug!(page = %host.id(), url, "Page started");

        if !self.context.security().check_url_safety(url) {
            host.block(url).await?;
            self.publish(NativeEvent::NavigationBlocked(url.to_string()));
            return Ok(false);
        }

        host.begin_navigation(url);
        host.switch_cache_strategy(self.network.as_ref()).await?;

        if let Err(e) = self.context.injector().inject_global_tool(host).await {
            warn!(page = %host.id(), url, error = %e, "Global tool not injected");
        }
        Ok(true)
    }

    /// `url` finished loading.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PageDestroyed`](crate::Error::PageDestroyed).
    pub async fn on_page_finished(&self, url: &str) -> Result<()> {
        let host = self.context.host();
        host.mark_loaded(url);
        if !host.is_ready() {
            debug!(page = %host.id(), url, state = %host.state(), "Finished page not ready");
            return Ok(());
        }
        info!(page = %host.id(), url, "Page finished");

        if let Some(data) = &self.business_data
            && let Err(e) = self.context.injector().inject_business(host, data).await
        {
            warn!(page = %host.id(), url, error = %e, "Business module not injected");
        }

        let available = self.network.is_available();
        let mode = host.cache_mode();
        self.context
            .caller()
            .update_ui(&json!({
                "networkAvailable": available,
                "cacheMode": mode.to_string(),
                "cacheDescription": mode.description(),
            }))
            .await;

        let snapshot = SecuritySnapshot::new(self.context.security().policy(), host.settings());
        self.context.caller().update_security_config(&snapshot).await;
        Ok(())
    }

    /// Returns `true` if the navigation to `url` must be intercepted.
    #[must_use]
    pub fn should_override_url_loading(&self, url: &str) -> bool {
        let intercept = !self.context.security().check_url_safety(url);
        if intercept {
            warn!(page = %self.context.host().id(), url, "Navigation intercepted");
            self.publish(NativeEvent::NavigationBlocked(url.to_string()));
        }
        intercept
    }

    /// Loading `url` failed. Re-picks the cache mode for the current
    /// connectivity so a reload can fall back to the cache.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PageDestroyed`](crate::Error::PageDestroyed) or a
    /// UI thread timeout.
    pub async fn on_received_error(&self, url: &str, description: &str) -> Result<CacheMode> {
        let host = self.context.host();
        error!(page = %host.id(), url, description, "Page load failed");
        host.switch_cache_strategy(self.network.as_ref()).await
    }

    /// The engine hit a certificate error loading `url`.
    ///
    /// Certificate errors are never bypassed. Returns `true`: the platform
    /// must cancel the connection.
    pub fn on_received_ssl_error(&self, url: &str, error: &str) -> bool {
        warn!(page = %self.context.host().id(), url, error, "SSL error, connection cancelled");
        self.publish(NativeEvent::SslErrorRefused {
            url: url.to_string(),
            error: error.to_string(),
        });
        true
    }

    /// The page at `url` opened a script dialog.
    ///
    /// Dialogs are never shown. Returns `true`: the callback consumed the
    /// dialog and the platform must cancel it.
    pub fn on_js_dialog(&self, kind: JsDialogKind, url: &str, message: &str) -> bool {
        warn!(page = %self.context.host().id(), %kind, url, message, "Script dialog cancelled");
        self.publish(NativeEvent::DialogBlocked {
            kind,
            url: url.to_string(),
            message: message.to_string(),
        });
        true
    }
}

// ============================================================================
// PageController - Cache Worker
// ============================================================================

impl PageController {
    /// Clears the engine's browsing data and the on-disk caches on a
    /// background task, then reports the outcome to the page and the event
    /// channel.
    ///
    /// A failed engine clear is logged and the disk pass still runs.
    pub fn spawn_cache_clear(&self) -> JoinHandle<()> {
        let controller = self.clone();
        tokio::spawn(async move {
            let host = controller.context.host();
            if let Err(e) = host.clear_browsing_data().await {
                warn!(page = %host.id(), error = %e, "Engine data not cleared");
            }

            let message = match controller.context.store().clear_all().await {
                Ok(report) => {
                    controller.publish(NativeEvent::CacheCleared(report));
                    "cache cleared".to_string()
                }
                Err(e) => {
                    warn!(page = %controller.context.host().id(), error = %e, "Cache clear failed");
                    controller.publish(NativeEvent::CacheClearFailed(e.to_string()));
                    format!("cache clear failed: {e}")
                }
            };
            controller.context.caller().notify_cache_state(&message).await;
        })
    }
}

// ============================================================================
// NativeHandler
// ============================================================================

#[async_trait]
impl NativeHandler for PageController {
    async fn on_show_toast(&self, message: String) -> Result<Option<Value>> {
        self.publish(NativeEvent::Toast(message));
        Ok(None)
    }

    async fn on_get_device_info(&self) -> Result<Option<Value>> {
        let info = self.device_info.clone().or_placeholder();
        self.context.caller().send_device_info(info.clone()).await;
        Ok(Some(serde_json::to_value(info)?))
    }

    async fn on_clear_cache(&self) -> Result<Option<Value>> {
        self.spawn_cache_clear();
        Ok(None)
    }

    async fn on_check_url_safety(&self, url: String) -> Result<Option<Value>> {
        let verdict = self.context.security().evaluate_url(&url);
        let report = UrlCheckReport {
            valid: verdict.is_safe(),
            message: if verdict.is_safe() {
                "URL is trusted".to_string()
            } else {
                format!("URL refused: {verdict}")
            },
            url,
        };
        self.context.caller().notify_url_check_result(&report).await;
        Ok(Some(serde_json::to_value(report)?))
    }

    async fn on_filter_xss(&self, content: String) -> Result<Option<Value>> {
        let security = self.context.security();
        let has_malicious = security.contains_malicious_keyword(&content);
        let filtered_content = security.filter_xss_content(&content);
        let report = XssFilterReport {
            message: if has_malicious {
                "malicious content filtered".to_string()
            } else {
                "content is clean".to_string()
            },
            original_content: content,
            filtered_content,
            has_malicious,
        };
        self.context.caller().notify_xss_filter_result(&report).await;
        Ok(Some(serde_json::to_value(report)?))
    }

    async fn on_get_user_info(&self) -> Result<Option<Value>> {
        let Some(info) = &self.user_info else {
            return Ok(None);
        };
        self.context.caller().return_user_info(info).await;
        Ok(Some(info.clone()))
    }

    async fn on_open_native_page(&self, page: String) -> Result<Option<Value>> {
        self.publish(NativeEvent::OpenNativePage(page));
        Ok(None)
    }

    async fn on_unknown_method(&self, method: &str, params: &str) {
        warn!(page = %self.context.host().id(), method, params, "Unknown method from page");
        self.publish(NativeEvent::UnknownMethod {
            method: method.to_string(),
            params: params.to_string(),
        });
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use crate::cache::StaticNetwork;
    use crate::config::{CacheConfig, HostConfig};
    use crate::error::{CODE_OK, CODE_UNKNOWN_METHOD};
    use crate::host::{PageHost, PageState};
    use crate::testing::{EngineLog, RecordingEngine};

    struct Fixture {
        controller: PageController,
        events: mpsc::UnboundedReceiver<NativeEvent>,
        log: EngineLog,
        network: StaticNetwork,
        _dir: tempfile::TempDir,
    }

    async fn fixture() -> Fixture {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = HostConfig::default().with_cache(CacheConfig::rooted(dir.path()));
        let engine = RecordingEngine::new();
        let log = engine.log();
        let host = PageHost::start(engine, &config).await.expect("host");
        let network = StaticNetwork::online();
        let (controller, events) =
            PageController::new(BridgeContext::new(host, &config), Arc::new(network.clone()));
        Fixture {
            controller,
            events,
            log,
            network,
            _dir: dir,
        }
    }

    async fn started(fixture: &Fixture, url: &str) {
        assert!(fixture.controller.on_page_started(url).await.expect("start"));
    }

    #[tokio::test]
    async fn test_page_started_injects_global_tool() {
        let f = fixture().await;
        started(&f, "https://github.com/").await;

        let host = f.controller.context().host();
        assert_eq!(host.state(), PageState::Loading);
        assert!(host.injected().contains("AdvanceGlobalTool"));
        assert!(f.log.entries().contains(&"cache default".to_string()));
    }

    #[tokio::test]
    async fn test_unsafe_page_start_is_blocked() {
        let mut f = fixture().await;
        let proceed = f
            .controller
            .on_page_started("https://evil.example/")
            .await
            .expect("start");

        assert!(!proceed);
        assert_eq!(f.controller.context().host().state(), PageState::Blocked);
        assert!(f.log.entries().contains(&"stop".to_string()));
        assert!(f.log.scripts().is_empty());
        assert_eq!(
            f.events.recv().await,
            Some(NativeEvent::NavigationBlocked("https://evil.example/".to_string()))
        );
    }

    #[tokio::test]
    async fn test_offline_start_uses_cache() {
        let f = fixture().await;
        f.network.set_available(false);
        started(&f, "https://github.com/").await;
        assert_eq!(f.controller.context().host().cache_mode(), CacheMode::CacheElseNetwork);
    }

    #[tokio::test]
    async fn test_page_finished_pushes_state() {
        let mut f = fixture().await;
        f.controller = f.controller.clone().with_business_data(json!({"orderId": "O1"}));
        started(&f, "https://github.com/").await;
        f.controller
            .on_page_finished("https://github.com/")
            .await
            .expect("finish");

        let host = f.controller.context().host();
        assert_eq!(host.state(), PageState::Loaded);
        assert!(host.injected().contains("AdvanceBusinessLogic"));

        let scripts = f.log.scripts();
        assert!(scripts.iter().any(|s| s.contains("updateAdvanceUi") && s.contains("networkAvailable")));
        assert!(scripts.iter().any(|s| s.contains("updateAdvanceSecurityConfig")));
    }

    #[tokio::test]
    async fn test_finished_after_block_does_nothing() {
        let f = fixture().await;
        f.controller
            .on_page_started("ftp://github.com/")
            .await
            .expect("start");
        f.controller
            .on_page_finished("ftp://github.com/")
            .await
            .expect("finish");
        assert_eq!(f.controller.context().host().state(), PageState::Blocked);
        assert!(f.log.scripts().is_empty());
    }

    #[tokio::test]
    async fn test_should_override() {
        let f = fixture().await;
        assert!(!f.controller.should_override_url_loading("https://docs.github.com/x"));
        assert!(!f.controller.should_override_url_loading("file:///android_asset/index.html"));
        assert!(f.controller.should_override_url_loading("file:///data/secret"));
        assert!(f.controller.should_override_url_loading("intent://scan"));
    }

    #[tokio::test]
    async fn test_received_error_switches_cache() {
        let f = fixture().await;
        started(&f, "https://github.com/").await;
        f.network.set_available(false);

        let mode = f
            .controller
            .on_received_error("https://github.com/", "net::ERR_INTERNET_DISCONNECTED")
            .await
            .expect("switch");
        assert_eq!(mode, CacheMode::CacheElseNetwork);
    }

    #[tokio::test]
    async fn test_toast_and_unknown_become_events() {
        let mut f = fixture().await;
        let dispatcher = f.controller.dispatcher();

        dispatcher.dispatch("showAdvanceToast", r#""hello""#).await;
        let unknown = dispatcher.dispatch("rm", r#""-rf""#).await;
        assert_eq!(unknown.code, CODE_UNKNOWN_METHOD);

        assert_eq!(f.events.recv().await, Some(NativeEvent::Toast("hello".to_string())));
        assert_eq!(
            f.events.recv().await,
            Some(NativeEvent::UnknownMethod {
                method: "rm".to_string(),
                params: r#""-rf""#.to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_device_info_reply() {
        let f = fixture().await;
        f.controller
            .context()
            .host()
            .load_page("https://github.com/")
            .await
            .expect("load");
        let controller = f
            .controller
            .clone()
            .with_device_info(DeviceInfo::new().with("deviceId", "D1"));

        let result = controller.dispatcher().dispatch("getAdvanceDeviceInfo", r#""""#).await;
        assert_eq!(result.code, CODE_OK);
        assert_eq!(result.data, Some(json!({"deviceId": "D1"})));
        assert!(f.log.scripts()[0].contains(r#"callAdvanceJs("getAdvanceDeviceInfo""#));
    }

    #[tokio::test]
    async fn test_url_check_reply() {
        let f = fixture().await;
        let result = f
            .controller
            .dispatcher()
            .dispatch("checkAdvanceUrlSafety", r#""https://evil.example/""#)
            .await;

        let report: UrlCheckReport = serde_json::from_value(result.data.expect("data")).expect("report");
        assert!(!report.valid);
        assert!(report.message.contains("not trusted"));
    }

    #[tokio::test]
    async fn test_xss_reply() {
        let f = fixture().await;
        let result = f
            .controller
            .dispatcher()
            .dispatch("filterAdvanceXss", r#""<script>alert(1)</script>hello""#)
            .await;

        let report: XssFilterReport = serde_json::from_value(result.data.expect("data")).expect("report");
        assert_eq!(report.original_content, "<script>alert(1)</script>hello");
        assert_eq!(report.filtered_content, "hello");
        assert!(report.has_malicious);
        assert_eq!(report.message, "malicious content filtered");
    }

    #[tokio::test]
    async fn test_xss_reply_clean_content() {
        let f = fixture().await;
        let result = f
            .controller
            .dispatcher()
            .dispatch("filterAdvanceXss", r#""<b>hi</b>""#)
            .await;

        let report: XssFilterReport = serde_json::from_value(result.data.expect("data")).expect("report");
        assert_eq!(report.original_content, "<b>hi</b>");
        assert_eq!(report.filtered_content, "&lt;b&gt;hi&lt;/b&gt;");
        assert!(!report.has_malicious);
    }

    #[tokio::test]
    async fn test_ssl_error_always_cancelled() {
        let mut f = fixture().await;
        assert!(f.controller.on_received_ssl_error("https://github.com/", "untrusted certificate"));
        assert_eq!(
            f.events.recv().await,
            Some(NativeEvent::SslErrorRefused {
                url: "https://github.com/".to_string(),
                error: "untrusted certificate".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_js_dialogs_always_cancelled() {
        let mut f = fixture().await;
        for kind in [JsDialogKind::Alert, JsDialogKind::Confirm, JsDialogKind::Prompt] {
            assert!(f.controller.on_js_dialog(kind, "https://github.com/", "really?"));
            match f.events.recv().await {
                Some(NativeEvent::DialogBlocked { kind: seen, message, .. }) => {
                    assert_eq!(seen, kind);
                    assert_eq!(message, "really?");
                }
                other => panic!("unexpected event: {other:?}"),
            }
        }
        assert!(f.log.scripts().is_empty());
    }

    #[tokio::test]
    async fn test_clear_cache_runs_in_background() {
        let mut f = fixture().await;
        let config = f.controller.context().store().config().clone();
        fs::create_dir_all(config.cookie_path()).expect("mkdir");
        fs::create_dir_all(config.app_cache_path()).expect("mkdir");
        f.controller
            .context()
            .host()
            .load_page("https://github.com/")
            .await
            .expect("load");

        let result = f.controller.dispatcher().dispatch("clearAdvanceCache", r#""""#).await;
        assert_eq!(result.code, CODE_OK);

        match f.events.recv().await {
            Some(NativeEvent::CacheCleared(report)) => assert_eq!(report.removed_dirs, 2),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(!config.cookie_path().exists());
        assert!(f.log.entries().contains(&"clear-data".to_string()));
    }

    #[tokio::test]
    async fn test_clear_cache_after_destroy_still_clears_disk() {
        let mut f = fixture().await;
        let config = f.controller.context().store().config().clone();
        fs::create_dir_all(config.cookie_path()).expect("mkdir");
        f.controller.context().host().destroy().await;

        f.controller.spawn_cache_clear().await.expect("join");
        assert!(matches!(f.events.recv().await, Some(NativeEvent::CacheCleared(_))));
        assert!(!config.cookie_path().exists());
        assert!(!f.log.entries().contains(&"clear-data".to_string()));
    }

    #[tokio::test]
    async fn test_clear_cache_notifies_page() {
        let f = fixture().await;
        f.controller
            .context()
            .host()
            .load_page("https://github.com/")
            .await
            .expect("load");

        f.controller.spawn_cache_clear().await.expect("join");
        assert!(
            f.log
                .scripts()
                .iter()
                .any(|s| s.contains("notifyAdvanceCacheState") && s.contains("cache cleared"))
        );
    }
}
