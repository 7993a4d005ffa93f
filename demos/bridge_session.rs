//! A full bridge session against a console engine.
//!
//! Demonstrates:
//! - Starting a page host on a custom `WebEngine`
//! - Page client callbacks driving injection and cache strategy
//! - JS-to-native calls through the dispatcher
//! - Native-to-JS pushes and events for the embedding UI
//!
//! Usage:
//!   cargo run --example bridge_session
//!   cargo run --example bridge_session -- --debug
//!   cargo run --example bridge_session -- --offline

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;
use webview_bridge::{
    BridgeContext, CacheConfig, CacheMode, DeviceInfo, HostConfig, JsDialogKind, PageController, PageHost,
    PageSettings, RetryPolicy, StaticNetwork, WebEngine, wait_for_global,
};

// ============================================================================
// Constants
// ============================================================================

const PAGE_URL: &str = "file:///android_asset/advance_basic.html";

// ============================================================================
// ConsoleEngine
// ============================================================================

/// Prints every call and answers `typeof` probes with `true`.
#[derive(Debug, Default)]
struct ConsoleEngine;

#[async_trait]
impl WebEngine for ConsoleEngine {
    async fn evaluate(&mut self, script: &str) -> webview_bridge::Result<Value> {
        let first_line = script.lines().next().unwrap_or_default();
        println!("  [engine] eval {first_line}");
        Ok(if script.starts_with("typeof ") {
            Value::Bool(true)
        } else {
            Value::Null
        })
    }

    async fn load_url(&mut self, url: &str) -> webview_bridge::Result<()> {
        println!("  [engine] load {url}");
        Ok(())
    }

    async fn stop_loading(&mut self) {
        println!("  [engine] stop");
    }

    async fn apply_settings(&mut self, settings: &PageSettings) {
        println!("  [engine] settings for API level {}", settings.api_level);
    }

    async fn set_cache_mode(&mut self, mode: CacheMode) {
        println!("  [engine] cache mode {mode} ({})", mode.code());
    }

    async fn clear_browsing_data(&mut self) {
        println!("  [engine] clear cache, history, form data and cookies");
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().collect();
    let debug = args.iter().any(|a| a == "--debug");
    let offline = args.iter().any(|a| a == "--offline");

    let filter = if debug {
        "webview_bridge=debug"
    } else {
        "webview_bridge=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    if let Err(e) = run(offline).await {
        eprintln!("\n[ERROR] {e:#}");
        std::process::exit(1);
    }
}

async fn run(offline: bool) -> anyhow::Result<()> {
    println!("=== Bridge Session ===\n");

    let cache_root = tempfile::tempdir()?;
    let config = HostConfig::default().with_cache(CacheConfig::rooted(cache_root.path()));
    let host = PageHost::start(ConsoleEngine, &config).await?;
    let network = StaticNetwork::new(!offline);

    let device = DeviceInfo::new()
        .with("deviceId", "AdvanceDevice10001")
        .with("deviceModel", "Console")
        .with("appVersion", env!("CARGO_PKG_VERSION"));
    let (controller, mut events) =
        PageController::new(BridgeContext::new(host.clone(), &config), Arc::new(network));
    let controller = controller
        .with_device_info(device)
        .with_business_data(json!({"orderId": "AdvanceO20240501001", "orderAmount": "199.00"}));

    // ========================================================================
    // Navigation
    // ========================================================================

    println!("[1] Loading {PAGE_URL}");
    host.load_page(PAGE_URL).await?;
    controller.on_page_started(PAGE_URL).await?;
    wait_for_global(&host, &config.names.global_tool, &RetryPolicy::default()).await?;
    controller.on_page_finished(PAGE_URL).await?;
    println!("    state: {}, injected: {:?}\n", host.state(), host.injected().names());

    // ========================================================================
    // Page calls native
    // ========================================================================

    println!("[2] Page calls");
    let dispatcher = controller.dispatcher();
    for (method, params) in [
        ("showAdvanceToast", r#""hello from the page""#),
        ("getAdvanceDeviceInfo", r#""""#),
        ("checkAdvanceUrlSafety", r#""https://evil.example/""#),
        ("filterAdvanceXss", r#""<img src=x onerror=steal()>""#),
        ("deleteEverything", "{}"),
    ] {
        let reply = dispatcher.invoke(method, params).await;
        println!("    {method} -> {reply}");
    }

    println!("\n[3] Untrusted navigation");
    let intercepted = controller.should_override_url_loading("intent://scan#Intent;end");
    println!("    intercepted: {intercepted}");
    let cancelled = controller.on_js_dialog(JsDialogKind::Alert, PAGE_URL, "hi");
    println!("    alert cancelled: {cancelled}");

    println!("\n[4] Clear cache");
    controller.spawn_cache_clear().await?;

    // ========================================================================
    // Teardown
    // ========================================================================

    host.destroy().await;
    drop(dispatcher);
    drop(controller);

    println!("\n[5] Events for the UI");
    while let Some(event) = events.recv().await {
        println!("    {event:?}");
    }

    println!("\n=== Done ===");
    Ok(())
}
