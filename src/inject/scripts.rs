//! Script templates for injected modules.
//!
//! Names are interpolated as identifiers (they are validated as such by
//! [`BridgeNames::validate`]); everything else goes in as a JSON literal.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;

use crate::config::BridgeNames;
use crate::security::strip_dangerous_patterns;

// ============================================================================
// Helper Functions
// ============================================================================

/// Encodes `s` as a JS string literal.
pub(crate) fn json_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
}

/// Strips dangerous patterns from every string inside `value`.
#[must_use]
pub fn sanitize_value(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(strip_dangerous_patterns(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_value).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (strip_dangerous_patterns(&k), sanitize_value(v)))
                .collect(),
        ),
        other => other,
    }
}

// ============================================================================
// Templates
// ============================================================================

/// Global utilities module, injected when a page starts loading.
///
/// Registers `showToast`, `log`, `setStorage`, `getStorage` and
/// `clearCache` on `window.<global_tool>`.
#[must_use]
pub fn global_tool_script(names: &BridgeNames) -> String {
    let tool = &names.global_tool;
    format!(
        r#"window.{tool} = window.{tool} || {{}};
(function(bridgeName, resultId) {{
    const bridge = window[bridgeName];
    const call = function(method, payload) {{
        if (!bridge) {{
            console.error("{tool}: bridge " + bridgeName + " missing");
            return null;
        }}
        return bridge.{entry}(method, JSON.stringify(payload));
    }};

    this.showToast = function(message) {{
        try {{
            return call({toast}, message);
        }} catch (e) {{
            console.error("{tool}.showToast: " + e.message);
        }}
    }};

    this.log = function(content) {{
        console.log("{tool}: " + content);
        const target = document.getElementById(resultId);
        if (target) {{
            target.appendChild(document.createTextNode("{tool}: " + content));
            target.appendChild(document.createElement("br"));
        }}
    }};

    this.setStorage = function(key, value) {{
        try {{
            localStorage.setItem(key, value);
            this.log("stored " + key);
        }} catch (e) {{
            this.log("store failed: " + e.message);
        }}
    }};

    this.getStorage = function(key) {{
        try {{
            return localStorage.getItem(key);
        }} catch (e) {{
            this.log("read failed: " + e.message);
            return null;
        }}
    }};

    this.clearCache = function() {{
        try {{
            const result = call({clear}, "");
            this.log("cache clear requested");
            return result;
        }} catch (e) {{
            console.error("{tool}.clearCache: " + e.message);
        }}
    }};
}}).call(window.{tool}, {bridge}, {result});
window.{tool}.log("{tool} ready");"#,
        tool = tool,
        entry = names.native_entry,
        toast = json_string(&names.js_methods.show_toast),
        clear = json_string(&names.js_methods.clear_cache),
        bridge = json_string(&names.bridge),
        result = json_string(&names.result_element),
    )
}

/// Business module, injected once a page has finished loading.
///
/// Embeds `payload` as `businessData` and registers `handleBusinessData`
/// and `getDeviceInfo`. String values in `payload` are stripped of
/// dangerous patterns first.
#[must_use]
pub fn business_script(names: &BridgeNames, payload: &Value) -> String {
    let data = serde_json::to_string(&sanitize_value(payload.clone()))
        .unwrap_or_else(|_| "{}".to_string());
    let module = &names.business_logic;
    format!(
        r#"window.{module} = window.{module} || {{}};
(function(bridgeName, toolName, resultId) {{
    const bridge = window[bridgeName];
    const tool = window[toolName];

    this.businessData = {data} || {{}};

    this.handleBusinessData = function() {{
        const target = document.getElementById(resultId);
        for (const key in this.businessData) {{
            if (Object.prototype.hasOwnProperty.call(this.businessData, key) && target) {{
                target.appendChild(document.createTextNode(key + ": " + this.businessData[key]));
                target.appendChild(document.createElement("br"));
            }}
        }}
        if (tool) {{ tool.log("business data handled"); }}
    }};

    this.getDeviceInfo = function() {{
        if (!bridge) {{ return null; }}
        try {{
            const result = bridge.{entry}({device}, JSON.stringify(""));
            if (tool) {{ tool.log("device info requested"); }}
            return result;
        }} catch (e) {{
            console.error("{module}.getDeviceInfo: " + e.message);
        }}
    }};
}}).call(window.{module}, {bridge}, {tool}, {result});
window.{module}.handleBusinessData();"#,
        module = module,
        data = data,
        entry = names.native_entry,
        device = json_string(&names.js_methods.get_device_info),
        bridge = json_string(&names.bridge),
        tool = json_string(&names.global_tool),
        result = json_string(&names.result_element),
    )
}

/// Expression that is `true` once `window.<name>` exists.
#[must_use]
pub fn global_probe_script(name: &str) -> String {
    format!("typeof window[{}] !== \"undefined\"", json_string(name))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::security::SecurityFilter;

    #[test]
    fn test_global_tool_uses_configured_names() {
        let script = global_tool_script(&BridgeNames::default());
        assert!(script.starts_with("window.AdvanceGlobalTool = window.AdvanceGlobalTool || {};"));
        assert!(script.contains("bridge.callAdvanceAndroid(method, JSON.stringify(payload))"));
        assert!(script.contains(r#"call("showAdvanceToast", message)"#));
        assert!(script.contains(r#"call("clearAdvanceCache", "")"#));
        assert!(script.contains(r#"}).call(window.AdvanceGlobalTool, "AdvanceAndroidJsBridge", "advanceInjectResult");"#));
    }

    #[test]
    fn test_global_tool_passes_injection_check() {
        let filter = SecurityFilter::default();
        assert!(filter.check_js_inject_safety(&global_tool_script(&BridgeNames::default())));
    }

    #[test]
    fn test_business_embeds_payload() {
        let script = business_script(&BridgeNames::default(), &json!({"user": "demo", "level": 3}));
        assert!(script.contains(r#"this.businessData = {"level":3,"user":"demo"} || {};"#));
        assert!(script.contains(r#"bridge.callAdvanceAndroid("getAdvanceDeviceInfo", JSON.stringify(""))"#));
        assert!(script.ends_with("window.AdvanceBusinessLogic.handleBusinessData();"));
    }

    #[test]
    fn test_business_payload_is_sanitized() {
        let script = business_script(
            &BridgeNames::default(),
            &json!({"note": "<script>steal()</script>ok", "link": "javascript:go"}),
        );
        assert!(script.contains(r#""note":"ok""#));
        assert!(script.contains(r#""link":"go""#));
        assert!(SecurityFilter::default().check_js_inject_safety(&script));
    }

    #[test]
    fn test_sanitize_nested() {
        let clean = sanitize_value(json!({"a": ["eval(x", {"b": "onload=1"}], "n": 2}));
        assert_eq!(clean, json!({"a": ["x", {"b": "=1"}], "n": 2}));
    }

    #[test]
    fn test_probe_script() {
        assert_eq!(
            global_probe_script("AdvanceGlobalTool"),
            r#"typeof window["AdvanceGlobalTool"] !== "undefined""#
        );
    }

    #[test]
    fn test_json_string_escapes() {
        assert_eq!(json_string(r#"a"b"#), r#""a\"b""#);
    }
}
