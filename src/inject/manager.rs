//! Injection of the global tool and business modules.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::BridgeNames;
use crate::error::{Error, Result};
use crate::host::PageHost;

use super::registry::{InjectedModule, InjectionPoint};
use super::scripts::{business_script, global_tool_script};

// ============================================================================
// InjectionManager
// ============================================================================

/// Builds module scripts and evaluates them into a page.
#[derive(Debug, Clone, Default)]
pub struct InjectionManager {
    names: BridgeNames,
}

impl InjectionManager {
    /// Creates a manager using `names`.
    #[inline]
    #[must_use]
    pub fn new(names: BridgeNames) -> Self {
        Self { names }
    }

    /// Returns the names used in templates.
    #[inline]
    #[must_use]
    pub fn names(&self) -> &BridgeNames {
        &self.names
    }

    /// Injects the global utilities module.
    ///
    /// # Errors
    ///
    /// See [`inject_script`](Self::inject_script).
    pub async fn inject_global_tool(&self, host: &PageHost) -> Result<InjectedModule> {
        let script = global_tool_script(&self.names);
        self.inject_script(host, &self.names.global_tool, InjectionPoint::PageStart, &script, None)
            .await
    }

    /// Injects the business module carrying `payload`.
    ///
    /// # Errors
    ///
    /// See [`inject_script`](Self::inject_script).
    pub async fn inject_business(&self, host: &PageHost, payload: &Value) -> Result<InjectedModule> {
        let script = business_script(&self.names, payload);
        self.inject_script(
            host,
            &self.names.business_logic,
            InjectionPoint::PageFinish,
            &script,
            Some(payload.to_string()),
        )
        .await
    }

    /// Checks and evaluates `script`, then records it as module `name`.
    ///
    /// # Errors
    ///
    /// - [`Error::PageNotLoaded`] if the page has no URL
    /// - [`Error::UnsafeScript`] if the script fails the injection check
    /// - Any error from evaluating the script
    pub async fn inject_script(
        &self,
        host: &PageHost,
        name: &str,
        point: InjectionPoint,
        script: &str,
        payload: Option<String>,
    ) -> Result<InjectedModule> {
        if host.current_url().is_none() {
            warn!(module = name, "Injection skipped: no page loaded");
            return Err(Error::PageNotLoaded);
        }
        if !host.security().check_js_inject_safety(script) {
            warn!(module = name, "Injection refused: unsafe script");
            return Err(Error::unsafe_script(name));
        }

        let result = host.evaluate(script).await.inspect_err(|e| {
            warn!(module = name, error = %e, "Injection failed");
        })?;
        debug!(module = name, result = %result, "Injection result");

        let module = InjectedModule::new(name, point, payload);
        host.injected().record(module.clone());
        info!(module = name, point = %point, "Module injected");
        Ok(module)
    }
}

// ============================================================================
// Tests
// ============================================================================
