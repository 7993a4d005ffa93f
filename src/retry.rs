//! Bounded retry with backoff.
//!
//! Polls an operation until it yields a value, gives up with a
//! non-recoverable error, or runs out of attempts or waiting budget. The
//! final outcome is always returned to the caller.
//!
//! # Example
//!
//! [`wait_for_global`] builds on [`retry_async`] to wait for an injected
//! module to appear in the page.
//!
//! ```ignore
//! use webview_bridge::retry::{RetryPolicy, retry_async};
//!
//! let tool = retry_async(&RetryPolicy::default(), "find tool", |_attempt| async {
//!     Ok(lookup_tool().await)
//! })
//! .await?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::host::PageHost;
use crate::inject::global_probe_script;

// ============================================================================
// RetryPolicy
// ============================================================================

/// Retry limits and backoff shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds.
    pub initial_delay_ms: u64,
    /// Growth factor applied per retry.
    pub multiplier: f64,
    /// Upper bound on a single delay, in milliseconds.
    pub max_delay_ms: u64,
    /// Upper bound on total waiting, in milliseconds.
    pub total_budget_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 200,
            multiplier: 1.5,
            max_delay_ms: 1_000,
            total_budget_ms: 2_000,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Fixed delay between a fixed number of retries.
    #[inline]
    #[must_use]
    pub fn fixed(max_retries: u32, delay: Duration) -> Self {
        let delay_ms = delay.as_millis() as u64;
        Self {
            max_retries,
            initial_delay_ms: delay_ms,
            multiplier: 1.0,
            max_delay_ms: delay_ms,
            total_budget_ms: delay_ms.saturating_mul(u64::from(max_retries)),
        }
    }

    /// Delay before retry number `retry` (zero-based).
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = self.multiplier.max(1.0).powi(retry as i32);
        let millis = (self.initial_delay_ms as f64 * factor).min(self.max_delay_ms as f64);
        Duration::from_millis(millis as u64)
    }

    /// Validates the policy.
    ///
    /// # Errors
    ///
    /// Returns error message if validation fails.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return Err("retry multiplier must be a finite value >= 1.0".to_string());
        }
        if self.max_delay_ms < self.initial_delay_ms {
            return Err("max delay must not be smaller than the initial delay".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// retry_async
// ============================================================================

/// Runs `op` until it yields `Some`, following `policy`.
///
/// `op` receives the zero-based attempt number. `Ok(None)` and recoverable
/// errors schedule another attempt; non-recoverable errors are returned
/// immediately.
///
/// # Errors
///
/// - [`Error::RetryExhausted`] when attempts or budget run out
/// - Any non-recoverable error returned by `op`
pub async fn retry_async<T, F, Fut>(policy: &RetryPolicy, operation: &str, mut op: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let mut waited_ms: u64 = 0;
    let mut attempt: u32 = 0;

    loop {
        match op(attempt).await {
            Ok(Some(value)) => {
                if attempt > 0 {
                    debug!(operation, attempt, waited_ms, "Succeeded after retry");
                }
                return Ok(value);
            }
            Ok(None) => {}
            Err(e) if e.is_recoverable() => {
                debug!(operation, attempt, error = %e, "Recoverable failure");
            }
            Err(e) => return Err(e),
        }

        let attempts = attempt + 1;
        if attempt >= policy.max_retries || waited_ms >= policy.total_budget_ms {
            warn!(operation, attempts, waited_ms, "Retry exhausted");
            return Err(Error::retry_exhausted(operation, attempts, waited_ms));
        }

        let delay = policy.delay_for(attempt);
        debug!(operation, attempt, delay_ms = delay.as_millis() as u64, "Retrying");
        sleep(delay).await;
        waited_ms += delay.as_millis() as u64;
        attempt += 1;
    }
}

// ============================================================================
// wait_for_global
// ============================================================================

/// Polls the page until `window.<name>` exists.
///
/// A page that is not loaded yet counts as a miss, so this can be started
/// right after a navigation begins.
///
/// # Errors
///
/// - [`Error::RetryExhausted`] if the global never appears
/// - [`Error::PageDestroyed`] if the host is destroyed while waiting
pub async fn wait_for_global(host: &PageHost, name: &str, policy: &RetryPolicy) -> Result<()> {
    let probe = global_probe_script(name);
    let operation = format!("wait for {name}");
    retry_async(policy, &operation, |_| {
        let probe = probe.as_str();
        async move {
            let found = host.evaluate(probe).await?;
            Ok(found.as_bool().unwrap_or(false).then_some(()))
        }
    })
    .await
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use serde_json::Value;

    use crate::config::HostConfig;
    use crate::testing::RecordingEngine;

    fn fast(max_retries: u32) -> RetryPolicy {
        RetryPolicy::fixed(max_retries, Duration::from_millis(1))
    }

    #[test]
    fn test_default_backoff_shape() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_millis(200));
        assert_eq!(policy.delay_for(1), Duration::from_millis(300));
        assert_eq!(policy.delay_for(2), Duration::from_millis(450));
        assert_eq!(policy.delay_for(10), Duration::from_millis(1_000));
    }

    #[test]
    fn test_validate() {
        assert!(RetryPolicy::default().validate().is_ok());
        let bad = RetryPolicy {
            multiplier: 0.5,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[tokio::test]
    async fn test_immediate_success_makes_one_attempt() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let value = retry_async(&fast(3), "immediate", move |_| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Some(7))
            }
        })
        .await
        .expect("success");

        assert_eq!(value, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_success_after_retries_is_observed() {
        let value = retry_async(&fast(3), "eventually", |attempt| async move {
            Ok((attempt == 2).then_some("ready"))
        })
        .await
        .expect("success");

        assert_eq!(value, "ready");
    }

    #[tokio::test]
    async fn test_exhaustion_reports_attempts() {
        let err = retry_async::<(), _, _>(&fast(2), "never", |_| async { Ok(None) })
            .await
            .unwrap_err();

        match err {
            Error::RetryExhausted { attempts, .. } => assert_eq!(attempts, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_non_recoverable_error_stops_immediately() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let err = retry_async::<(), _, _>(&fast(5), "fatal", move |_| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(Error::PageDestroyed)
            }
        })
        .await
        .unwrap_err();

        assert!(matches!(err, Error::PageDestroyed));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recoverable_error_is_retried() {
        let value = retry_async(&fast(2), "flaky", |attempt| async move {
            if attempt == 0 {
                Err(Error::script_error("not yet"))
            } else {
                Ok(Some(attempt))
            }
        })
        .await
        .expect("success");

        assert_eq!(value, 1);
    }

    #[tokio::test]
    async fn test_wait_for_global_found() {
        let engine = RecordingEngine::new().responding("AdvanceGlobalTool", Value::Bool(true));
        let host = PageHost::start(engine, &HostConfig::default())
            .await
            .expect("host");
        host.load_page("https://github.com/").await.expect("load");

        wait_for_global(&host, "AdvanceGlobalTool", &fast(2))
            .await
            .expect("found");
    }

    #[tokio::test]
    async fn test_wait_for_global_exhausted() {
        let engine = RecordingEngine::new();
        let log = engine.log();
        let host = PageHost::start(engine, &HostConfig::default())
            .await
            .expect("host");
        host.load_page("https://github.com/").await.expect("load");

        let err = wait_for_global(&host, "Missing", &fast(2)).await.unwrap_err();
        assert!(matches!(err, Error::RetryExhausted { attempts: 3, .. }));
        assert_eq!(log.scripts().len(), 3);
    }

    #[tokio::test]
    async fn test_wait_for_global_before_load_retries() {
        let host = PageHost::start(RecordingEngine::new(), &HostConfig::default())
            .await
            .expect("host");

        let err = wait_for_global(&host, "AdvanceGlobalTool", &fast(1)).await.unwrap_err();
        assert!(matches!(err, Error::RetryExhausted { attempts: 2, .. }));
    }

    #[tokio::test]
    async fn test_wait_for_global_stops_on_destroy() {
        let host = PageHost::start(RecordingEngine::new(), &HostConfig::default())
            .await
            .expect("host");
        host.destroy().await;

        let err = wait_for_global(&host, "AdvanceGlobalTool", &fast(5)).await.unwrap_err();
        assert!(matches!(err, Error::PageDestroyed));
    }

    #[tokio::test]
    async fn test_budget_caps_attempts() {
        let policy = RetryPolicy {
            max_retries: 100,
            initial_delay_ms: 2,
            multiplier: 1.0,
            max_delay_ms: 2,
            total_budget_ms: 4,
        };
        let err = retry_async::<(), _, _>(&policy, "budget", |_| async { Ok(None) })
            .await
            .unwrap_err();

        match err {
            Error::RetryExhausted { attempts, elapsed_ms, .. } => {
                assert_eq!(attempts, 3);
                assert_eq!(elapsed_ms, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
