//! Security filter.
//!
//! Stateless checks applied to every URL the host loads, every script it
//! injects and every string that crosses the bridge.
//!
//! # Components
//!
//! | Item | Description |
//! |------|-------------|
//! | [`SecurityFilter`] | Policy-bound facade used by the rest of the crate |
//! | [`filter_xss_content`] | Strip denylisted patterns, then HTML-escape |
//! | [`strip_dangerous_patterns`] | Strip only; output stays machine readable |
//! | [`UrlVerdict`] | Why a URL was accepted or refused |
//!
//! # Example
//!
//! ```ignore
//! use webview_bridge::security::SecurityFilter;
//!
//! let filter = SecurityFilter::default();
//! assert!(filter.check_url_safety("https://github.com/x"));
//! assert!(!filter.check_url_safety("javascript:alert(1)"));
//! assert_eq!(filter.filter_xss_content("<script>alert(1)</script>hello"), "hello");
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// URL allow-list checks.
pub mod url;

/// XSS stripping and escaping.
pub mod xss;

// ============================================================================
// Re-exports
// ============================================================================

pub use self::url::UrlVerdict;
pub use self::xss::{filter_xss_content, strip_dangerous_patterns};

// ============================================================================
// Imports
// ============================================================================

use tracing::{debug, warn};

use crate::config::SecurityPolicy;

// ============================================================================
// SecurityFilter
// ============================================================================

/// Security checks bound to one [`SecurityPolicy`].
#[derive(Debug, Clone, Default)]
pub struct SecurityFilter {
    policy: SecurityPolicy,
}

impl SecurityFilter {
    /// Creates a filter for `policy`.
    #[inline]
    #[must_use]
    pub fn new(policy: SecurityPolicy) -> Self {
        Self { policy }
    }

    /// Returns the policy.
    #[inline]
    #[must_use]
    pub fn policy(&self) -> &SecurityPolicy {
        &self.policy
    }

    /// Checks `url` and explains the outcome.
    #[must_use]
    pub fn evaluate_url(&self, url: &str) -> UrlVerdict {
        let verdict = self::url::evaluate(&self.policy, url);
        if verdict.is_safe() {
            debug!(url, "URL passed security check");
        } else {
            warn!(url, reason = %verdict, "Unsafe URL");
        }
        verdict
    }

    /// Returns `true` if `url` may be loaded.
    #[inline]
    #[must_use]
    pub fn check_url_safety(&self, url: &str) -> bool {
        self.evaluate_url(url).is_safe()
    }

    /// Returns `true` if `code` may be injected into the page.
    ///
    /// Empty code is unsafe. The code is stripped first, then checked
    /// case-insensitively against the injection denylist.
    #[must_use]
    pub fn check_js_inject_safety(&self, code: &str) -> bool {
        if code.is_empty() {
            warn!("Refusing empty injection payload");
            return false;
        }

        let lowered = strip_dangerous_patterns(code).to_lowercase();
        match self
            .policy
            .injection_denylist
            .iter()
            .find(|keyword| lowered.contains(&keyword.to_lowercase()))
        {
            Some(keyword) => {
                warn!(keyword = %keyword, "Injection payload contains denylisted keyword");
                false
            }
            None => true,
        }
    }

    /// Returns `true` if the raw content carries a known malicious keyword.
    #[inline]
    #[must_use]
    pub fn contains_malicious_keyword(&self, content: &str) -> bool {
        xss::contains_any_keyword(content, &self.policy.malicious_keywords)
    }

    /// See [`filter_xss_content`].
    #[inline]
    #[must_use]
    pub fn filter_xss_content(&self, content: &str) -> String {
        filter_xss_content(content)
    }

    /// See [`strip_dangerous_patterns`].
    #[inline]
    #[must_use]
    pub fn strip_dangerous_patterns(&self, content: &str) -> String {
        strip_dangerous_patterns(content)
    }
}

// ============================================================================
// Tests
// ============================================================================
