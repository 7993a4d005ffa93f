//! URL allow-list checks.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use url::Url;

use crate::config::SecurityPolicy;

// ============================================================================
// UrlVerdict
// ============================================================================

/// Outcome of checking a URL against a [`SecurityPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlVerdict {
    /// The URL may be loaded.
    Safe,
    /// The input was empty.
    Empty,
    /// The input contained a forbidden character.
    ForbiddenChar(char),
    /// The input did not parse as a URL.
    Malformed(String),
    /// The scheme is not allow-listed.
    DisallowedScheme(String),
    /// A `file` URL outside the asset directory.
    OutsideAssets,
    /// A network URL without a host.
    MissingHost,
    /// The host is not an allow-listed domain or a subdomain of one.
    UntrustedHost(String),
}

impl UrlVerdict {
    /// Returns `true` for [`UrlVerdict::Safe`].
    #[inline]
    #[must_use]
    pub fn is_safe(&self) -> bool {
        matches!(self, Self::Safe)
    }
}

impl fmt::Display for UrlVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Safe => write!(f, "safe"),
            Self::Empty => write!(f, "empty URL"),
            Self::ForbiddenChar(c) => write!(f, "forbidden character {c:?}"),
            Self::Malformed(reason) => write!(f, "malformed URL: {reason}"),
            Self::DisallowedScheme(scheme) => write!(f, "scheme {scheme:?} not allowed"),
            Self::OutsideAssets => write!(f, "local file outside the asset directory"),
            Self::MissingHost => write!(f, "missing host"),
            Self::UntrustedHost(host) => write!(f, "host {host:?} not trusted"),
        }
    }
}

// ============================================================================
// Evaluation
// ============================================================================

/// Checks `url` against `policy`.
#[must_use]
pub fn evaluate(policy: &SecurityPolicy, url: &str) -> UrlVerdict {
    if url.is_empty() {
        return UrlVerdict::Empty;
    }

    if let Some(c) = url.chars().find(|c| policy.forbidden_url_chars.contains(c)) {
        return UrlVerdict::ForbiddenChar(c);
    }

    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => return UrlVerdict::Malformed(e.to_string()),
    };

    let scheme = parsed.scheme();
    if !policy.allowed_schemes.iter().any(|s| s == scheme) {
        return UrlVerdict::DisallowedScheme(scheme.to_string());
    }

    // Dot segments and backslashes are resolved by the parser, so the prefix
    // is checked on the normalized form.
    if scheme == "file" {
        return if parsed.as_str().starts_with(&policy.asset_prefix) {
            UrlVerdict::Safe
        } else {
            UrlVerdict::OutsideAssets
        };
    }

    let Some(host) = parsed.host_str().filter(|h| !h.is_empty()) else {
        return UrlVerdict::MissingHost;
    };
    let host = host.to_ascii_lowercase();

    if policy
        .allowed_domains
        .iter()
        .any(|domain| is_same_or_subdomain(&host, domain))
    {
        UrlVerdict::Safe
    } else {
        UrlVerdict::UntrustedHost(host)
    }
}

/// `host == domain` or `host` ends with `.domain`, ignoring ASCII case.
/// `host` must already be lowercase.
fn is_same_or_subdomain(host: &str, domain: &str) -> bool {
    let domain = domain.to_ascii_lowercase();
    let domain = domain.as_str();
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn policy() -> SecurityPolicy {
        SecurityPolicy::default()
    }

    #[test]
    fn test_trusted_https() {
        assert_eq!(evaluate(&policy(), "https://github.com/x"), UrlVerdict::Safe);
        assert_eq!(evaluate(&policy(), "http://localhost:8080/index.html"), UrlVerdict::Safe);
    }

    #[test]
    fn test_subdomain_trusted() {
        assert!(evaluate(&policy(), "https://m.baidu.com/s").is_safe());
        assert!(evaluate(&policy(), "https://GITHUB.com/").is_safe());
    }

    #[test]
    fn test_lookalike_domain_refused() {
        assert_eq!(
            evaluate(&policy(), "https://evilgithub.com/"),
            UrlVerdict::UntrustedHost("evilgithub.com".to_string())
        );
        assert!(!evaluate(&policy(), "https://github.com.evil.org/").is_safe());
    }

    #[test]
    fn test_file_urls() {
        assert!(evaluate(&policy(), "file:///android_asset/advance/index.html").is_safe());
        assert_eq!(
            evaluate(&policy(), "file:///sdcard/x.html"),
            UrlVerdict::OutsideAssets
        );
    }

    #[test]
    fn test_asset_traversal_refused() {
        let policy = policy();
        for url in [
            "file:///android_asset/../../sdcard/x.html",
            "file:///android_asset/..\\..\\sdcard/x.html",
            "file:///android_asset/sub/../../data/data/app/db",
        ] {
            assert_eq!(evaluate(&policy, url), UrlVerdict::OutsideAssets, "{url}");
        }
        assert!(evaluate(&policy, "file:///android_asset/sub/../page.html").is_safe());
    }

    #[test]
    fn test_mixed_case_policy_domain() {
        let mut policy = policy();
        policy.allowed_domains = vec!["GitHub.com".to_string()];
        assert!(evaluate(&policy, "https://github.com/").is_safe());
        assert!(evaluate(&policy, "https://API.GitHub.com/repos").is_safe());
        assert!(!evaluate(&policy, "https://evilgithub.com/").is_safe());
    }

    #[test]
    fn test_scheme_refused() {
        assert_eq!(
            evaluate(&policy(), "javascript:alert(1)"),
            UrlVerdict::DisallowedScheme("javascript".to_string())
        );
        assert!(matches!(
            evaluate(&policy(), "intent://scan/"),
            UrlVerdict::DisallowedScheme(_)
        ));
    }

    #[test]
    fn test_empty_and_malformed() {
        assert_eq!(evaluate(&policy(), ""), UrlVerdict::Empty);
        assert!(matches!(evaluate(&policy(), "not a url"), UrlVerdict::Malformed(_)));
    }

    #[test]
    fn test_forbidden_chars() {
        assert_eq!(
            evaluate(&policy(), "https://github.com/?q=1"),
            UrlVerdict::ForbiddenChar('?')
        );
        assert_eq!(
            evaluate(&policy(), "https://github.com/a#top"),
            UrlVerdict::ForbiddenChar('#')
        );
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(UrlVerdict::OutsideAssets.to_string(), "local file outside the asset directory");
        assert_eq!(UrlVerdict::ForbiddenChar('$').to_string(), "forbidden character '$'");
    }

    proptest! {
        #[test]
        fn prop_forbidden_char_always_refused(
            path in "[a-z]{0,8}",
            idx in 0usize..9,
        ) {
            let c = crate::config::policy::DEFAULT_FORBIDDEN_URL_CHARS[idx];
            let url = format!("https://github.com/{path}{c}");
            prop_assert_eq!(evaluate(&policy(), &url), UrlVerdict::ForbiddenChar(c));
        }

        #[test]
        fn prop_trusted_paths_accepted(path in "[a-z0-9/_.-]{0,24}") {
            let url = format!("https://github.com/{path}");
            prop_assert!(evaluate(&policy(), &url).is_safe());
        }
    }
}
