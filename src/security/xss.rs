//! Denylist-based XSS stripping and HTML escaping.
//!
//! This is pattern matching, not parsing. It removes a fixed set of
//! dangerous substrings and escapes HTML metacharacters; creative encodings
//! can get past it.

// ============================================================================
// Imports
// ============================================================================

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

// ============================================================================
// Patterns
// ============================================================================

/// Script blocks, the `javascript:` scheme, inline handlers and dialog/eval calls.
static XSS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)<script\b[^>]*>.*?</script[^>]*>|javascript:|onclick|onload|onerror|eval\(|alert\(|prompt\(|confirm\(",
    )
    .expect("XSS pattern is valid")
});

// ============================================================================
// Functions
// ============================================================================

/// Removes denylisted patterns until none remain.
///
/// Removal repeats because deleting one match can join its neighbours into a
/// new one (`javajavascript:script:`). The result stays machine readable, so
/// this is what bridge names and JSON params go through.
#[must_use]
pub fn strip_dangerous_patterns(content: &str) -> String {
    let mut current = content.to_string();
    loop {
        let next = match XSS_PATTERN.replace_all(&current, "") {
            Cow::Borrowed(_) => return current,
            Cow::Owned(next) => next,
        };
        current = next;
    }
}

/// Strips denylisted patterns, then escapes `<`, `>`, `"` and `'`.
///
/// Empty input yields an empty string. Idempotent.
#[must_use]
pub fn filter_xss_content(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }

    let stripped = strip_dangerous_patterns(content);
    let filtered = escape_html(&stripped);

    if filtered != content {
        warn!(
            original_len = content.len(),
            filtered_len = filtered.len(),
            "XSS content filtered"
        );
    }
    filtered
}

/// Escapes HTML metacharacters. `&` is left alone so escaping is stable.
fn escape_html(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Returns `true` if the raw content contains any of `keywords`.
#[must_use]
pub fn contains_any_keyword(content: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| content.contains(k.as_str()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn test_script_block_removed_text_kept() {
        assert_eq!(filter_xss_content("<script>alert(1)</script>hello"), "hello");
    }

    #[test]
    fn test_script_block_case_and_newlines() {
        let input = "a<SCRIPT type=\"text/javascript\">\nsteal()\n</Script>b";
        assert_eq!(filter_xss_content(input), "ab");
    }

    #[test]
    fn test_keywords_removed() {
        assert_eq!(strip_dangerous_patterns("javascript:void(0)"), "void(0)");
        assert_eq!(strip_dangerous_patterns("x=eval(y)"), "x=y)");
        assert_eq!(strip_dangerous_patterns("ONLOAD=go"), "=go");
    }

    #[test]
    fn test_nested_keywords_removed_to_fixed_point() {
        assert_eq!(strip_dangerous_patterns("javajavascript:script:x"), "x");
        assert_eq!(strip_dangerous_patterns("onlonloadoad"), "");
    }

    #[test]
    fn test_metacharacters_escaped() {
        assert_eq!(
            filter_xss_content(r#"<b title="x">it's</b>"#),
            "&lt;b title=&quot;x&quot;&gt;it&#39;s&lt;/b&gt;"
        );
    }

    #[test]
    fn test_empty_and_clean_input() {
        assert_eq!(filter_xss_content(""), "");
        assert_eq!(filter_xss_content("plain text & more"), "plain text & more");
    }

    #[test]
    fn test_strip_keeps_json_readable() {
        let params = r#"{"msg":"<script>x</script>hi"}"#;
        let stripped = strip_dangerous_patterns(params);
        let value: serde_json::Value = serde_json::from_str(&stripped).expect("still JSON");
        assert_eq!(value["msg"], "hi");
    }

    #[test]
    fn test_contains_any_keyword() {
        let keywords = vec!["document.cookie".to_string(), "<script>".to_string()];
        assert!(contains_any_keyword("send(document.cookie)", &keywords));
        assert!(!contains_any_keyword("hello", &keywords));
    }

    proptest! {
        #[test]
        fn prop_filter_is_idempotent(input in ".{0,64}") {
            let once = filter_xss_content(&input);
            prop_assert_eq!(filter_xss_content(&once), once);
        }

        #[test]
        fn prop_filter_is_idempotent_on_markup(
            parts in prop::collection::vec(
                prop_oneof![
                    Just("<script>".to_string()),
                    Just("</script>".to_string()),
                    Just("javascript:".to_string()),
                    Just("onload".to_string()),
                    Just("alert(".to_string()),
                    Just("'\"<>&".to_string()),
                    "[a-z]{0,4}",
                ],
                0..12,
            )
        ) {
            let input = parts.concat();
            let once = filter_xss_content(&input);
            prop_assert_eq!(filter_xss_content(&once), once.clone());
            prop_assert!(!once.contains('<') && !once.contains('>'));
        }

        #[test]
        fn prop_strip_output_has_no_pattern(input in "[a-z:(<>/ ]{0,48}") {
            let stripped = strip_dangerous_patterns(&input);
            prop_assert!(!XSS_PATTERN.is_match(&stripped));
        }
    }
}
