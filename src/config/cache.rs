//! Cache directory layout and limits.

// ============================================================================
// Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Default cache size ceiling (100 MiB).
pub const DEFAULT_MAX_CACHE_BYTES: u64 = 100 * 1024 * 1024;

/// Default cache entry lifetime (7 days).
pub const DEFAULT_CACHE_EXPIRY_SECS: u64 = 7 * 24 * 60 * 60;

// ============================================================================
// CacheConfig
// ============================================================================

/// Where page caches live and how large or old they may grow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    /// Directory the cache directories are created under.
    pub root: PathBuf,
    /// HTTP cache directory name.
    pub cache_dir: String,
    /// Cookie and database directory name.
    pub cookie_dir: String,
    /// Application cache directory name.
    pub app_cache_dir: String,
    /// Size ceiling for the HTTP cache directory.
    pub max_size_bytes: u64,
    /// Files older than this are purged.
    pub expiry_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root: std::env::temp_dir(),
            cache_dir: "advance_webview_cache".to_string(),
            cookie_dir: "advance_webview_cookie".to_string(),
            app_cache_dir: "advance_webview_app_cache".to_string(),
            max_size_bytes: DEFAULT_MAX_CACHE_BYTES,
            expiry_secs: DEFAULT_CACHE_EXPIRY_SECS,
        }
    }
}

impl CacheConfig {
    /// Creates a config rooted at `root` with default names and limits.
    #[inline]
    #[must_use]
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    /// Sets the size ceiling.
    #[inline]
    #[must_use]
    pub fn with_max_size(mut self, bytes: u64) -> Self {
        self.max_size_bytes = bytes;
        self
    }

    /// Sets the entry lifetime.
    #[inline]
    #[must_use]
    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.expiry_secs = expiry.as_secs();
        self
    }

    /// HTTP cache directory.
    #[inline]
    #[must_use]
    pub fn cache_path(&self) -> PathBuf {
        self.root.join(&self.cache_dir)
    }

    /// Cookie directory.
    #[inline]
    #[must_use]
    pub fn cookie_path(&self) -> PathBuf {
        self.root.join(&self.cookie_dir)
    }

    /// Application cache directory.
    #[inline]
    #[must_use]
    pub fn app_cache_path(&self) -> PathBuf {
        self.root.join(&self.app_cache_dir)
    }

    /// Entry lifetime as a [`Duration`].
    #[inline]
    #[must_use]
    pub fn expiry(&self) -> Duration {
        Duration::from_secs(self.expiry_secs)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        let names = [&self.cache_dir, &self.cookie_dir, &self.app_cache_dir];
        if names.iter().any(|n| n.is_empty() || n.contains(['/', '\\'])) {
            return Err("cache directory names must be single path components".to_string());
        }
        if self.cache_dir == self.cookie_dir
            || self.cache_dir == self.app_cache_dir
            || self.cookie_dir == self.app_cache_dir
        {
            return Err("cache directory names must be distinct".to_string());
        }
        if self.max_size_bytes == 0 {
            return Err("cache size ceiling must be greater than zero".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_under_root() {
        let config = CacheConfig::rooted("/data/app");
        assert_eq!(config.cache_path(), PathBuf::from("/data/app/advance_webview_cache"));
        assert_eq!(config.cookie_path(), PathBuf::from("/data/app/advance_webview_cookie"));
        assert_eq!(
            config.app_cache_path(),
            PathBuf::from("/data/app/advance_webview_app_cache")
        );
    }

    #[test]
    fn test_default_limits() {
        let config = CacheConfig::default();
        assert_eq!(config.max_size_bytes, 100 * 1024 * 1024);
        assert_eq!(config.expiry(), Duration::from_secs(604_800));
    }

    #[test]
    fn test_validate_rejects_nested_names() {
        let config = CacheConfig {
            cache_dir: "a/b".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_size() {
        assert!(CacheConfig::default().with_max_size(0).validate().is_err());
    }
}
