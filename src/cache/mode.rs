//! Cache modes.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// CacheMode
// ============================================================================

/// How the page host combines its cache with the network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CacheMode {
    /// Normal HTTP caching rules.
    #[default]
    Default,
    /// Use the cache only; never touch the network.
    CacheOnly,
    /// Prefer the cache, fall back to the network.
    CacheElseNetwork,
    /// Always go to the network.
    NoCache,
}

impl CacheMode {
    /// Picks the mode for the current connectivity.
    #[inline]
    #[must_use]
    pub fn for_connectivity(available: bool) -> Self {
        if available {
            Self::Default
        } else {
            Self::CacheElseNetwork
        }
    }

    /// Platform integer code.
    #[inline]
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::Default => -1,
            Self::CacheElseNetwork => 1,
            Self::NoCache => 2,
            Self::CacheOnly => 3,
        }
    }

    /// Parses a platform integer code.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Self::Default),
            1 => Some(Self::CacheElseNetwork),
            2 => Some(Self::NoCache),
            3 => Some(Self::CacheOnly),
            _ => None,
        }
    }

    /// Human readable description.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Default => "online: cache fresh responses, revalidate stale ones",
            Self::CacheOnly => "offline only: serve from cache, never load from network",
            Self::CacheElseNetwork => "offline first: serve from cache, fall back to network",
            Self::NoCache => "no cache: always load from network",
        }
    }
}

impl fmt::Display for CacheMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Default => "default",
            Self::CacheOnly => "cache-only",
            Self::CacheElseNetwork => "cache-else-network",
            Self::NoCache => "no-cache",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_connectivity() {
        assert_eq!(CacheMode::for_connectivity(true), CacheMode::Default);
        assert_eq!(CacheMode::for_connectivity(false), CacheMode::CacheElseNetwork);
    }

    #[test]
    fn test_codes() {
        assert_eq!(CacheMode::Default.code(), -1);
        assert_eq!(CacheMode::CacheElseNetwork.code(), 1);
        assert_eq!(CacheMode::NoCache.code(), 2);
        assert_eq!(CacheMode::CacheOnly.code(), 3);
        assert_eq!(CacheMode::from_code(3), Some(CacheMode::CacheOnly));
        assert_eq!(CacheMode::from_code(0), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(CacheMode::CacheElseNetwork.to_string(), "cache-else-network");
        assert!(CacheMode::NoCache.description().contains("network"));
    }
}
