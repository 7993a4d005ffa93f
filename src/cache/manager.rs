//! Active cache mode per page host.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::mode::CacheMode;
use super::network::NetworkProbe;

// ============================================================================
// CacheManager
// ============================================================================

/// Holds the one active [`CacheMode`] of a page host.
///
/// Each switch overwrites the previous mode. Cloning shares the mode.
#[derive(Debug, Clone, Default)]
pub struct CacheManager {
    mode: Arc<RwLock<CacheMode>>,
}

impl CacheManager {
    /// Creates a manager starting in `mode`.
    #[inline]
    #[must_use]
    pub fn new(mode: CacheMode) -> Self {
        Self {
            mode: Arc::new(RwLock::new(mode)),
        }
    }

    /// Current mode.
    #[inline]
    #[must_use]
    pub fn mode(&self) -> CacheMode {
        *self.mode.read()
    }

    /// Replaces the mode. Returns the previous one.
    pub fn set_mode(&self, mode: CacheMode) -> CacheMode {
        let previous = std::mem::replace(&mut *self.mode.write(), mode);
        if previous != mode {
            debug!(from = %previous, to = %mode, "Cache mode changed");
        }
        previous
    }

    /// Sets the mode from current connectivity and returns it.
    pub fn switch_strategy(&self, probe: &dyn NetworkProbe) -> CacheMode {
        let available = probe.is_available();
        let mode = CacheMode::for_connectivity(available);
        self.set_mode(mode);
        debug!(available, mode = %mode, "Cache strategy switched");
        mode
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::cache::network::StaticNetwork;

    #[test]
    fn test_switch_follows_connectivity() {
        let manager = CacheManager::default();
        let network = StaticNetwork::offline();

        assert_eq!(manager.switch_strategy(&network), CacheMode::CacheElseNetwork);
        assert_eq!(manager.mode(), CacheMode::CacheElseNetwork);

        network.set_available(true);
        assert_eq!(manager.switch_strategy(&network), CacheMode::Default);
        assert_eq!(manager.mode(), CacheMode::Default);
    }

    #[test]
    fn test_set_mode_overwrites() {
        let manager = CacheManager::new(CacheMode::NoCache);
        assert_eq!(manager.set_mode(CacheMode::CacheOnly), CacheMode::NoCache);
        assert_eq!(manager.mode(), CacheMode::CacheOnly);
    }

    #[test]
    fn test_clones_share_mode() {
        let manager = CacheManager::default();
        let other = manager.clone();
        other.set_mode(CacheMode::NoCache);
        assert_eq!(manager.mode(), CacheMode::NoCache);
    }
}
