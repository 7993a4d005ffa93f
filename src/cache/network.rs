//! Connectivity probing.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

// ============================================================================
// NetworkProbe
// ============================================================================

/// Reports whether a usable network is available.
pub trait NetworkProbe: Send + Sync {
    /// Returns `true` if the network is reachable.
    fn is_available(&self) -> bool;
}

// ============================================================================
// StaticNetwork
// ============================================================================

/// A probe whose answer is set by the embedder.
///
/// Clones share state, so one handle can flip connectivity while another is
/// installed in a host.
#[derive(Debug, Clone)]
pub struct StaticNetwork {
    available: Arc<AtomicBool>,
}

impl StaticNetwork {
    /// A probe reporting `available`.
    #[inline]
    #[must_use]
    pub fn new(available: bool) -> Self {
        Self {
            available: Arc::new(AtomicBool::new(available)),
        }
    }

    /// A probe that reports the network as up.
    #[inline]
    #[must_use]
    pub fn online() -> Self {
        Self::new(true)
    }

    /// A probe that reports the network as down.
    #[inline]
    #[must_use]
    pub fn offline() -> Self {
        Self::new(false)
    }

    /// Changes the reported state.
    #[inline]
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }
}

impl NetworkProbe for StaticNetwork {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Tests
// ============================================================================
