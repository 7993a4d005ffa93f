//! Shared bridge context.

// ============================================================================
// Imports
// ============================================================================

use crate::cache::{CacheManager, CacheStore};
use crate::config::{BridgeNames, HostConfig};
use crate::host::PageHost;
use crate::inject::InjectionManager;
use crate::security::SecurityFilter;

use super::caller::NativeToJs;

// ============================================================================
// BridgeContext
// ============================================================================

/// Everything a bridge component needs for one page.
///
/// Cloning is cheap; clones share the same page.
#[derive(Debug, Clone)]
pub struct BridgeContext {
    names: BridgeNames,
    host: PageHost,
    caller: NativeToJs,
    injector: InjectionManager,
    store: CacheStore,
}

impl BridgeContext {
    /// Builds a context for `host` from `config`.
    #[must_use]
    pub fn new(host: PageHost, config: &HostConfig) -> Self {
        Self {
            names: config.names.clone(),
            caller: NativeToJs::new(host.clone(), config.names.clone()),
            injector: InjectionManager::new(config.names.clone()),
            store: CacheStore::new(config.cache.clone()),
            host,
        }
    }

    /// Returns the shared names.
    #[inline]
    #[must_use]
    pub fn names(&self) -> &BridgeNames {
        &self.names
    }

    /// Returns the page host.
    #[inline]
    #[must_use]
    pub fn host(&self) -> &PageHost {
        &self.host
    }

    /// Returns the native-to-JS caller.
    #[inline]
    #[must_use]
    pub fn caller(&self) -> &NativeToJs {
        &self.caller
    }

    /// Returns the injection manager.
    #[inline]
    #[must_use]
    pub fn injector(&self) -> &InjectionManager {
        &self.injector
    }

    /// Returns the page's security filter.
    #[inline]
    #[must_use]
    pub fn security(&self) -> &SecurityFilter {
        self.host.security()
    }

    /// Returns the page's cache mode manager.
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &CacheManager {
        self.host.cache()
    }

    /// Returns the on-disk cache store.
    #[inline]
    #[must_use]
    pub fn store(&self) -> &CacheStore {
        &self.store
    }
}

// ============================================================================
// Tests
// ============================================================================
