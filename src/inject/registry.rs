//! Per-page record of injected modules.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::time::SystemTime;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

// ============================================================================
// InjectionPoint
// ============================================================================

/// When in the page lifecycle a module is injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InjectionPoint {
    /// As soon as the page starts loading.
    PageStart,
    /// Once the page has finished loading.
    PageFinish,
}

impl fmt::Display for InjectionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PageStart => f.write_str("page-start"),
            Self::PageFinish => f.write_str("page-finish"),
        }
    }
}

// ============================================================================
// InjectedModule
// ============================================================================

/// A module that was evaluated into the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedModule {
    /// Global name the module registers under.
    pub name: String,
    /// When it was injected.
    pub point: InjectionPoint,
    /// Payload embedded in the module, if any.
    pub payload: Option<String>,
    /// Injection time.
    pub injected_at: SystemTime,
}

impl InjectedModule {
    /// Creates a record stamped with the current time.
    #[must_use]
    pub fn new(name: impl Into<String>, point: InjectionPoint, payload: Option<String>) -> Self {
        Self {
            name: name.into(),
            point,
            payload,
            injected_at: SystemTime::now(),
        }
    }
}

// ============================================================================
// InjectionRegistry
// ============================================================================

/// Modules injected into the current page, keyed by name.
///
/// Re-injecting a name replaces the earlier record.
#[derive(Debug, Default)]
pub struct InjectionRegistry {
    modules: Mutex<FxHashMap<String, InjectedModule>>,
}

impl InjectionRegistry {
    /// Records a module.
    pub fn record(&self, module: InjectedModule) {
        self.modules.lock().insert(module.name.clone(), module);
    }

    /// Looks up a module by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<InjectedModule> {
        self.modules.lock().get(name).cloned()
    }

    /// Returns `true` if `name` is injected.
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.modules.lock().contains_key(name)
    }

    /// Names of all injected modules, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.modules.lock().keys().cloned().collect();
        names.sort();
        names
    }

    /// Forgets every module. Returns how many were dropped.
    pub fn clear(&self) -> usize {
        let mut modules = self.modules.lock();
        let count = modules.len();
        modules.clear();
        count
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_replace() {
        let registry = InjectionRegistry::default();
        registry.record(InjectedModule::new("Tool", InjectionPoint::PageStart, None));
        registry.record(InjectedModule::new(
            "Tool",
            InjectionPoint::PageFinish,
            Some("{}".to_string()),
        ));

        let module = registry.get("Tool").expect("recorded");
        assert_eq!(module.point, InjectionPoint::PageFinish);
        assert_eq!(registry.names(), vec!["Tool".to_string()]);
    }

    #[test]
    fn test_clear() {
        let registry = InjectionRegistry::default();
        registry.record(InjectedModule::new("A", InjectionPoint::PageStart, None));
        registry.record(InjectedModule::new("B", InjectionPoint::PageFinish, None));

        assert_eq!(registry.clear(), 2);
        assert!(!registry.contains("A"));
        assert!(registry.names().is_empty());
    }
}
