//! Cache strategy and storage.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`CacheMode`] | Cache/network combination with platform codes |
//! | [`CacheManager`] | The one active mode of a page host |
//! | [`NetworkProbe`] | Connectivity source for strategy switches |
//! | [`CacheStore`] | Directory cleanup, expiry and size ceiling |
//!
//! Strategy: online uses [`CacheMode::Default`], offline uses
//! [`CacheMode::CacheElseNetwork`]. The strategy is re-evaluated when a page
//! starts loading and when a load fails.

// ============================================================================
// Submodules
// ============================================================================

/// Active mode holder.
pub mod manager;

/// Cache modes.
pub mod mode;

/// Connectivity probing.
pub mod network;

/// On-disk maintenance.
pub mod store;

// ============================================================================
// Re-exports
// ============================================================================

pub use manager::CacheManager;
pub use mode::CacheMode;
pub use network::{NetworkProbe, StaticNetwork};
pub use store::{CacheStore, ClearReport};
