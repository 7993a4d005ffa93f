//! Bridge protocol types.
//!
//! Defines what crosses the bridge in each direction.
//!
//! # Message Flow
//!
//! | Message | Direction | Purpose |
//! |---------|-----------|---------|
//! | [`BridgeCall`] | Page → Native | Method name plus JSON params |
//! | [`BridgeResult`] | Native → Page | Synchronous reply to a call |
//! | `<jsEntry>(name, json)` | Native → Page | Push using a [`NativeMethod`] |
//!
//! # Result Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | `0` | Success |
//! | `400` | Params are not valid JSON or have the wrong type |
//! | `403` | Content refused by the security filter |
//! | `404` | Method outside the whitelist (acknowledged) |
//! | `500` | Handler failure |

// ============================================================================
// Submodules
// ============================================================================

/// Call and result types.
pub mod call;

/// Method vocabulary.
pub mod method;

/// Payloads pushed to the page.
pub mod payload;

// ============================================================================
// Re-exports
// ============================================================================

pub use call::{BridgeCall, BridgeResult};
pub use method::{JsMethod, NativeMethod};
pub use payload::{DeviceInfo, SecuritySnapshot, UrlCheckReport, XssFilterReport};
