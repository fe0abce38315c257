//! # lightson-adapter-virtual
//!
//! Virtual/demo adapters that stand in for real hardware, for testing and
//! demonstration purposes.
//!
//! ## Provided collaborators
//!
//! | Type | Port | Behaviour |
//! |------|------|-----------|
//! | [`VirtualBridge`] | `LightsActuator` | In-memory lights and scenes; records power-off and recall calls |
//! | [`VirtualRouter`] | `ConnectedDevices` | In-memory set of attached devices, changed with `connect` / `disconnect` |
//!
//! Both can be switched into an "unreachable" mode to exercise error paths.
//!
//! ## Dependency rule
//!
//! Depends on `lightson-app` (port traits) and `lightson-domain` only.

mod bridge;
mod error;
mod router;

pub use bridge::VirtualBridge;
pub use error::VirtualError;
pub use router::VirtualRouter;
