//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the trigger engine and the outside
//! world: the lighting bridge it drives and the router it learns presence
//! from. They are defined here (in `app`) so that both the engine and the
//! adapter crates can depend on them without creating circular dependencies.

pub mod actuator;
pub mod presence;

pub use actuator::LightsActuator;
pub use presence::{ConnectedDevices, PresenceNotification, PresenceSource};
