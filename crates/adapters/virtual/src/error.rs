//! Virtual adapter error types.

use lightson_domain::error::LightsOnError;

/// Errors raised by the simulated bridge and router.
#[derive(Debug, thiserror::Error)]
pub enum VirtualError {
    /// The bridge was told to behave as if offline.
    #[error("virtual bridge unreachable")]
    BridgeUnreachable,

    /// The router was told to behave as if offline.
    #[error("virtual router unreachable")]
    RouterUnreachable,
}

impl From<VirtualError> for LightsOnError {
    fn from(err: VirtualError) -> Self {
        match err {
            VirtualError::BridgeUnreachable => LightsOnError::Actuator(Box::new(err)),
            VirtualError::RouterUnreachable => LightsOnError::Presence(Box::new(err)),
        }
    }
}
