//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`LightsOnError`] via `#[from]` (or an explicit `From` impl for boxed
//! collaborator errors).

/// Workspace-wide error.
#[derive(Debug, thiserror::Error)]
pub enum LightsOnError {
    /// A value violated a domain invariant.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A referenced item does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The lights actuator (bridge) rejected or failed a call.
    #[error("actuator error")]
    Actuator(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The presence source failed to produce a snapshot.
    #[error("presence source error")]
    Presence(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Invariant violations detected while building domain values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("scene name must not be empty")]
    EmptySceneName,

    #[error("poll interval must be non-zero")]
    ZeroPollInterval,

    #[error("{which} interval must not exceed {max_secs}s")]
    IntervalTooLong { which: &'static str, max_secs: u64 },

    #[error("watched device is required")]
    MissingDevice,

    #[error("invalid hardware address {0:?}")]
    InvalidDeviceKey(String),

    #[error("invalid time of day {0:?}, expected HH:MM")]
    InvalidTimeOfDay(String),
}

/// A lookup that found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id:?} not found")]
pub struct NotFoundError {
    /// Kind of the missing item (e.g. `"Scene"`).
    pub entity: &'static str,
    /// The identifier or name that was looked up.
    pub id: String,
}
