//! Actuator port — the lighting bridge the trigger drives.

use std::future::Future;
use std::sync::Arc;

use lightson_domain::error::LightsOnError;
use lightson_domain::light::{LightState, Scene};

/// Capabilities the engine needs from a lighting bridge.
///
/// Implementations must be cheap to share: the engine holds one behind an
/// [`Arc`] and calls it from spawned tasks.
pub trait LightsActuator: Send + Sync {
    /// Look up a scene by its display name.
    fn find_scene_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Scene>, LightsOnError>> + Send;

    /// Current state of every light known to the bridge.
    fn get_all_lights(&self) -> impl Future<Output = Result<Vec<LightState>, LightsOnError>> + Send;

    /// Power every light on or off.
    fn set_all_power(&self, on: bool) -> impl Future<Output = Result<(), LightsOnError>> + Send;

    /// Recall the scene with the given name.
    fn recall_scene(&self, name: &str) -> impl Future<Output = Result<(), LightsOnError>> + Send;
}

impl<T: LightsActuator> LightsActuator for Arc<T> {
    fn find_scene_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Scene>, LightsOnError>> + Send {
        (**self).find_scene_by_name(name)
    }

    fn get_all_lights(&self) -> impl Future<Output = Result<Vec<LightState>, LightsOnError>> + Send {
        (**self).get_all_lights()
    }

    fn set_all_power(&self, on: bool) -> impl Future<Output = Result<(), LightsOnError>> + Send {
        (**self).set_all_power(on)
    }

    fn recall_scene(&self, name: &str) -> impl Future<Output = Result<(), LightsOnError>> + Send {
        (**self).recall_scene(name)
    }
}
