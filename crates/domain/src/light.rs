//! Lights and scenes as reported by the lighting bridge.

use serde::{Deserialize, Serialize};

use crate::id::{LightId, SceneId};

/// Current state of a single light.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightState {
    pub id: LightId,
    pub name: String,
    pub on: bool,
}

impl LightState {
    #[must_use]
    pub fn new(id: impl Into<LightId>, name: impl Into<String>, on: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            on,
        }
    }
}

/// Whether any of the given lights is currently powered on.
#[must_use]
pub fn any_on(lights: &[LightState]) -> bool {
    lights.iter().any(|light| light.on)
}

/// A named preset of light settings stored on the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub id: SceneId,
    pub name: String,
    /// Lights this scene drives.
    pub lights: Vec<LightId>,
}

impl Scene {
    #[must_use]
    pub fn new(id: impl Into<SceneId>, name: impl Into<String>, lights: Vec<LightId>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lights,
        }
    }
}
