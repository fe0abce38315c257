//! Virtual bridge — in-memory lights and scenes behind the actuator port.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use lightson_app::ports::LightsActuator;
use lightson_domain::error::{LightsOnError, NotFoundError};
use lightson_domain::light::{LightState, Scene};

use crate::error::VirtualError;

#[derive(Debug, Default)]
struct BridgeState {
    lights: Vec<LightState>,
    scenes: Vec<Scene>,
    power_calls: Vec<bool>,
    recalled: Vec<String>,
    unreachable: bool,
}

/// A simulated lighting bridge.
///
/// Recalling a scene turns on the lights it references; powering all lights
/// sets every light. Every call is recorded so tests and demos can inspect
/// what the engine did.
#[derive(Debug, Default)]
pub struct VirtualBridge {
    state: Mutex<BridgeState>,
}

impl VirtualBridge {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a light, initially off. Ids are handed out `"1"`, `"2"`, ...
    #[must_use]
    pub fn with_light(self, name: impl Into<String>) -> Self {
        {
            let mut state = self.lock();
            let id = (state.lights.len() + 1).to_string();
            state.lights.push(LightState::new(id, name, false));
        }
        self
    }

    /// Add a scene driving the named lights. Unknown light names are skipped.
    #[must_use]
    pub fn with_scene(self, name: impl Into<String>, light_names: &[&str]) -> Self {
        {
            let mut state = self.lock();
            let lights = state
                .lights
                .iter()
                .filter(|light| light_names.contains(&light.name.as_str()))
                .map(|light| light.id.clone())
                .collect();
            let id = format!("scene-{}", state.scenes.len() + 1);
            state.scenes.push(Scene::new(id, name, lights));
        }
        self
    }

    /// Flip a light by hand, as a person at the switch would.
    ///
    /// Returns `false` if no light has that name.
    pub fn set_light(&self, name: &str, on: bool) -> bool {
        let mut state = self.lock();
        match state.lights.iter_mut().find(|light| light.name == name) {
            Some(light) => {
                light.on = on;
                true
            }
            None => false,
        }
    }

    /// Make every subsequent call fail until cleared.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.lock().unreachable = unreachable;
    }

    #[must_use]
    pub fn lights(&self) -> Vec<LightState> {
        self.lock().lights.clone()
    }

    /// Number of "all lights off" calls received.
    #[must_use]
    pub fn power_off_calls(&self) -> usize {
        self.lock().power_calls.iter().filter(|on| !**on).count()
    }

    /// Names of recalled scenes, oldest first.
    #[must_use]
    pub fn recalled_scenes(&self) -> Vec<String> {
        self.lock().recalled.clone()
    }

    fn lock(&self) -> MutexGuard<'_, BridgeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn reachable(&self) -> Result<MutexGuard<'_, BridgeState>, LightsOnError> {
        let state = self.lock();
        if state.unreachable {
            return Err(VirtualError::BridgeUnreachable.into());
        }
        Ok(state)
    }

    fn recall(&self, name: &str) -> Result<(), LightsOnError> {
        let mut state = self.reachable()?;
        let scene = state
            .scenes
            .iter()
            .find(|scene| scene.name == name)
            .cloned()
            .ok_or_else(|| NotFoundError {
                entity: "Scene",
                id: name.to_string(),
            })?;
        for light in &mut state.lights {
            if scene.lights.contains(&light.id) {
                light.on = true;
            }
        }
        state.recalled.push(scene.name);
        tracing::debug!(scene = name, "virtual scene recalled");
        Ok(())
    }

    fn set_power(&self, on: bool) -> Result<(), LightsOnError> {
        let mut state = self.reachable()?;
        for light in &mut state.lights {
            light.on = on;
        }
        state.power_calls.push(on);
        tracing::debug!(on, "virtual lights powered");
        Ok(())
    }
}

impl LightsActuator for VirtualBridge {
    fn find_scene_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Scene>, LightsOnError>> + Send {
        let r = self
            .reachable()
            .map(|state| state.scenes.iter().find(|scene| scene.name == name).cloned());
        async { r }
    }

    fn get_all_lights(&self) -> impl Future<Output = Result<Vec<LightState>, LightsOnError>> + Send {
        let r = self.reachable().map(|state| state.lights.clone());
        async { r }
    }

    fn set_all_power(&self, on: bool) -> impl Future<Output = Result<(), LightsOnError>> + Send {
        let r = self.set_power(on);
        async { r }
    }

    fn recall_scene(&self, name: &str) -> impl Future<Output = Result<(), LightsOnError>> + Send {
        let r = self.recall(name);
        async { r }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lightson_domain::id::LightId;

    fn bridge() -> VirtualBridge {
        VirtualBridge::new()
            .with_light("Living room")
            .with_light("Kitchen")
            .with_light("Bedroom")
            .with_scene("Evening", &["Living room", "Kitchen"])
    }

    #[tokio::test]
    async fn should_find_scene_by_name() {
        let bridge = bridge();
        let scene = bridge.find_scene_by_name("Evening").await.unwrap().unwrap();
        assert_eq!(scene.name, "Evening");
        assert_eq!(scene.lights.len(), 2);
        assert!(bridge.find_scene_by_name("Disco").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_assign_ids_in_insertion_order() {
        let bridge = bridge();
        let ids: Vec<_> = bridge.lights().into_iter().map(|light| light.id).collect();
        assert_eq!(ids, vec![LightId::new("1"), LightId::new("2"), LightId::new("3")]);

        let scene = bridge.find_scene_by_name("Evening").await.unwrap().unwrap();
        assert_eq!(scene.id.as_str(), "scene-1");
        assert_eq!(scene.lights, vec![LightId::new("1"), LightId::new("2")]);
    }

    #[tokio::test]
    async fn should_start_with_all_lights_off() {
        let lights = bridge().get_all_lights().await.unwrap();
        assert_eq!(lights.len(), 3);
        assert!(lights.iter().all(|light| !light.on));
    }

    #[tokio::test]
    async fn should_turn_on_scene_lights_when_recalled() {
        let bridge = bridge();
        bridge.recall_scene("Evening").await.unwrap();

        let on: Vec<_> = bridge
            .lights()
            .into_iter()
            .filter(|light| light.on)
            .map(|light| light.name)
            .collect();
        assert_eq!(on, vec!["Living room".to_string(), "Kitchen".to_string()]);
        assert_eq!(bridge.recalled_scenes(), vec!["Evening".to_string()]);
    }

    #[tokio::test]
    async fn should_return_not_found_when_recalling_unknown_scene() {
        let result = bridge().recall_scene("Disco").await;
        assert!(matches!(result, Err(LightsOnError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_power_everything_off_and_count_calls() {
        let bridge = bridge();
        bridge.set_light("Bedroom", true);
        bridge.set_all_power(false).await.unwrap();

        assert!(bridge.lights().iter().all(|light| !light.on));
        assert_eq!(bridge.power_off_calls(), 1);
    }

    #[tokio::test]
    async fn should_fail_every_call_while_unreachable() {
        let bridge = bridge();
        bridge.set_unreachable(true);

        assert!(matches!(
            bridge.get_all_lights().await,
            Err(LightsOnError::Actuator(_))
        ));
        assert!(bridge.set_all_power(false).await.is_err());
        assert!(bridge.recall_scene("Evening").await.is_err());
        assert_eq!(bridge.power_off_calls(), 0);

        bridge.set_unreachable(false);
        assert!(bridge.get_all_lights().await.is_ok());
    }

    #[test]
    fn should_report_unknown_light_on_manual_switch() {
        assert!(!bridge().set_light("Garage", true));
    }
}
