use serde_json::Value;

use crate::error::SceneError;
use crate::render::{RenderTarget, WindowId};
use crate::scene::{LoadContext, Scene};

type UpdateHook = Box<dyn FnMut(f64) + Send>;

/// Runs one scene picked out of a document of scene descriptions.
///
/// # Example
///
/// ```rust
/// use strata2d::{
///     AssetManager, ComponentFactory, LayerFactory, LoadContext, RecordingTarget, SceneState,
///     SimulationConfig, WindowId,
/// };
///
/// let scenes = serde_json::json!({
///     "scenes": [{ "id": "intro", "width": 100, "height": 100, "layers": [] }]
/// });
/// let layers = LayerFactory::with_builtins();
/// let components = ComponentFactory::with_builtins();
/// let assets = AssetManager::new();
/// let config = SimulationConfig::default();
/// let ctx = LoadContext { layers: &layers, components: &components, assets: &assets, config: &config };
///
/// let mut state = SceneState::new(&scenes, "intro", WindowId(0), &ctx).unwrap();
/// state.update(16.0);
/// state.render(&mut RecordingTarget::new(100, 100));
/// ```
pub struct SceneState {
    scene_id: String,
    window: WindowId,
    scene: Scene,
    update_hooks: Vec<UpdateHook>,
}

impl SceneState {
    /// Loads the entry of `descriptors["scenes"]` whose `id` is `scene_id`.
    pub fn new(
        descriptors: &Value,
        scene_id: &str,
        window: WindowId,
        ctx: &LoadContext<'_>,
    ) -> Result<Self, SceneError> {
        let description = descriptors
            .get("scenes")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .find(|scene| scene.get("id").and_then(Value::as_str) == Some(scene_id))
            .ok_or_else(|| SceneError::DoesNotExist(scene_id.to_string()))?;

        Ok(Self {
            scene_id: scene_id.to_string(),
            window,
            scene: Scene::load(description, ctx)?,
            update_hooks: Vec::new(),
        })
    }

    pub fn scene_id(&self) -> &str {
        &self.scene_id
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    /// The running scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Updates the scene, then runs each hook with the same timestep.
    pub fn update(&mut self, timestep_ms: f64) {
        self.scene.update(timestep_ms);
        for hook in &mut self.update_hooks {
            hook(timestep_ms);
        }
    }

    /// Draws the scene into this state's window.
    pub fn render(&mut self, target: &mut dyn RenderTarget) {
        self.scene.render(target, self.window);
    }

    /// Hooks run after every update, in the order they were added.
    pub fn add_update_hook(&mut self, hook: impl FnMut(f64) + Send + 'static) {
        self.update_hooks.push(Box::new(hook));
    }

    /// Forwards to [`Scene::set_end_scene_callback`].
    pub fn set_end_scene_callback(&mut self, callback: impl FnMut() + Send + 'static) {
        self.scene.set_end_scene_callback(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetManager;
    use crate::component::ComponentFactory;
    use crate::config::SimulationConfig;
    use crate::layer::LayerFactory;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn build(scene_id: &str) -> Result<SceneState, SceneError> {
        let layers = LayerFactory::with_builtins();
        let components = ComponentFactory::with_builtins();
        let assets = AssetManager::new();
        let config = SimulationConfig::default();
        let descriptors = json!({
            "scenes": [
                { "id": "intro", "width": 10, "height": 10, "layers": [] },
                { "id": "level1", "width": 300, "height": 200, "layers": [],
                  "objects": [{ "position": { "x": 1, "y": 1 } }] }
            ]
        });
        SceneState::new(
            &descriptors,
            scene_id,
            WindowId(3),
            &LoadContext {
                layers: &layers,
                components: &components,
                assets: &assets,
                config: &config,
            },
        )
    }

    #[test]
    fn picks_scene_by_id() {
        let state = build("level1").unwrap();
        assert_eq!(state.scene_id(), "level1");
        assert_eq!(state.scene().width(), 300.0);
        assert_eq!(state.scene().objects().len(), 1);
    }

    #[test]
    fn unknown_scene_is_an_error() {
        let err = build("level9").err().unwrap();
        assert!(matches!(err, SceneError::DoesNotExist(id) if id == "level9"));
    }

    #[test]
    fn hooks_run_after_each_update() {
        let mut state = build("intro").unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let first = seen.clone();
        state.add_update_hook(move |ms| first.lock().unwrap().push(("first", ms)));
        let second = seen.clone();
        state.add_update_hook(move |ms| second.lock().unwrap().push(("second", ms)));

        state.update(16.0);
        state.update(8.0);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![("first", 16.0), ("second", 16.0), ("first", 8.0), ("second", 8.0)]
        );
    }

    #[test]
    fn renders_to_its_window() {
        let mut state = build("intro").unwrap();
        let mut target = crate::render::RecordingTarget::new(40, 30);
        state.render(&mut target);
        assert_eq!(state.window(), WindowId(3));
        assert_eq!(state.scene().camera().width(), 40.0);
    }
}
