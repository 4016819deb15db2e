//! Live 2D scenes: ordered layers, the objects moving over them, and the
//! camera that frames both.
//!
//! A scene is built from a JSON description:
//!
//! ```json
//! {
//!   "width": 640, "height": 480,
//!   "layers": [
//!     { "type": "ImageLayer", "order": 0, "asset_id": "sky",
//!       "position": { "x": 0, "y": 0, "width": 640, "height": 480 } }
//!   ],
//!   "objects": [
//!     { "position": { "x": 10, "y": 10 },
//!       "components": [ { "component_type": "physics", "component_subtype": "BoxCollider",
//!                         "box": { "x": 0, "y": 0, "width": 8, "height": 8 } } ] }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use crossbeam_channel::Receiver;
use serde_json::Value;

use crate::assets::AssetManager;
use crate::camera::Camera;
use crate::collision::{detect_mbr_collision, CollisionClass, CollisionType};
use crate::component::{ComponentFactory, ComponentKind};
use crate::config::SimulationConfig;
use crate::error::SceneError;
use crate::events::{EventChannel, SceneEvent};
use crate::geometry::Rectangle;
use crate::layer::{Layer, LayerFactory};
use crate::math::Vector;
use crate::object::{GameObject, ObjectId};
use crate::object_manager::{ObjectManager, SimpleObjectManager};
use crate::render::{RenderTarget, WindowId};

/// Everything scene loading needs besides the description itself.
#[derive(Clone, Copy)]
pub struct LoadContext<'a> {
    pub layers: &'a LayerFactory,
    pub components: &'a ComponentFactory,
    pub assets: &'a AssetManager,
    pub config: &'a SimulationConfig,
}

type EndSceneCallback = Box<dyn FnMut() + Send>;

/// A world of ordered layers and objects seen through one camera.
///
/// Lower layer orders are nearer the viewer and collide first.
pub struct Scene {
    width: f64,
    height: f64,
    layers: BTreeMap<i32, Box<dyn Layer>>,
    object_manager: Box<dyn ObjectManager>,
    camera: Camera,
    events: EventChannel,
    config: SimulationConfig,
    end_scene: Option<EndSceneCallback>,
}

impl Scene {
    /// An empty scene of the given world size.
    pub fn new(width: f64, height: f64, config: SimulationConfig) -> Self {
        Self {
            width,
            height,
            layers: BTreeMap::new(),
            object_manager: Box::new(SimpleObjectManager::new()),
            camera: Camera::new(config.viewport_width as f64, config.viewport_height as f64),
            events: EventChannel::new(),
            config,
            end_scene: None,
        }
    }

    /// Builds a scene from its description.
    ///
    /// A malformed scene or layer is an error. Objects that fail to build are
    /// logged, reported as [`SceneEvent::ObjectSkipped`] and left out.
    pub fn load(json: &Value, ctx: &LoadContext<'_>) -> Result<Self, SceneError> {
        let width: f64 = required(json, "width")?;
        let height: f64 = required(json, "height")?;
        let layers = json
            .get("layers")
            .and_then(Value::as_array)
            .ok_or(SceneError::MissingField("layers"))?;

        let mut scene = Self::new(width, height, ctx.config.clone());
        for description in layers {
            let order: i32 = required(description, "order")?;
            let layer = ctx.layers.make_layer(description, ctx)?;
            if let Some(previous) = scene.add_layer(order, layer) {
                log::warn!(
                    "Layer {} at order {order} replaced by a later layer",
                    previous.layer_type()
                );
            }
        }

        let objects = json.get("objects").and_then(Value::as_array);
        for (index, description) in objects.into_iter().flatten().enumerate() {
            match GameObject::from_json(description, ctx.components, ctx.config.default_orientation) {
                Ok(object) => {
                    scene.add_object(object);
                }
                Err(e) => {
                    log::warn!("Skipping object {index}: {e}");
                    scene.events.publish(SceneEvent::ObjectSkipped {
                        index,
                        reason: e.to_string(),
                    });
                }
            }
        }

        log::info!(
            "Loaded {width}x{height} scene with {} layers and {} objects",
            scene.layers.len(),
            scene.object_manager.len()
        );
        Ok(scene)
    }

    /// Replaces the object manager, moving any objects already loaded.
    #[must_use]
    pub fn with_object_manager(mut self, mut manager: Box<dyn ObjectManager>) -> Self {
        manager
            .objects_mut()
            .extend(self.object_manager.objects_mut().drain(..));
        self.object_manager = manager;
        self
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// The world rectangle the scene covers.
    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(0.0, 0.0, self.width, self.height)
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Inserts a layer, returning the one previously at `order`.
    pub fn add_layer(&mut self, order: i32, layer: Box<dyn Layer>) -> Option<Box<dyn Layer>> {
        self.layers.insert(order, layer)
    }

    /// The layer stored at `order`.
    pub fn layer(&self, order: i32) -> Option<&dyn Layer> {
        self.layers.get(&order).map(|l| &**l)
    }

    /// Layers by ascending order.
    pub fn layers(&self) -> impl Iterator<Item = (i32, &dyn Layer)> + '_ {
        self.layers.iter().map(|(order, l)| (*order, &**l))
    }

    /// Adds an object, wiring it to this scene's event channel.
    pub fn add_object(&mut self, mut object: GameObject) -> ObjectId {
        object.set_event_sink(Some(self.events.sender()));
        self.object_manager.add_object(object)
    }

    pub fn objects(&self) -> &[Arc<GameObject>] {
        self.object_manager.objects()
    }

    pub fn object(&self, id: ObjectId) -> Option<&Arc<GameObject>> {
        self.object_manager.find(id)
    }

    pub fn object_manager(&self) -> &dyn ObjectManager {
        self.object_manager.as_ref()
    }

    pub fn object_manager_mut(&mut self) -> &mut dyn ObjectManager {
        self.object_manager.as_mut()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Centres the camera on an object, kept inside the scene bounds.
    /// Returns `false` if no such object exists.
    pub fn center_camera_on(&mut self, id: ObjectId) -> bool {
        let Some(target) = self.object(id).map(|o| o.bounding_polygon()) else {
            return false;
        };
        let bounds = self.bounds();
        self.camera.center(&target, Some(&bounds));
        true
    }

    /// A receiver for this scene's events. Every clone sees each event once
    /// between them.
    pub fn events(&self) -> Receiver<SceneEvent> {
        self.events.receiver()
    }

    /// Everything published since the last drain, oldest first.
    pub fn drain_events(&self) -> Vec<SceneEvent> {
        self.events.drain()
    }

    pub fn set_end_scene_callback(&mut self, callback: impl FnMut() + Send + 'static) {
        self.end_scene = Some(Box::new(callback));
    }

    /// Signals that the scene is finished. Does nothing without a callback.
    pub fn end_scene(&mut self) {
        if let Some(callback) = &mut self.end_scene {
            callback();
        }
    }

    /// Advances the scene by one step.
    ///
    /// Each object is updated in collection order. Its next state is pushed
    /// out of collidable layers, then tested against every object after it;
    /// both sides of an overlap are told about the other. The new state
    /// replaces the old one before the next object runs.
    pub fn update(&mut self, timestep_ms: f64) {
        let removed = self.object_manager.remove_dead_objects();
        if removed > 0 {
            log::debug!("Removed {removed} dead objects");
        }

        for layer in self.layers.values_mut() {
            layer.update(timestep_ms);
        }

        for i in 0..self.object_manager.len() {
            let mut candidate = self.object_manager.objects()[i].update(timestep_ms);

            for (order, layer) in self.layers.iter().filter(|(_, l)| l.can_collide()) {
                if layer.check_collisions(&candidate).is_empty() {
                    continue;
                }
                if !layer.resolve_collisions(&mut candidate) {
                    log::warn!(
                        "Could not resolve collision of object {} with layer {order}",
                        candidate.id()
                    );
                    self.events.publish(SceneEvent::ResolveFailed {
                        object: candidate.id(),
                        layer_order: *order,
                    });
                }
            }

            let objects = self.object_manager.objects_mut();
            let bounds = candidate.bounding_polygon();
            for other in objects.iter_mut().skip(i + 1) {
                let collision = detect_mbr_collision(&bounds, &other.bounding_polygon());
                if collision == CollisionType::None {
                    continue;
                }
                let other = Arc::make_mut(other);
                candidate.handle_collision(
                    collision,
                    CollisionClass::Unknown,
                    Some(&*other),
                    Vector::ZERO,
                );
                other.handle_collision(
                    collision,
                    CollisionClass::Unknown,
                    Some(&candidate),
                    Vector::ZERO,
                );
            }
            objects[i] = Arc::new(candidate);
        }
    }

    /// Draws layers back to front (highest order first), then every visible
    /// object's graphics components.
    pub fn render(&mut self, target: &mut dyn RenderTarget, window: WindowId) {
        let (width, height) = target.logical_resolution(window);
        self.camera.set_size(width as f64, height as f64);

        for layer in self.layers.values().rev() {
            layer.render(&self.camera, target, window);
        }

        for object in self.object_manager.objects_in(&self.camera.visible_world()) {
            for component in object.components_of_kind(ComponentKind::Graphics) {
                if let Some(graphics) = component.as_graphics() {
                    graphics.render(&object, &self.camera, target, window);
                }
            }
        }
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("layers", &self.layers.len())
            .field("objects", &self.object_manager.len())
            .field("camera", &self.camera)
            .finish()
    }
}

fn required<T: serde::de::DeserializeOwned>(
    json: &Value,
    field: &'static str,
) -> Result<T, SceneError> {
    let value = json.get(field).ok_or(SceneError::MissingField(field))?;
    serde_json::from_value(value.clone()).map_err(|source| SceneError::InvalidField { field, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{BoxCollider, Component, PhysicsComponent, RigidBody};
    use crate::layer::ImageLayer;
    use crate::object::{Metadata, ObjectState};
    use crate::render::{DrawCommand, RecordingTarget, TextureHandle};
    use serde_json::json;
    use std::any::Any;
    use std::sync::Mutex;

    /// Records every collision it is offered.
    #[derive(Debug)]
    struct Recorder {
        hits: Arc<Mutex<Vec<(ObjectId, Option<ObjectId>, CollisionClass)>>>,
        metadata: Metadata,
    }

    impl Component for Recorder {
        fn kind(&self) -> ComponentKind {
            ComponentKind::Physics
        }
        fn subtype(&self) -> &str {
            "Recorder"
        }
        fn clone_component(&self) -> Arc<dyn Component> {
            Arc::new(Recorder {
                hits: self.hits.clone(),
                metadata: self.metadata.clone(),
            })
        }
        fn metadata(&self) -> &Metadata {
            &self.metadata
        }
        fn as_physics(&self) -> Option<&dyn PhysicsComponent> {
            Some(self)
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    impl PhysicsComponent for Recorder {
        fn handle_collision(
            &self,
            object: &mut GameObject,
            _collision_type: CollisionType,
            class: CollisionClass,
            other: Option<&GameObject>,
            _location: Vector,
        ) -> bool {
            self.hits
                .lock()
                .unwrap()
                .push((object.id(), other.map(GameObject::id), class));
            true
        }
    }

    fn recorded_box(
        x: f64,
        hits: &Arc<Mutex<Vec<(ObjectId, Option<ObjectId>, CollisionClass)>>>,
    ) -> GameObject {
        GameObject::new()
            .with_position(Vector::new(x, 0.0))
            .with_component(Arc::new(BoxCollider::new(Rectangle::new(0.0, 0.0, 4.0, 4.0))))
            .with_component(Arc::new(Recorder {
                hits: hits.clone(),
                metadata: Metadata::new(),
            }))
    }

    fn load(json: Value) -> Result<Scene, SceneError> {
        let layers = LayerFactory::with_builtins();
        let components = ComponentFactory::with_builtins();
        let mut assets = AssetManager::new();
        assets.insert_texture("sky", 64, 64);
        let config = SimulationConfig::default();
        Scene::load(
            &json,
            &LoadContext {
                layers: &layers,
                components: &components,
                assets: &assets,
                config: &config,
            },
        )
    }

    #[test]
    fn missing_fields_abort_loading() {
        assert!(matches!(
            load(json!({ "height": 10, "layers": [] })),
            Err(SceneError::MissingField("width"))
        ));
        assert!(matches!(
            load(json!({ "width": 10, "height": 10 })),
            Err(SceneError::MissingField("layers"))
        ));
        assert!(matches!(
            load(json!({
                "width": 10, "height": 10,
                "layers": [{ "type": "ImageLayer", "asset_id": "sky",
                             "position": { "x": 0, "y": 0, "width": 1, "height": 1 } }]
            })),
            Err(SceneError::MissingField("order"))
        ));
        assert!(matches!(
            load(json!({ "width": "wide", "height": 10, "layers": [] })),
            Err(SceneError::InvalidField { field: "width", .. })
        ));
    }

    #[test]
    fn unknown_layer_type_aborts_loading() {
        let err = load(json!({
            "width": 10, "height": 10,
            "layers": [{ "type": "VectorCollisionLayer", "order": 0 }]
        }))
        .unwrap_err();
        assert!(matches!(err, SceneError::Creation(_)));
    }

    #[test]
    fn bad_objects_are_skipped() {
        let scene = load(json!({
            "width": 100, "height": 100,
            "layers": [{ "type": "ImageLayer", "order": 0, "asset_id": "sky",
                         "position": { "x": 0, "y": 0, "width": 64, "height": 64 } }],
            "objects": [
                { "position": { "x": 1, "y": 2 } },
                { "components": [{ "component_type": "physics", "component_subtype": "Teleporter" }] },
                { "position": { "x": 3, "y": 4 } }
            ]
        }))
        .unwrap();

        assert_eq!(scene.objects().len(), 2);
        assert_eq!(scene.objects()[1].position, Vector::new(3.0, 4.0));
        let events = scene.drain_events();
        assert!(matches!(
            events.as_slice(),
            [SceneEvent::ObjectSkipped { index: 1, .. }]
        ));
    }

    #[test]
    fn overlapping_pairs_hear_about_each_other_once() {
        let hits = Arc::new(Mutex::new(Vec::new()));
        let mut scene = Scene::new(100.0, 100.0, SimulationConfig::default());
        let a = scene.add_object(recorded_box(0.0, &hits));
        let b = scene.add_object(recorded_box(2.0, &hits));
        let far = scene.add_object(recorded_box(50.0, &hits));

        scene.update(16.0);

        let hits = hits.lock().unwrap().clone();
        assert_eq!(
            hits,
            vec![
                (a, Some(b), CollisionClass::Unknown),
                (b, Some(a), CollisionClass::Unknown),
            ]
        );
        assert!(hits.iter().all(|(object, _, _)| *object != far));

        let collisions = scene
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, SceneEvent::Collision { .. }))
            .count();
        assert_eq!(collisions, 2);
    }

    #[test]
    fn update_keeps_query_snapshots_intact() {
        let mut scene = Scene::new(100.0, 100.0, SimulationConfig::default());
        let mut moving = GameObject::new().with_component(Arc::new(RigidBody::new(1.0)));
        moving.velocity = Vector::new(100.0, 0.0);
        let id = scene.add_object(moving);
        let snapshot = scene.objects()[0].clone();

        scene.update(10.0);

        assert_eq!(snapshot.position, Vector::ZERO);
        assert_eq!(scene.object(id).unwrap().position, Vector::new(1.0, 0.0));
    }

    #[test]
    fn dead_objects_are_swept_before_update() {
        let mut scene = Scene::new(100.0, 100.0, SimulationConfig::default());
        let mut dead = GameObject::new();
        dead.set_state(ObjectState::Dead);
        scene.add_object(dead);
        let alive = scene.add_object(GameObject::new());
        scene.update(16.0);
        let ids: Vec<_> = scene.objects().iter().map(|o| o.id()).collect();
        assert_eq!(ids, vec![alive]);
    }

    #[test]
    fn layers_render_highest_order_first() {
        let mut scene = Scene::new(100.0, 100.0, SimulationConfig::default());
        let full = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        scene.add_layer(0, Box::new(ImageLayer::new("a", TextureHandle(1), full)));
        scene.add_layer(5, Box::new(ImageLayer::new("b", TextureHandle(2), full)));
        let mut target = RecordingTarget::new(200, 150);
        scene.render(&mut target, WindowId(0));

        assert_eq!(scene.camera().width(), 200.0);
        assert_eq!(scene.camera().height(), 150.0);
        let textures: Vec<u32> = target
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Texture { texture, .. } => Some(texture.id()),
                _ => None,
            })
            .collect();
        assert_eq!(textures, vec![2, 1]);
    }

    #[test]
    fn end_scene_runs_callback() {
        let ended = Arc::new(Mutex::new(false));
        let mut scene = Scene::new(10.0, 10.0, SimulationConfig::default());
        scene.end_scene();
        let flag = ended.clone();
        scene.set_end_scene_callback(move || *flag.lock().unwrap() = true);
        scene.end_scene();
        assert!(*ended.lock().unwrap());
    }

    #[test]
    fn camera_follows_object_within_bounds() {
        let mut scene = Scene::new(100.0, 100.0, SimulationConfig::default().with_viewport(20, 20));
        let id = scene.add_object(GameObject::new().with_position(Vector::new(95.0, 50.0)));
        assert!(scene.center_camera_on(id));
        assert_eq!(scene.camera().position().x, 80.0);
        assert_eq!(scene.camera().position().y, 40.5);
    }
}
