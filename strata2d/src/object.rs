//! Game objects: kinematic state plus a list of shared components.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::collision::{CollisionClass, CollisionType};
use crate::component::{Component, ComponentFactory, ComponentKind};
use crate::error::CreationError;
use crate::events::{EventSender, SceneEvent};
use crate::geometry::{join, Rectangle};
use crate::math::Vector;

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_MESSAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique object identifier. Never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(u64);

impl ObjectId {
    fn next() -> Self {
        let id = NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed);
        log::debug!("Allocated object id {id}");
        Self(id)
    }

    /// The raw id, e.g. for logs or external lookups.
    pub fn to_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of an object. `Dead` objects are removed at the start of the
/// next scene update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectState {
    Inactive,
    Starting,
    #[default]
    Active,
    Dying,
    Dead,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    #[default]
    Ai,
    Player,
}

/// Which way `y` grows for an object's coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YAxisOrientation {
    /// `y = 0` is the top edge and grows downwards (screen convention).
    #[default]
    TopZero,
    /// `y = 0` is the bottom edge and grows upwards.
    BottomZero,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

pub type Metadata = BTreeMap<String, MetadataValue>;

/// A pair of objects (or an object and a layer) whose bounds overlap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollisionEvent {
    pub first: usize,
    pub second: usize,
    pub collision_type: CollisionType,
    pub class: CollisionClass,
}

/// An entity in a scene.
///
/// Cloning is cheap: the clone shares its components with the original.
/// Use [`GameObject::deep_clone`] for independent components.
#[derive(Clone, Debug)]
pub struct GameObject {
    id: ObjectId,
    parent: Option<ObjectId>,
    /// Centre of the object in world coordinates.
    pub position: Vector,
    /// Position before the last physics step.
    pub previous_position: Vector,
    pub orientation: Vector,
    /// World units per second.
    pub velocity: Vector,
    pub acceleration: Vector,
    /// Divided by a rigid body's mass and added to the acceleration.
    pub force: Vector,
    state: ObjectState,
    object_type: ObjectType,
    y_orientation: YAxisOrientation,
    metadata: Metadata,
    components: Vec<Arc<dyn Component>>,
    events: Option<EventSender>,
}

impl Default for GameObject {
    fn default() -> Self {
        Self::new()
    }
}

impl GameObject {
    /// An active object at the origin with a fresh id and no components.
    pub fn new() -> Self {
        Self {
            id: ObjectId::next(),
            parent: None,
            position: Vector::ZERO,
            previous_position: Vector::ZERO,
            orientation: Vector::ZERO,
            velocity: Vector::ZERO,
            acceleration: Vector::ZERO,
            force: Vector::ZERO,
            state: ObjectState::default(),
            object_type: ObjectType::default(),
            y_orientation: YAxisOrientation::default(),
            metadata: Metadata::new(),
            components: Vec::new(),
            events: None,
        }
    }

    /// Builds an object from a scene description.
    ///
    /// Recognised keys: `position`, `orientation`, `velocity`,
    /// `y_orientation`, `object_type`, `metadata` and `components`.
    pub fn from_json(
        json: &Value,
        factory: &ComponentFactory,
        default_orientation: YAxisOrientation,
    ) -> Result<Self, CreationError> {
        fn field<T: serde::de::DeserializeOwned>(
            json: &Value,
            key: &str,
        ) -> Result<Option<T>, CreationError> {
            json.get(key)
                .map(|v| {
                    serde_json::from_value(v.clone()).map_err(|e| {
                        CreationError::new("object", "", format!("invalid `{key}`: {e}"), json)
                    })
                })
                .transpose()
        }

        let mut object = Self::new().with_y_axis_orientation(
            field(json, "y_orientation")?.unwrap_or(default_orientation),
        );
        if let Some(position) = field::<Vector>(json, "position")? {
            object.position = position;
            object.previous_position = position;
        }
        if let Some(orientation) = field(json, "orientation")? {
            object.orientation = orientation;
        }
        if let Some(velocity) = field(json, "velocity")? {
            object.velocity = velocity;
        }
        if let Some(object_type) = field(json, "object_type")? {
            object.object_type = object_type;
        }
        if let Some(metadata) = field(json, "metadata")? {
            object.metadata = metadata;
        }
        if let Some(components) = json.get("components").and_then(Value::as_array) {
            for description in components {
                object.add_component(factory.make_component(description)?);
            }
        }
        Ok(object)
    }

    /// Stable across updates and shallow clones.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// The owning object, if any.
    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    pub fn set_parent(&mut self, parent: Option<ObjectId>) {
        self.parent = parent;
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ObjectState {
        self.state
    }

    /// Changes lifecycle state, reporting the transition to the event sink.
    pub fn set_state(&mut self, state: ObjectState) {
        if state == self.state {
            return;
        }
        let from = std::mem::replace(&mut self.state, state);
        if let Some(events) = &self.events {
            let _ = events.send(SceneEvent::StateChanged {
                object: self.id,
                from,
                to: state,
            });
        }
    }

    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    pub fn set_object_type(&mut self, object_type: ObjectType) {
        self.object_type = object_type;
    }

    /// How this object's `y` coordinates should be read.
    pub fn y_axis_orientation(&self) -> YAxisOrientation {
        self.y_orientation
    }

    #[must_use]
    pub fn with_y_axis_orientation(mut self, orientation: YAxisOrientation) -> Self {
        self.y_orientation = orientation;
        self
    }

    /// Places the object, also resetting `previous_position`.
    #[must_use]
    pub fn with_position(mut self, position: Vector) -> Self {
        self.position = position;
        self.previous_position = position;
        self
    }

    #[must_use]
    pub fn with_component(mut self, component: Arc<dyn Component>) -> Self {
        self.add_component(component);
        self
    }

    /// Free-form key/value data from the description.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// Where state changes and consumed collisions are reported.
    pub fn set_event_sink(&mut self, events: Option<EventSender>) {
        self.events = events;
    }

    pub fn add_component(&mut self, component: Arc<dyn Component>) {
        self.components.push(component);
    }

    /// Components in insertion order.
    pub fn components(&self) -> &[Arc<dyn Component>] {
        &self.components
    }

    pub fn components_of_kind(
        &self,
        kind: ComponentKind,
    ) -> impl Iterator<Item = &Arc<dyn Component>> + '_ {
        self.components.iter().filter(move |c| c.kind() == kind)
    }

    /// Components of concrete type `T`.
    pub fn components_of<T: Component + 'static>(&self) -> impl Iterator<Item = &T> + '_ {
        self.components
            .iter()
            .filter_map(|c| c.as_any().downcast_ref::<T>())
    }

    /// Returns the next state of this object. `self` is left untouched.
    ///
    /// Components run by kind (input, physics, custom, AI) and in insertion
    /// order within a kind. Graphics components are not updated.
    pub fn update(&self, timestep_ms: f64) -> GameObject {
        let mut next = self.clone();
        for kind in ComponentKind::UPDATE_ORDER {
            for component in self.components_of_kind(kind) {
                component.update(&mut next, timestep_ms);
            }
        }
        next
    }

    /// Union of every physics component's bounds, if any component has one.
    pub fn physics_bounds(&self) -> Option<Rectangle> {
        self.components
            .iter()
            .filter_map(|c| c.as_physics())
            .filter_map(|p| p.bounding_polygon(self))
            .reduce(|acc, r| join(&acc, &r))
    }

    /// Physics bounds, or a 1x1 rectangle at the rounded position.
    pub fn bounding_polygon(&self) -> Rectangle {
        self.physics_bounds().unwrap_or_else(|| {
            Rectangle::new(self.position.x.round(), self.position.y.round(), 1.0, 1.0)
        })
    }

    /// Offers a collision to each physics component in order until one
    /// consumes it.
    pub fn handle_collision(
        &mut self,
        collision_type: CollisionType,
        class: CollisionClass,
        other: Option<&GameObject>,
        location: Vector,
    ) -> bool {
        let components = self.components.clone();
        let handled = components
            .iter()
            .filter_map(|c| c.as_physics())
            .any(|p| p.handle_collision(self, collision_type, class, other, location));
        if handled {
            if let Some(events) = &self.events {
                let _ = events.send(SceneEvent::Collision {
                    object: self.id,
                    other: other.map(GameObject::id),
                    class,
                    side: collision_type,
                });
            }
        }
        handled
    }

    /// Delivers a message to every component.
    pub fn send(&mut self, message_id: u64, message: &str) {
        let components = self.components.clone();
        for component in &components {
            component.receive(self, message_id, message);
        }
    }

    /// Allocates a process-unique message id.
    pub fn next_message_id() -> u64 {
        NEXT_MESSAGE_ID.fetch_add(1, Ordering::Relaxed)
    }

    /// Clone with independent copies of every component.
    pub fn deep_clone(&self) -> GameObject {
        let mut copy = self.clone();
        copy.components = self
            .components
            .iter()
            .map(|c| c.clone_component())
            .collect();
        copy
    }

    /// The same object under a fresh id.
    #[must_use]
    pub fn with_new_id(mut self) -> Self {
        self.id = ObjectId::next();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{BoxCollider, NullComponent, PhysicsComponent, RigidBody};
    use std::any::Any;
    use std::sync::Mutex;

    /// Records the order components run in and the messages they see.
    #[derive(Debug)]
    struct Tracer {
        kind: ComponentKind,
        log: Arc<Mutex<Vec<String>>>,
        metadata: Metadata,
    }

    impl Tracer {
        fn new(kind: ComponentKind, log: &Arc<Mutex<Vec<String>>>) -> Arc<dyn Component> {
            Arc::new(Self {
                kind,
                log: log.clone(),
                metadata: Metadata::new(),
            })
        }
    }

    impl Component for Tracer {
        fn kind(&self) -> ComponentKind {
            self.kind
        }
        fn subtype(&self) -> &str {
            "Tracer"
        }
        fn update(&self, object: &mut GameObject, _timestep_ms: f64) {
            object.position.x += 1.0;
            self.log.lock().unwrap().push(self.kind.to_string());
        }
        fn receive(&self, _object: &mut GameObject, message_id: u64, message: &str) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{message_id}:{message}", self.kind));
        }
        fn clone_component(&self) -> Arc<dyn Component> {
            Arc::new(Self {
                kind: self.kind,
                log: self.log.clone(),
                metadata: self.metadata.clone(),
            })
        }
        fn metadata(&self) -> &Metadata {
            &self.metadata
        }
        fn as_physics(&self) -> Option<&dyn PhysicsComponent> {
            (self.kind == ComponentKind::Physics).then_some(self as &dyn PhysicsComponent)
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    impl PhysicsComponent for Tracer {
        fn handle_collision(
            &self,
            _object: &mut GameObject,
            collision_type: CollisionType,
            _class: CollisionClass,
            _other: Option<&GameObject>,
            _location: Vector,
        ) -> bool {
            self.log.lock().unwrap().push(format!("hit:{collision_type}"));
            true
        }
    }

    /// Rewrites every part of the object it is handed.
    #[derive(Debug)]
    struct Rewriter {
        metadata: Metadata,
    }

    impl Component for Rewriter {
        fn kind(&self) -> ComponentKind {
            ComponentKind::Custom
        }
        fn subtype(&self) -> &str {
            "Rewriter"
        }
        fn update(&self, object: &mut GameObject, _timestep_ms: f64) {
            object.position += Vector::new(3.0, 4.0);
            object.previous_position = Vector::new(-1.0, -1.0);
            object.orientation = Vector::new(0.0, 1.0);
            object.velocity += Vector::new(5.0, 6.0);
            object.acceleration = Vector::new(7.0, 8.0);
            object.force = Vector::new(9.0, 10.0);
            object.set_parent(Some(object.id()));
            object.set_state(ObjectState::Dying);
            object.set_object_type(ObjectType::Player);
            object.metadata_mut().insert("rewritten".into(), MetadataValue::Int(1));
            object.add_component(Arc::new(NullComponent::new(ComponentKind::Ai)));
        }
        fn clone_component(&self) -> Arc<dyn Component> {
            Arc::new(Self {
                metadata: self.metadata.clone(),
            })
        }
        fn metadata(&self) -> &Metadata {
            &self.metadata
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn ids_are_unique_and_kept_by_clone() {
        let a = GameObject::new();
        let b = GameObject::new();
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone().id(), a.id());
        assert_eq!(a.update(16.0).id(), a.id());
        assert_ne!(a.clone().with_new_id().id(), a.id());
    }

    #[test]
    fn defaults() {
        let object = GameObject::new();
        assert_eq!(object.state(), ObjectState::Active);
        assert_eq!(object.y_axis_orientation(), YAxisOrientation::TopZero);
        assert_eq!(object.bounding_polygon(), Rectangle::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn update_leaves_receiver_untouched() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let object = GameObject::new().with_component(Tracer::new(ComponentKind::Physics, &log));
        let next = object.update(16.0);
        assert_eq!(object.position, Vector::ZERO);
        assert_eq!(next.position.x, 1.0);
    }

    #[test]
    fn update_leaves_every_field_of_receiver_untouched() {
        let mut object = GameObject::new()
            .with_position(Vector::new(1.0, 2.0))
            .with_component(Arc::new(RigidBody::new(1.0)))
            .with_component(Arc::new(Rewriter {
                metadata: Metadata::new(),
            }));
        object.velocity = Vector::new(10.0, -20.0);
        object.metadata_mut().insert("name".into(), "crate".into());

        let position = object.position;
        let previous_position = object.previous_position;
        let velocity = object.velocity;
        let metadata = object.metadata().clone();
        let subtypes: Vec<String> = object
            .components()
            .iter()
            .map(|c| c.subtype().to_string())
            .collect();

        let next = object.update(16.0);

        assert_eq!(object.position, position);
        assert_eq!(object.previous_position, previous_position);
        assert_eq!(object.orientation, Vector::ZERO);
        assert_eq!(object.velocity, velocity);
        assert_eq!(object.acceleration, Vector::ZERO);
        assert_eq!(object.force, Vector::ZERO);
        assert_eq!(object.parent(), None);
        assert_eq!(object.state(), ObjectState::Active);
        assert_eq!(object.object_type(), ObjectType::Ai);
        assert_eq!(object.metadata(), &metadata);
        let after: Vec<&str> = object.components().iter().map(|c| c.subtype()).collect();
        assert_eq!(after, subtypes);

        assert_eq!(next.id(), object.id());
        assert_eq!(next.state(), ObjectState::Dying);
        assert_eq!(next.components().len(), subtypes.len() + 1);
        assert!(next.metadata().contains_key("rewritten"));
        assert_ne!(next.velocity, velocity);
    }

    #[test]
    fn update_runs_kinds_in_order_and_skips_graphics() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let object = GameObject::new()
            .with_component(Tracer::new(ComponentKind::Ai, &log))
            .with_component(Tracer::new(ComponentKind::Graphics, &log))
            .with_component(Tracer::new(ComponentKind::Custom, &log))
            .with_component(Tracer::new(ComponentKind::Physics, &log))
            .with_component(Tracer::new(ComponentKind::Input, &log));
        object.update(16.0);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["input", "physics", "custom", "ai"]
        );
    }

    #[test]
    fn bounding_polygon_joins_physics_components() {
        let object = GameObject::new()
            .with_position(Vector::new(10.0, 10.0))
            .with_component(Arc::new(BoxCollider::new(Rectangle::new(0.0, 0.0, 2.0, 2.0))))
            .with_component(Arc::new(RigidBody::new(1.0)))
            .with_component(Arc::new(BoxCollider::new(Rectangle::new(4.0, 0.0, 2.0, 2.0))));
        assert_eq!(object.bounding_polygon(), Rectangle::new(9.0, 9.0, 6.0, 2.0));
    }

    #[test]
    fn position_is_rounded_for_fallback_bounds() {
        let object = GameObject::new().with_position(Vector::new(2.6, 3.2));
        assert_eq!(object.bounding_polygon(), Rectangle::new(3.0, 3.0, 1.0, 1.0));
    }

    #[test]
    fn first_consuming_component_wins() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut object = GameObject::new()
            .with_component(Arc::new(RigidBody::new(1.0)))
            .with_component(Tracer::new(ComponentKind::Physics, &log))
            .with_component(Tracer::new(ComponentKind::Physics, &log));
        let handled =
            object.handle_collision(CollisionType::Left, CollisionClass::Unknown, None, Vector::ZERO);
        assert!(handled);
        assert_eq!(*log.lock().unwrap(), vec!["hit:Left"]);
    }

    #[test]
    fn unhandled_collision_returns_false() {
        let mut object = GameObject::new()
            .with_component(Arc::new(NullComponent::new(ComponentKind::Physics)));
        assert!(!object.handle_collision(
            CollisionType::Top,
            CollisionClass::Bitmap,
            None,
            Vector::ZERO
        ));
    }

    #[test]
    fn send_reaches_every_component() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut object = GameObject::new()
            .with_component(Tracer::new(ComponentKind::Input, &log))
            .with_component(Tracer::new(ComponentKind::Graphics, &log));
        let id = GameObject::next_message_id();
        object.send(id, "jump");
        assert_eq!(
            *log.lock().unwrap(),
            vec![format!("input:{id}:jump"), format!("graphics:{id}:jump")]
        );
        assert!(GameObject::next_message_id() > id);
    }

    #[test]
    fn clone_shares_components_deep_clone_does_not() {
        let object = GameObject::new().with_component(Arc::new(RigidBody::new(1.0)));
        let shallow = object.clone();
        let deep = object.deep_clone();
        assert!(Arc::ptr_eq(&object.components()[0], &shallow.components()[0]));
        assert!(!Arc::ptr_eq(&object.components()[0], &deep.components()[0]));
        assert_eq!(deep.components_of::<RigidBody>().count(), 1);
    }

    #[test]
    fn state_changes_are_published() {
        let channel = crate::events::EventChannel::new();
        let mut object = GameObject::new();
        object.set_event_sink(Some(channel.sender()));
        object.set_state(ObjectState::Active);
        object.set_state(ObjectState::Dead);
        assert_eq!(
            channel.drain(),
            vec![SceneEvent::StateChanged {
                object: object.id(),
                from: ObjectState::Active,
                to: ObjectState::Dead
            }]
        );
    }

    #[test]
    fn builds_from_description() {
        let factory = ComponentFactory::with_builtins();
        let json = serde_json::json!({
            "position": { "x": 5, "y": 7 },
            "metadata": { "name": "hero", "lives": 3, "speed": 1.5 },
            "components": [
                { "type": "physics", "subtype": "BoxCollider",
                  "box": { "x": 0, "y": 0, "width": 2, "height": 2 } }
            ]
        });
        let object = GameObject::from_json(&json, &factory, YAxisOrientation::BottomZero).unwrap();
        assert_eq!(object.position, Vector::new(5.0, 7.0));
        assert_eq!(object.y_axis_orientation(), YAxisOrientation::BottomZero);
        assert_eq!(object.metadata()["lives"], MetadataValue::Int(3));
        assert_eq!(object.metadata()["speed"], MetadataValue::Float(1.5));
        assert_eq!(object.metadata()["name"], MetadataValue::from("hero"));
        assert_eq!(object.components_of_kind(ComponentKind::Physics).count(), 1);
    }

    #[test]
    fn bad_component_fails_the_object() {
        let factory = ComponentFactory::with_builtins();
        let json = serde_json::json!({
            "components": [ { "type": "physics", "subtype": "Nope" } ]
        });
        assert!(GameObject::from_json(&json, &factory, YAxisOrientation::TopZero).is_err());
    }
}
