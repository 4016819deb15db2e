//! Polymorphic behaviour attached to game objects.
//!
//! A component holds no per-object state: everything it changes lives on the
//! `GameObject` it is handed. That is what lets clones of an object share
//! their components through `Arc`.

mod box_collider;
mod factory;
mod null;
mod placeholder_graphics;
mod rigid_body;

use std::any::Any;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::collision::{CollisionClass, CollisionType};
use crate::geometry::Rectangle;
use crate::math::Vector;
use crate::object::{GameObject, Metadata};
use crate::render::{RenderTarget, WindowId};

pub use box_collider::BoxCollider;
pub use factory::{ComponentConstructor, ComponentFactory};
pub use null::NullComponent;
pub use placeholder_graphics::PlaceholderGraphics;
pub use rigid_body::RigidBody;

/// Capability a component provides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentKind {
    Input,
    Physics,
    Custom,
    Ai,
    Graphics,
}

impl ComponentKind {
    /// Kinds updated each frame, in update order. Graphics only render.
    pub const UPDATE_ORDER: [ComponentKind; 4] = [
        ComponentKind::Input,
        ComponentKind::Physics,
        ComponentKind::Custom,
        ComponentKind::Ai,
    ];

    pub const ALL: [ComponentKind; 5] = [
        ComponentKind::Input,
        ComponentKind::Physics,
        ComponentKind::Custom,
        ComponentKind::Ai,
        ComponentKind::Graphics,
    ];

    /// The `type` string used in descriptions.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Input => "input",
            ComponentKind::Physics => "physics",
            ComponentKind::Custom => "custom",
            ComponentKind::Ai => "ai",
            ComponentKind::Graphics => "graphics",
        }
    }

    pub fn parse(type_tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == type_tag)
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of behaviour attached to a [`GameObject`].
///
/// Components are shared between clones of an object, so all hooks take
/// `&self` and act on the object they are handed.
pub trait Component: Send + Sync + std::fmt::Debug {
    fn kind(&self) -> ComponentKind;

    /// Concrete type name, e.g. `"BoxCollider"`.
    fn subtype(&self) -> &str;

    /// Advance `object` by one step. Called on the clone being built by
    /// `GameObject::update`.
    fn update(&self, _object: &mut GameObject, _timestep_ms: f64) {}

    /// Handles a message sent through [`GameObject::send`].
    fn receive(&self, _object: &mut GameObject, _message_id: u64, _message: &str) {}

    /// Independent copy of this component.
    fn clone_component(&self) -> Arc<dyn Component>;

    fn metadata(&self) -> &Metadata;

    fn as_physics(&self) -> Option<&dyn PhysicsComponent> {
        None
    }

    fn as_graphics(&self) -> Option<&dyn GraphicsComponent> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

/// Collision-related behaviour.
pub trait PhysicsComponent: Component {
    /// World-space bounds this component contributes, if any.
    fn bounding_polygon(&self, _object: &GameObject) -> Option<Rectangle> {
        None
    }

    /// Offered a collision; returns `true` if it consumed it.
    fn handle_collision(
        &self,
        _object: &mut GameObject,
        _collision_type: CollisionType,
        _class: CollisionClass,
        _other: Option<&GameObject>,
        _location: Vector,
    ) -> bool {
        false
    }

    fn collides(&self, _rect: &Rectangle) -> CollisionType {
        CollisionType::None
    }
}

/// Draws its object. Never updated by the scene.
pub trait GraphicsComponent: Component {
    fn render(
        &self,
        object: &GameObject,
        camera: &Camera,
        target: &mut dyn RenderTarget,
        window: WindowId,
    );
}

/// Reads the optional `metadata` object of a component description.
pub(crate) fn read_metadata(
    json: &serde_json::Value,
) -> Result<Metadata, serde_json::Error> {
    match json.get("metadata") {
        Some(value) => serde_json::from_value(value.clone()),
        None => Ok(Metadata::new()),
    }
}
