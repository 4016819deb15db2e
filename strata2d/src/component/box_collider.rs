use std::any::Any;
use std::sync::Arc;

use serde_json::Value;

use super::{read_metadata, Component, ComponentKind, PhysicsComponent};
use crate::collision::{detect_mbr_collision, CollisionType};
use crate::error::CreationError;
use crate::geometry::Rectangle;
use crate::object::{GameObject, Metadata};

/// Axis-aligned collision box centred on the object's position.
///
/// `box.x`/`box.y` offset the centre; `width`/`height` size the box.
#[derive(Clone, Debug)]
pub struct BoxCollider {
    bounds: Rectangle,
    metadata: Metadata,
}

impl BoxCollider {
    pub const SUBTYPE: &'static str = "BoxCollider";

    pub fn new(bounds: Rectangle) -> Self {
        Self {
            bounds,
            metadata: Metadata::new(),
        }
    }

    pub fn from_json(json: &Value) -> Result<Self, CreationError> {
        let fail = |details: String| CreationError::new("physics", Self::SUBTYPE, details, json);
        let bounds = json
            .get("box")
            .ok_or_else(|| fail("missing `box`".into()))
            .and_then(|b| {
                serde_json::from_value::<Rectangle>(b.clone()).map_err(|e| fail(e.to_string()))
            })?;
        let metadata = read_metadata(json).map_err(|e| fail(e.to_string()))?;
        Ok(Self { bounds, metadata })
    }

    /// The box in object-local coordinates.
    pub fn local_box(&self) -> Rectangle {
        self.bounds
    }
}

impl Component for BoxCollider {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Physics
    }

    fn subtype(&self) -> &str {
        Self::SUBTYPE
    }

    fn clone_component(&self) -> Arc<dyn Component> {
        Arc::new(self.clone())
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

impl PhysicsComponent for BoxCollider {
    fn bounding_polygon(&self, object: &GameObject) -> Option<Rectangle> {
        let b = self.bounds;
        Some(Rectangle::new(
            object.position.x + b.x - b.width / 2.0,
            object.position.y + b.y - b.height / 2.0,
            b.width,
            b.height,
        ))
    }

    fn collides(&self, rect: &Rectangle) -> CollisionType {
        detect_mbr_collision(&self.bounds, rect)
    }
}
