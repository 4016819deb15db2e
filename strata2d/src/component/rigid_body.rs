use std::any::Any;
use std::sync::Arc;

use serde_json::Value;

use super::{read_metadata, Component, ComponentKind, PhysicsComponent};
use crate::collision::{CollisionClass, CollisionType};
use crate::error::CreationError;
use crate::math::Vector;
use crate::object::{GameObject, Metadata, YAxisOrientation};

/// Explicit-Euler integration of acceleration, force and velocity.
#[derive(Clone, Debug)]
pub struct RigidBody {
    mass: f64,
    metadata: Metadata,
}

impl RigidBody {
    pub const SUBTYPE: &'static str = "RigidBody";

    pub fn new(mass: f64) -> Self {
        Self {
            mass,
            metadata: Metadata::new(),
        }
    }

    pub fn from_json(json: &Value) -> Result<Self, CreationError> {
        let fail = |details: &str| CreationError::new("physics", Self::SUBTYPE, details, json);
        let mass = json
            .get("mass")
            .and_then(Value::as_f64)
            .ok_or_else(|| fail("missing or non-numeric `mass`"))?;
        if mass < 0.0 {
            return Err(fail("`mass` must not be negative"));
        }
        let metadata = read_metadata(json).map_err(|e| fail(&e.to_string()))?;
        Ok(Self { mass, metadata })
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }
}

impl Component for RigidBody {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Physics
    }

    fn subtype(&self) -> &str {
        Self::SUBTYPE
    }

    fn update(&self, object: &mut GameObject, timestep_ms: f64) {
        let dt = timestep_ms / 1000.0;
        let mut acceleration = object.acceleration;
        if self.mass > 0.0 {
            acceleration += object.force / self.mass;
        }
        object.velocity += acceleration * dt;
        object.previous_position = object.position;
        object.position += object.velocity * dt;
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

impl PhysicsComponent for RigidBody {
    /// Stops motion into solid ground but leaves the collision for other
    /// components (or the layer's nudging) to resolve.
    fn handle_collision(
        &self,
        object: &mut GameObject,
        collision_type: CollisionType,
        class: CollisionClass,
        _other: Option<&GameObject>,
        _location: Vector,
    ) -> bool {
        if !matches!(class, CollisionClass::Bitmap | CollisionClass::Wall) {
            return false;
        }
        // Sides are reported in screen space, where "down" is +y.
        let down = match object.y_axis_orientation() {
            YAxisOrientation::TopZero => 1.0,
            YAxisOrientation::BottomZero => -1.0,
        };
        let v = &mut object.velocity;
        match collision_type {
            CollisionType::Bottom if v.y * down > 0.0 => v.y = 0.0,
            CollisionType::Top if v.y * down < 0.0 => v.y = 0.0,
            CollisionType::Left if v.x < 0.0 => v.x = 0.0,
            CollisionType::Right if v.x > 0.0 => v.x = 0.0,
            _ => {}
        }
        false
    }
}
