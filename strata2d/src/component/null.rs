use std::any::Any;
use std::sync::Arc;

use serde_json::Value;

use super::{read_metadata, Component, ComponentKind, GraphicsComponent, PhysicsComponent};
use crate::camera::Camera;
use crate::error::CreationError;
use crate::object::{GameObject, Metadata};
use crate::render::{RenderTarget, WindowId};

/// A component of any kind that does nothing.
#[derive(Clone, Debug)]
pub struct NullComponent {
    kind: ComponentKind,
    metadata: Metadata,
}

impl NullComponent {
    pub const SUBTYPE: &'static str = "Null";

    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            metadata: Metadata::new(),
        }
    }

    pub fn from_json(kind: ComponentKind, json: &Value) -> Result<Self, CreationError> {
        let metadata = read_metadata(json)
            .map_err(|e| CreationError::new(kind.as_str(), Self::SUBTYPE, e.to_string(), json))?;
        Ok(Self { kind, metadata })
    }
}

impl Component for NullComponent {
    fn kind(&self) -> ComponentKind {
        self.kind
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
        (self.kind == ComponentKind::Physics).then_some(self as &dyn PhysicsComponent)
    }

    fn as_graphics(&self) -> Option<&dyn GraphicsComponent> {
        (self.kind == ComponentKind::Graphics).then_some(self as &dyn GraphicsComponent)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl PhysicsComponent for NullComponent {}

impl GraphicsComponent for NullComponent {
    fn render(&self, _: &GameObject, _: &Camera, _: &mut dyn RenderTarget, _: WindowId) {}
}
