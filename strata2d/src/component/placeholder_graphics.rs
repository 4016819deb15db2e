use std::any::Any;
use std::sync::Arc;

use serde_json::Value;

use super::{read_metadata, Component, ComponentKind, GraphicsComponent};
use crate::camera::{to_screen_coords, Camera};
use crate::error::CreationError;
use crate::geometry::Rectangle;
use crate::object::{GameObject, Metadata, YAxisOrientation};
use crate::render::{Colour, RenderTarget, WindowId};

/// Draws a filled rectangle where the object is.
///
/// Uses the object's physics bounds; objects without any are drawn
/// `width` x `height` centred on their position.
#[derive(Clone, Debug)]
pub struct PlaceholderGraphics {
    width: f64,
    height: f64,
    colour: Colour,
    metadata: Metadata,
}

impl PlaceholderGraphics {
    pub const SUBTYPE: &'static str = "PlaceholderGraphics";

    pub fn new(width: f64, height: f64, colour: Colour) -> Self {
        Self {
            width,
            height,
            colour,
            metadata: Metadata::new(),
        }
    }

    pub fn from_json(json: &Value) -> Result<Self, CreationError> {
        let fail = |details: String| CreationError::new("graphics", Self::SUBTYPE, details, json);
        let dimension = |key: &str| {
            json.get(key)
                .and_then(Value::as_f64)
                .ok_or_else(|| fail(format!("missing or non-numeric `{key}`")))
        };
        let width = dimension("width")?;
        let height = dimension("height")?;
        let colour = json
            .get("colour")
            .ok_or_else(|| fail("missing `colour`".into()))
            .and_then(|c| serde_json::from_value(c.clone()).map_err(|e| fail(e.to_string())))?;
        let metadata = read_metadata(json).map_err(|e| fail(e.to_string()))?;
        Ok(Self {
            width,
            height,
            colour,
            metadata,
        })
    }

    pub fn colour(&self) -> Colour {
        self.colour
    }

    fn draw_rect(&self, object: &GameObject) -> Rectangle {
        object.physics_bounds().unwrap_or_else(|| {
            Rectangle::new(
                object.position.x - self.width / 2.0,
                object.position.y - self.height / 2.0,
                self.width,
                self.height,
            )
        })
    }
}

impl Component for PlaceholderGraphics {
    fn kind(&self) -> ComponentKind {
        ComponentKind::Graphics
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

    fn as_graphics(&self) -> Option<&dyn GraphicsComponent> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl GraphicsComponent for PlaceholderGraphics {
    fn render(
        &self,
        object: &GameObject,
        camera: &Camera,
        target: &mut dyn RenderTarget,
        window: WindowId,
    ) {
        let (vw, vh) = target.logical_resolution(window);
        let flip = object.y_axis_orientation() == YAxisOrientation::BottomZero;
        let screen = to_screen_coords(camera, &self.draw_rect(object), vw as f64, vh as f64, flip);
        target.draw_fill_rect(window, screen.to_pixel_rect(), self.colour);
    }
}
