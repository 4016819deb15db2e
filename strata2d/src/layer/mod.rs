//! Scene layers: drawable backdrops and collidable bitmaps.

mod bitmap_layer;
mod factory;
mod image_layer;

use serde_json::Value;

use crate::assets::asset_key;
use crate::camera::Camera;
use crate::collision::PixelCollision;
use crate::error::CreationError;
use crate::geometry::Rectangle;
use crate::object::GameObject;
use crate::render::{RenderTarget, WindowId};

pub use bitmap_layer::BitmapCollisionLayer;
pub use factory::{LayerConstructor, LayerFactory};
pub use image_layer::ImageLayer;

/// Content a scene draws and (optionally) collides objects against.
pub trait Layer: Send {
    /// The type tag this layer was built from.
    fn layer_type(&self) -> &str;

    fn update(&mut self, _timestep_ms: f64) {}

    fn render(&self, camera: &Camera, target: &mut dyn RenderTarget, window: WindowId);

    fn can_collide(&self) -> bool {
        false
    }

    fn check_collisions(&self, _object: &GameObject) -> Vec<PixelCollision> {
        Vec::new()
    }

    /// Tries to move `object` out of this layer. Returns `false` if it could
    /// not.
    fn resolve_collisions(&self, _object: &mut GameObject) -> bool {
        false
    }
}

/// `asset_id` and `position` shared by image-backed layers.
pub(crate) fn read_placement(
    json: &Value,
    layer_type: &str,
) -> Result<(String, Rectangle), CreationError> {
    let asset_id = json
        .get("asset_id")
        .and_then(asset_key)
        .ok_or_else(|| CreationError::new(layer_type, "", "missing `asset_id`", json))?;
    let position = json
        .get("position")
        .ok_or_else(|| CreationError::new(layer_type, "", "missing `position`", json))
        .and_then(|p| {
            serde_json::from_value::<Rectangle>(p.clone()).map_err(|e| {
                CreationError::new(layer_type, "", format!("invalid `position`: {e}"), json)
            })
        })?;
    Ok((asset_id, position))
}
