use std::sync::Arc;

use serde_json::Value;

use super::{read_placement, ImageLayer, Layer};
use crate::camera::Camera;
use crate::collision::{detect_bitmap_collisions, CollisionClass, CollisionType, PixelCollision};
use crate::error::CreationError;
use crate::geometry::Rectangle;
use crate::object::{GameObject, YAxisOrientation};
use crate::render::{Colour, MaskedSurface, PixelSurface, RenderTarget, TextureHandle, WindowId};
use crate::scene::LoadContext;

/// A layer whose solid pixels block objects.
///
/// Objects are tested in image space: the layer's `position` is the world
/// location of the image's top-left pixel. Invisible unless built with
/// `visible`.
#[derive(Clone, Debug)]
pub struct BitmapCollisionLayer {
    asset_id: String,
    texture: TextureHandle,
    position: Rectangle,
    surface: MaskedSurface,
    max_resolve_attempts: u32,
    visible: bool,
}

impl BitmapCollisionLayer {
    pub const TYPE: &'static str = "BitmapCollisionLayer";
    pub const DEFAULT_MAX_RESOLVE_ATTEMPTS: u32 = 10;

    pub fn new(
        asset_id: impl Into<String>,
        texture: TextureHandle,
        position: Rectangle,
        pixels: Arc<::image::RgbaImage>,
        ink: Colour,
    ) -> Self {
        Self {
            asset_id: asset_id.into(),
            texture,
            position,
            surface: MaskedSurface::new(pixels, ink),
            max_resolve_attempts: Self::DEFAULT_MAX_RESOLVE_ATTEMPTS,
            visible: false,
        }
    }

    /// Reads `asset_id`, `position` and optional `visible`. The asset must
    /// have CPU pixels.
    pub fn from_json(json: &Value, ctx: &LoadContext<'_>) -> Result<Self, CreationError> {
        let (asset_id, position) = read_placement(json, Self::TYPE)?;
        let asset_error = |e: crate::error::AssetError| {
            CreationError::new(Self::TYPE, "", e.to_string(), json)
        };
        let texture = ctx.assets.texture(&asset_id).map_err(asset_error)?;
        let pixels = ctx.assets.pixels(&asset_id).map_err(asset_error)?;
        let visible = json.get("visible").and_then(Value::as_bool).unwrap_or(false);

        Ok(Self::new(asset_id, texture, position, pixels, ctx.config.ink)
            .with_max_resolve_attempts(ctx.config.max_resolve_attempts)
            .with_visible(visible))
    }

    #[must_use]
    pub fn with_max_resolve_attempts(mut self, attempts: u32) -> Self {
        self.max_resolve_attempts = attempts;
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    /// The object's bounds in image pixel coordinates.
    fn image_space_bounds(&self, object: &GameObject) -> Rectangle {
        let mut mbr = object.bounding_polygon();
        if object.y_axis_orientation() == YAxisOrientation::BottomZero {
            mbr.y = self.surface.height() as f64 - mbr.y - mbr.height;
        }
        mbr.translated(-self.position.x, -self.position.y)
    }

    /// Moves the object one unit away from the struck side.
    fn nudge(object: &mut GameObject, side: CollisionType) {
        let up = match object.y_axis_orientation() {
            YAxisOrientation::TopZero => -1.0,
            YAxisOrientation::BottomZero => 1.0,
        };
        match side {
            CollisionType::Left => object.position.x += 1.0,
            CollisionType::Right => object.position.x -= 1.0,
            CollisionType::Bottom => object.position.y += up,
            CollisionType::Top => object.position.y -= up,
            _ => {}
        }
    }
}

impl Layer for BitmapCollisionLayer {
    fn layer_type(&self) -> &str {
        Self::TYPE
    }

    fn render(&self, camera: &Camera, target: &mut dyn RenderTarget, window: WindowId) {
        if self.visible {
            ImageLayer::draw(self.texture, &self.position, camera, target, window);
        }
    }

    fn can_collide(&self) -> bool {
        true
    }

    fn check_collisions(&self, object: &GameObject) -> Vec<PixelCollision> {
        detect_bitmap_collisions(&self.image_space_bounds(object), &self.surface)
    }

    fn resolve_collisions(&self, object: &mut GameObject) -> bool {
        for _ in 0..self.max_resolve_attempts {
            let collisions = self.check_collisions(object);
            if collisions.is_empty() {
                return true;
            }
            for collision in &collisions {
                if object.handle_collision(
                    collision.side,
                    CollisionClass::Bitmap,
                    None,
                    collision.point_or_tangent,
                ) {
                    return true;
                }
                Self::nudge(object, collision.side);
            }
        }
        if self.check_collisions(object).is_empty() {
            return true;
        }
        log::error!(
            "Max attempts reached resolving object {} against bitmap {}",
            object.id(),
            self.asset_id
        );
        false
    }
}
