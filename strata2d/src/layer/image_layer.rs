use serde_json::Value;

use super::{read_placement, Layer};
use crate::assets::asset_key;
use crate::camera::{to_screen_coords, Camera};
use crate::collision::{mbr_relate, Relation};
use crate::error::CreationError;
use crate::geometry::Rectangle;
use crate::render::{RenderTarget, TextureHandle, WindowId};
use crate::scene::LoadContext;

/// Frame timer for layers that cycle through several images.
#[derive(Clone, Debug)]
struct FrameAnimation {
    frames: Vec<TextureHandle>,
    frame_ms: f64,
    timer: f64,
    current: usize,
}

impl FrameAnimation {
    fn update(&mut self, timestep_ms: f64) {
        if self.frames.len() < 2 || self.frame_ms <= 0.0 {
            return;
        }
        self.timer += timestep_ms;
        while self.timer >= self.frame_ms {
            self.timer -= self.frame_ms;
            self.current = (self.current + 1) % self.frames.len();
        }
    }
}

/// Draws an image at a fixed place in the world.
#[derive(Clone, Debug)]
pub struct ImageLayer {
    asset_id: String,
    texture: TextureHandle,
    position: Rectangle,
    animation: Option<FrameAnimation>,
}

impl ImageLayer {
    pub const TYPE: &'static str = "ImageLayer";

    pub fn new(asset_id: impl Into<String>, texture: TextureHandle, position: Rectangle) -> Self {
        Self {
            asset_id: asset_id.into(),
            texture,
            position,
            animation: None,
        }
    }

    /// Reads `asset_id`, `position` and the optional `frames` list (with
    /// `frame_ms`) from a layer description.
    pub fn from_json(json: &Value, ctx: &LoadContext<'_>) -> Result<Self, CreationError> {
        let (asset_id, position) = read_placement(json, Self::TYPE)?;
        let texture = ctx
            .assets
            .texture(&asset_id)
            .map_err(|e| CreationError::new(Self::TYPE, "", e.to_string(), json))?;
        let mut layer = Self::new(asset_id, texture, position);

        if let Some(frames) = json.get("frames").and_then(Value::as_array) {
            let textures = frames
                .iter()
                .map(|f| {
                    let id = asset_key(f).ok_or_else(|| {
                        CreationError::new(Self::TYPE, "", "frame ids must be strings or numbers", json)
                    })?;
                    ctx.assets
                        .texture(&id)
                        .map_err(|e| CreationError::new(Self::TYPE, "", e.to_string(), json))
                })
                .collect::<Result<Vec<_>, _>>()?;
            let frame_ms = json.get("frame_ms").and_then(Value::as_f64).unwrap_or(100.0);
            layer = layer.with_frames(textures, frame_ms);
        }
        Ok(layer)
    }

    #[must_use]
    pub fn with_frames(mut self, frames: Vec<TextureHandle>, frame_ms: f64) -> Self {
        self.animation = (!frames.is_empty()).then(|| FrameAnimation {
            frames,
            frame_ms,
            timer: 0.0,
            current: 0,
        });
        self
    }

    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    pub fn position(&self) -> Rectangle {
        self.position
    }

    /// The texture drawn this frame.
    pub fn current_texture(&self) -> TextureHandle {
        self.animation
            .as_ref()
            .and_then(|a| a.frames.get(a.current).copied())
            .unwrap_or(self.texture)
    }

    /// Draws `texture` at `position` unless the camera cannot see it.
    pub(crate) fn draw(
        texture: TextureHandle,
        position: &Rectangle,
        camera: &Camera,
        target: &mut dyn RenderTarget,
        window: WindowId,
    ) {
        if mbr_relate(position, &camera.visible_world()) == Relation::Outside {
            return;
        }
        let (vw, vh) = target.logical_resolution(window);
        let dst = to_screen_coords(camera, position, vw as f64, vh as f64, true);
        target.draw_texture(window, texture, None, dst.to_pixel_rect(), 0.0);
    }
}

impl Layer for ImageLayer {
    fn layer_type(&self) -> &str {
        Self::TYPE
    }

    fn update(&mut self, timestep_ms: f64) {
        if let Some(animation) = &mut self.animation {
            animation.update(timestep_ms);
        }
    }

    fn render(&self, camera: &Camera, target: &mut dyn RenderTarget, window: WindowId) {
        Self::draw(self.current_texture(), &self.position, camera, target, window);
    }
}
