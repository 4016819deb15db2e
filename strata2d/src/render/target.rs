use crate::geometry::PixelRect;

use super::Colour;

/// Opaque handle used to reference textures owned by the render backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub(crate) u32);

impl TextureHandle {
    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Identifies the window a draw call goes to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WindowId(pub u32);

/// Drawing backend the scene renders through.
///
/// Rectangles are already in screen coordinates when they reach the target.
pub trait RenderTarget {
    /// Draws `texture` (or its `src` region) into `dst`, rotated by
    /// `rotation` degrees around the destination centre.
    fn draw_texture(
        &mut self,
        window: WindowId,
        texture: TextureHandle,
        src: Option<PixelRect>,
        dst: PixelRect,
        rotation: f64,
    );

    fn draw_fill_rect(&mut self, window: WindowId, rect: PixelRect, colour: Colour);

    /// Size of the window in logical pixels.
    fn logical_resolution(&self, window: WindowId) -> (u32, u32);
}
