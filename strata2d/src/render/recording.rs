//! Headless render target that keeps every draw call in memory.

use crate::geometry::PixelRect;

use super::{Colour, RenderTarget, TextureHandle, WindowId};

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Texture {
        window: WindowId,
        texture: TextureHandle,
        src: Option<PixelRect>,
        dst: PixelRect,
        rotation: f64,
    },
    FillRect {
        window: WindowId,
        rect: PixelRect,
        colour: Colour,
    },
}

/// A [`RenderTarget`] that records instead of drawing.
#[derive(Clone, Debug)]
pub struct RecordingTarget {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl RecordingTarget {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Returns the recorded commands and starts a fresh frame.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}

impl RenderTarget for RecordingTarget {
    fn draw_texture(
        &mut self,
        window: WindowId,
        texture: TextureHandle,
        src: Option<PixelRect>,
        dst: PixelRect,
        rotation: f64,
    ) {
        self.commands.push(DrawCommand::Texture {
            window,
            texture,
            src,
            dst,
            rotation,
        });
    }

    fn draw_fill_rect(&mut self, window: WindowId, rect: PixelRect, colour: Colour) {
        self.commands.push(DrawCommand::FillRect {
            window,
            rect,
            colour,
        });
    }

    fn logical_resolution(&self, _window: WindowId) -> (u32, u32) {
        (self.width, self.height)
    }
}
