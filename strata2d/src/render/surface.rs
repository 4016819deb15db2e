use std::sync::Arc;

use image::RgbaImage;

use super::Colour;

/// CPU-readable pixel data used for bitmap collision.
///
/// `pixel` panics when the coordinate is outside the surface; callers are
/// expected to bounds-check first.
pub trait PixelSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn pixel(&self, x: u32, y: u32) -> Colour;

    /// Whether the pixel counts as solid ground. Pure black by default.
    fn is_solid(&self, x: u32, y: u32) -> bool {
        self.pixel(x, y).same_rgb(&Colour::BLACK)
    }

    fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width() as i64 && y < self.height() as i64
    }
}

impl PixelSurface for RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn pixel(&self, x: u32, y: u32) -> Colour {
        let (w, h) = self.dimensions();
        assert!(x < w && y < h, "pixel ({x}, {y}) outside {w}x{h} surface");
        (*self.get_pixel(x, y)).into()
    }
}

/// An image whose solid pixels are a chosen ink colour instead of black.
#[derive(Clone, Debug)]
pub struct MaskedSurface {
    image: Arc<RgbaImage>,
    ink: Colour,
}

impl MaskedSurface {
    pub fn new(image: Arc<RgbaImage>, ink: Colour) -> Self {
        Self { image, ink }
    }

    pub fn ink(&self) -> Colour {
        self.ink
    }

    pub fn image(&self) -> &Arc<RgbaImage> {
        &self.image
    }
}

impl PixelSurface for MaskedSurface {
    fn width(&self) -> u32 {
        self.image.dimensions().0
    }

    fn height(&self) -> u32 {
        self.image.dimensions().1
    }

    fn pixel(&self, x: u32, y: u32) -> Colour {
        PixelSurface::pixel(&*self.image, x, y)
    }

    fn is_solid(&self, x: u32, y: u32) -> bool {
        self.pixel(x, y).same_rgb(&self.ink)
    }
}
