use serde::{Deserialize, Serialize};

/// 8-bit RGBA colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Colour {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Compares the colour channels only.
    pub fn same_rgb(&self, other: &Colour) -> bool {
        self.r == other.r && self.g == other.g && self.b == other.b
    }

    /// Normalised channels, as most GPU APIs expect them.
    pub fn to_f32(&self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

impl Default for Colour {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<image::Rgba<u8>> for Colour {
    fn from(value: image::Rgba<u8>) -> Self {
        let [r, g, b, a] = value.0;
        Self { r, g, b, a }
    }
}

impl From<Colour> for image::Rgba<u8> {
    fn from(value: Colour) -> Self {
        image::Rgba([value.r, value.g, value.b, value.a])
    }
}
