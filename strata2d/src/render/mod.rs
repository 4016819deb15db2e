mod colour;
mod recording;
mod surface;
mod target;

pub use colour::Colour;
pub use recording::{DrawCommand, RecordingTarget};
pub use surface::{MaskedSurface, PixelSurface};
pub use target::{RenderTarget, TextureHandle, WindowId};
