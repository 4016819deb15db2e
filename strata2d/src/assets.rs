use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;

use crate::error::AssetError;
use crate::render::TextureHandle;

/// A registered image: the texture the backend draws with, and optionally
/// the CPU pixels collision layers scan.
#[derive(Clone, Debug)]
pub struct ImageAsset {
    pub texture: TextureHandle,
    pub width: u32,
    pub height: u32,
    pub pixels: Option<Arc<RgbaImage>>,
}

/// Manages images by id (textures and their CPU-side pixel data).
pub struct AssetManager {
    images: HashMap<String, ImageAsset>,
    next_texture: u32,
}

impl AssetManager {
    /// Create a new asset manager with no registered assets.
    pub fn new() -> Self {
        Self {
            images: HashMap::new(),
            next_texture: 1,
        }
    }

    fn allocate_texture(&mut self) -> TextureHandle {
        let handle = TextureHandle(self.next_texture);
        self.next_texture += 1;
        handle
    }

    /// Register an in-memory image under `id`, replacing any previous one.
    pub fn insert_image(&mut self, id: impl Into<String>, image: RgbaImage) -> TextureHandle {
        let texture = self.allocate_texture();
        let (width, height) = image.dimensions();
        self.images.insert(
            id.into(),
            ImageAsset {
                texture,
                width,
                height,
                pixels: Some(Arc::new(image)),
            },
        );
        texture
    }

    /// Register a draw-only texture of the given size.
    pub fn insert_texture(&mut self, id: impl Into<String>, width: u32, height: u32) -> TextureHandle {
        let texture = self.allocate_texture();
        self.images.insert(
            id.into(),
            ImageAsset {
                texture,
                width,
                height,
                pixels: None,
            },
        );
        texture
    }

    /// Load an image file from disk, caching it under `id`.
    ///
    /// If `id` is already registered the cached handle is returned without
    /// touching the disk.
    pub fn load_image(
        &mut self,
        id: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> anyhow::Result<TextureHandle> {
        let id = id.into();
        if let Some(asset) = self.images.get(&id) {
            return Ok(asset.texture);
        }

        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|e| anyhow::anyhow!("failed to load image {}: {e}", path.display()))?
            .to_rgba8();
        log::debug!(
            "Loaded image asset {id} ({}x{}) from {}",
            image.width(),
            image.height(),
            path.display()
        );
        Ok(self.insert_image(id, image))
    }

    pub fn get(&self, id: &str) -> Result<&ImageAsset, AssetError> {
        self.images
            .get(id)
            .ok_or_else(|| AssetError::DoesNotExist(id.to_string()))
    }

    pub fn texture(&self, id: &str) -> Result<TextureHandle, AssetError> {
        self.get(id).map(|asset| asset.texture)
    }

    /// CPU pixels for `id`; draw-only textures have none.
    pub fn pixels(&self, id: &str) -> Result<Arc<RgbaImage>, AssetError> {
        self.get(id)?
            .pixels
            .clone()
            .ok_or_else(|| AssetError::NoPixels { id: id.to_string() })
    }

    pub fn size(&self, id: &str) -> Result<(u32, u32), AssetError> {
        self.get(id).map(|asset| (asset.width, asset.height))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.images.contains_key(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<ImageAsset> {
        self.images.remove(id)
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }
}

impl Default for AssetManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads an asset id from a description, accepting numbers or strings.
pub(crate) fn asset_key(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
