use std::collections::HashMap;

use serde_json::Value;

use super::{BitmapCollisionLayer, ImageLayer, Layer};
use crate::error::{CreationError, RegistryError};
use crate::scene::LoadContext;

/// Builds a layer from its JSON description.
pub type LayerConstructor = Box<
    dyn Fn(&Value, &LoadContext<'_>) -> Result<Box<dyn Layer>, CreationError> + Send + Sync,
>;

/// Registry of layer constructors keyed by the description's `type`.
pub struct LayerFactory {
    constructors: HashMap<String, LayerConstructor>,
}

impl LayerFactory {
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// A factory that knows `ImageLayer` and `BitmapCollisionLayer`.
    pub fn with_builtins() -> Self {
        let mut factory = Self::new();
        factory.constructors.insert(
            ImageLayer::TYPE.to_string(),
            Box::new(|json, ctx| {
                ImageLayer::from_json(json, ctx).map(|l| Box::new(l) as Box<dyn Layer>)
            }),
        );
        factory.constructors.insert(
            BitmapCollisionLayer::TYPE.to_string(),
            Box::new(|json, ctx| {
                BitmapCollisionLayer::from_json(json, ctx).map(|l| Box::new(l) as Box<dyn Layer>)
            }),
        );
        factory
    }

    pub fn register<F>(&mut self, type_tag: impl Into<String>, constructor: F) -> Result<(), RegistryError>
    where
        F: Fn(&Value, &LoadContext<'_>) -> Result<Box<dyn Layer>, CreationError>
            + Send
            + Sync
            + 'static,
    {
        let type_tag = type_tag.into();
        if self.constructors.contains_key(&type_tag) {
            return Err(RegistryError::Duplicate(type_tag));
        }
        self.constructors.insert(type_tag, Box::new(constructor));
        Ok(())
    }

    pub fn is_registered(&self, type_tag: &str) -> bool {
        self.constructors.contains_key(type_tag)
    }

    /// Build a layer from a description carrying a `type` key.
    pub fn make_layer(
        &self,
        json: &Value,
        ctx: &LoadContext<'_>,
    ) -> Result<Box<dyn Layer>, CreationError> {
        let type_tag = json
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| CreationError::new("layer", "", "missing layer type", json))?;
        let constructor = self
            .constructors
            .get(type_tag)
            .ok_or_else(|| CreationError::new(type_tag, "", "no constructor registered", json))?;
        constructor(json, ctx)
    }
}

impl Default for LayerFactory {
    fn default() -> Self {
        Self::with_builtins()
    }
}
