use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use super::{
    BoxCollider, Component, ComponentKind, NullComponent, PlaceholderGraphics, RigidBody,
};
use crate::error::{CreationError, RegistryError};

const TYPE_KEYS: [&str; 2] = ["component_type", "type"];
const SUBTYPE_KEYS: [&str; 2] = ["component_subtype", "subtype"];

/// First of `keys` present as a string, or `""`.
fn description_key<'a>(json: &'a Value, keys: [&str; 2]) -> &'a str {
    keys.iter()
        .find_map(|key| json.get(*key).and_then(Value::as_str))
        .unwrap_or_default()
}

/// Builds a component from its JSON description.
pub type ComponentConstructor =
    Box<dyn Fn(&Value) -> Result<Arc<dyn Component>, CreationError> + Send + Sync>;

/// Registry of component constructors keyed by `(type, subtype)`.
///
/// Owned by the application and passed to scene loading.
pub struct ComponentFactory {
    constructors: HashMap<(ComponentKind, String), ComponentConstructor>,
}

impl ComponentFactory {
    /// Create an empty factory.
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// A factory with every built-in component registered.
    pub fn with_builtins() -> Self {
        let mut factory = Self::new();
        factory.register_builtins();
        factory
    }

    fn register_builtins(&mut self) {
        let builtins: [(ComponentKind, &str, ComponentConstructor); 3] = [
            (
                ComponentKind::Physics,
                BoxCollider::SUBTYPE,
                Box::new(|json| BoxCollider::from_json(json).map(|c| Arc::new(c) as Arc<dyn Component>)),
            ),
            (
                ComponentKind::Physics,
                RigidBody::SUBTYPE,
                Box::new(|json| RigidBody::from_json(json).map(|c| Arc::new(c) as Arc<dyn Component>)),
            ),
            (
                ComponentKind::Graphics,
                PlaceholderGraphics::SUBTYPE,
                Box::new(|json| {
                    PlaceholderGraphics::from_json(json).map(|c| Arc::new(c) as Arc<dyn Component>)
                }),
            ),
        ];
        for (kind, subtype, constructor) in builtins {
            self.constructors
                .insert((kind, subtype.to_string()), constructor);
        }
        for kind in ComponentKind::ALL {
            self.constructors.insert(
                (kind, NullComponent::SUBTYPE.to_string()),
                Box::new(move |json| {
                    NullComponent::from_json(kind, json).map(|c| Arc::new(c) as Arc<dyn Component>)
                }),
            );
        }
    }

    /// Register a constructor. Each `(kind, subtype)` pair may be registered
    /// once.
    pub fn register<F>(
        &mut self,
        kind: ComponentKind,
        subtype: impl Into<String>,
        constructor: F,
    ) -> Result<(), RegistryError>
    where
        F: Fn(&Value) -> Result<Arc<dyn Component>, CreationError> + Send + Sync + 'static,
    {
        let key = (kind, subtype.into());
        if self.constructors.contains_key(&key) {
            return Err(RegistryError::Duplicate(format!("{}/{}", key.0, key.1)));
        }
        self.constructors.insert(key, Box::new(constructor));
        Ok(())
    }

    pub fn is_registered(&self, kind: ComponentKind, subtype: &str) -> bool {
        self.constructors.contains_key(&(kind, subtype.to_string()))
    }

    /// Build a component from a description with `component_type` and
    /// `component_subtype` keys. The short `type`/`subtype` spellings are
    /// accepted too.
    pub fn make_component(&self, json: &Value) -> Result<Arc<dyn Component>, CreationError> {
        let type_tag = description_key(json, TYPE_KEYS);
        let subtype = description_key(json, SUBTYPE_KEYS);

        let kind = ComponentKind::parse(type_tag).ok_or_else(|| {
            CreationError::new(type_tag, subtype, "unknown or missing component type", json)
        })?;
        if subtype.is_empty() {
            return Err(CreationError::new(type_tag, subtype, "missing subtype", json));
        }

        let constructor = self
            .constructors
            .get(&(kind, subtype.to_string()))
            .ok_or_else(|| CreationError::new(type_tag, subtype, "no constructor registered", json))?;
        constructor(json)
    }
}

impl Default for ComponentFactory {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_builtin_components() {
        let factory = ComponentFactory::with_builtins();
        let component = factory
            .make_component(&json!({
                "type": "physics",
                "subtype": "BoxCollider",
                "box": { "x": 0, "y": 0, "width": 4, "height": 6 }
            }))
            .unwrap();
        assert_eq!(component.kind(), ComponentKind::Physics);
        assert_eq!(component.subtype(), "BoxCollider");
        assert!(component.as_physics().is_some());
    }

    #[test]
    fn reads_long_key_names() {
        let factory = ComponentFactory::with_builtins();
        let component = factory
            .make_component(&json!({
                "component_type": "physics",
                "component_subtype": "BoxCollider",
                "box": { "x": 0, "y": 0, "width": 4, "height": 6 }
            }))
            .unwrap();
        assert_eq!(component.subtype(), "BoxCollider");

        let err = factory
            .make_component(&json!({ "component_type": "ai", "component_subtype": "Jetpack" }))
            .err()
            .unwrap();
        assert_eq!(err.type_tag, "ai");
        assert_eq!(err.subtype, "Jetpack");
    }

    #[test]
    fn null_components_exist_for_every_kind() {
        let factory = ComponentFactory::with_builtins();
        for kind in ComponentKind::ALL {
            let component = factory
                .make_component(&json!({ "type": kind.as_str(), "subtype": "Null" }))
                .unwrap();
            assert_eq!(component.kind(), kind);
        }
    }

    #[test]
    fn unknown_pair_reports_description() {
        let factory = ComponentFactory::with_builtins();
        let description = json!({ "type": "physics", "subtype": "Jetpack" });
        let err = factory.make_component(&description).err().unwrap();
        assert_eq!(err.type_tag, "physics");
        assert_eq!(err.subtype, "Jetpack");
        assert!(err.json.contains("Jetpack"));
    }

    #[test]
    fn missing_type_is_a_creation_error() {
        let factory = ComponentFactory::with_builtins();
        assert!(factory
            .make_component(&json!({ "subtype": "BoxCollider" }))
            .is_err());
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut factory = ComponentFactory::with_builtins();
        let result = factory.register(ComponentKind::Physics, "BoxCollider", |json| {
            BoxCollider::from_json(json).map(|c| Arc::new(c) as Arc<dyn Component>)
        });
        assert!(matches!(result, Err(RegistryError::Duplicate(_))));

        factory
            .register(ComponentKind::Ai, "Wander", |json| {
                NullComponent::from_json(ComponentKind::Ai, json)
                    .map(|c| Arc::new(c) as Arc<dyn Component>)
            })
            .unwrap();
        assert!(factory.is_registered(ComponentKind::Ai, "Wander"));
    }
}
