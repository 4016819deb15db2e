//! Error types for loading and wiring up scenes.
//!
//! Per-frame problems are not errors: they come back as `bool`/`Option`
//! and get logged.

use thiserror::Error;

/// A factory could not build a component or layer from its description.
#[derive(Debug, Error)]
#[error("could not create {type_tag}/{subtype}: {details} (description: {json})")]
pub struct CreationError {
    pub type_tag: String,
    pub subtype: String,
    pub details: String,
    pub json: String,
}

impl CreationError {
    pub fn new(
        type_tag: impl Into<String>,
        subtype: impl Into<String>,
        details: impl Into<String>,
        json: &serde_json::Value,
    ) -> Self {
        Self {
            type_tag: type_tag.into(),
            subtype: subtype.into(),
            details: details.into(),
            json: json.to_string(),
        }
    }
}

/// Registering a constructor twice under one key.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("a constructor for {0} is already registered")]
    Duplicate(String),
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset {0} does not exist")]
    DoesNotExist(String),
    #[error("asset {id} has no pixel data")]
    NoPixels { id: String },
}

/// Loading a scene failed. Per-object failures are skipped instead.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene {0} does not exist")]
    DoesNotExist(String),
    #[error("scene description is missing `{0}`")]
    MissingField(&'static str),
    #[error("scene field `{field}` is invalid: {source}")]
    InvalidField {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Creation(#[from] CreationError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}
