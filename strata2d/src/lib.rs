//! Strata2D - layered 2D scene simulation.
//!
//! Scenes hold ordered layers (images and collision bitmaps) and a set of
//! component-driven objects. Each fixed step updates every object, pushes it
//! out of solid pixels and reports overlaps between objects. Drawing goes
//! through the [`RenderTarget`] trait so any backend (or none) can be used.

pub mod assets;
pub mod camera;
pub mod collision;
pub mod component;
pub mod config;
pub mod error;
pub mod events;
pub mod geometry;
pub mod layer;
pub mod math;
pub mod object;
pub mod object_manager;
pub mod render;
pub mod scene;
pub mod state;
pub mod timestep;

pub use crate::assets::AssetManager;
pub use crate::camera::Camera;
pub use crate::collision::{CollisionClass, CollisionType};
pub use crate::component::{
    Component, ComponentFactory, ComponentKind, GraphicsComponent, PhysicsComponent,
};
pub use crate::config::SimulationConfig;
pub use crate::error::{AssetError, ConfigError, CreationError, RegistryError, SceneError};
pub use crate::events::SceneEvent;
pub use crate::geometry::{Point, Rectangle};
pub use crate::layer::{Layer, LayerFactory};
pub use crate::math::Vector;
pub use crate::object::{GameObject, ObjectId, ObjectState, YAxisOrientation};
pub use crate::object_manager::{ObjectManager, SimpleObjectManager};
pub use crate::render::{Colour, RecordingTarget, RenderTarget, TextureHandle, WindowId};
pub use crate::scene::{LoadContext, Scene};
pub use crate::state::SceneState;
pub use crate::timestep::FixedTimestep;
