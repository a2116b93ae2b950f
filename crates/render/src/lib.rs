//! Scene model: camera, materials, lighting, per-frame update.
//!
//! Backends (the wgpu one, the debug text dump) only read a [`Scene`]; all
//! mutation goes through [`Scene::update`] once per frame.
//!
//! # Invariants
//! - The light-position uniform equals the light source position after every update.
//! - Lighting is evaluated in view space; the light is transformed with the
//!   current camera each frame.
//! - Renderers cannot mutate the scene.

mod camera;
mod config;
pub mod lighting;
mod material;
mod renderer;
mod scene;

pub use camera::PerspectiveCamera;
pub use config::{LightConfig, LightFollow, MaterialStyle, Preset, SceneConfig};
pub use lighting::{LightingTerms, LitParams, SpecularModel};
pub use material::Material;
pub use renderer::{DebugTextRenderer, Renderer};
pub use scene::{ObjectRole, Scene, SceneBuilder, SceneObject};

use textscene_assets::AssetError;

/// Errors from building or configuring a scene.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("invalid scene config: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("asset error: {0}")]
    Asset(#[from] AssetError),
}
