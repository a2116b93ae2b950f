//! wgpu render backend for the text scene.
//!
//! Each scene object gets its own vertex, index and uniform buffers; the
//! material picks one of three pipelines (basic, glow, lit).
//!
//! # Invariants
//! - The renderer never mutates the scene.
//! - Uniforms are rewritten from the scene every frame, after its update.

mod gpu;
mod shaders;
mod uniforms;

pub use gpu::WgpuRenderer;
pub use uniforms::ShaderKind;
