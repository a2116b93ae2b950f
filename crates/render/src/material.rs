use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};
use textscene_common::Color;

use crate::lighting::{self, LitParams};

/// Surface appearance of a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Material {
    /// Constant color, unaffected by light.
    Basic { color: Color },
    /// Normal-based glow, independent of the light position.
    Glow { color: Color, intensity: f32 },
    /// Ambient + diffuse + specular from the scene's point light.
    Lit(LitParams),
}

impl Material {
    pub fn basic(hex: u32) -> Self {
        Material::Basic {
            color: Color::from_hex(hex),
        }
    }

    /// Whether this material reads the light-position uniform.
    pub fn uses_light_position(&self) -> bool {
        matches!(self, Material::Lit(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Material::Basic { .. } => "basic",
            Material::Glow { .. } => "glow",
            Material::Lit(p) => match p.model {
                lighting::SpecularModel::Phong => "lit/phong",
                lighting::SpecularModel::BlinnPhong => "lit/blinn-phong",
            },
        }
    }

    /// Fragment color for view-space inputs.
    pub fn shade(&self, frag_pos: Vec3, normal: Vec3, light_pos: Vec3) -> Vec4 {
        match self {
            Material::Basic { color } => color.to_vec3().extend(1.0),
            Material::Glow { color, intensity } => lighting::glow(normal, *color, *intensity),
            Material::Lit(params) => lighting::shade_local(params, frag_pos, normal, light_pos),
        }
    }
}
