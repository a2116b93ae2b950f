//! CPU reference for the fragment shaders.
//!
//! Every function mirrors a WGSL entry point term for term so the GPU output
//! can be checked without a device. All vectors are in view space.

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};
use textscene_common::Color;

/// Axis the glow shader treats as "towards the viewer".
pub const VIEW_AXIS: Vec3 = Vec3::Z;

/// Ambient intensity shared by both lit text meshes.
pub const DEFAULT_AMBIENT_INTENSITY: f32 = 0.428;

/// How the highlight is computed.
///
/// The letter and digit deliberately use different models: mirror reflection
/// reads as plastic, the half-vector form as brushed metal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecularModel {
    /// `max(dot(view, reflect(-light, n)), 0)^shininess`
    Phong,
    /// `max(dot(n, normalize(light + view)), 0)^shininess`
    BlinnPhong,
}

/// Constant parameters of the local-lighting material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LitParams {
    pub base_color: Color,
    pub specular_color: Color,
    pub shininess: f32,
    pub ambient_intensity: f32,
    pub model: SpecularModel,
}

impl LitParams {
    /// Dark blue plastic used for the letter.
    pub fn letter() -> Self {
        Self {
            base_color: Color::from_hex(0x00008b),
            specular_color: Color::WHITE,
            shininess: 30.0,
            ambient_intensity: DEFAULT_AMBIENT_INTENSITY,
            model: SpecularModel::Phong,
        }
    }

    /// Brown metal used for the digit.
    pub fn digit() -> Self {
        Self {
            base_color: Color::from_hex(0x8b4513),
            specular_color: Color::from_hex(0x59524a),
            shininess: 80.0,
            ambient_intensity: DEFAULT_AMBIENT_INTENSITY,
            model: SpecularModel::BlinnPhong,
        }
    }
}

/// The three additive terms of the local-lighting model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingTerms {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
}

impl LightingTerms {
    pub fn total(&self) -> Vec3 {
        self.ambient + self.diffuse + self.specular
    }

    pub fn to_rgba(&self) -> Vec4 {
        self.total().extend(1.0)
    }
}

/// GLSL `reflect`: mirror `incident` about `normal`.
pub fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * normal.dot(incident) * normal
}

/// Normal-based fake lighting; ignores where the light actually is.
pub fn glow(normal: Vec3, color: Color, intensity: f32) -> Vec4 {
    let facing = 0.5 + 0.5 * normal.normalize_or_zero().dot(VIEW_AXIS);
    (color.to_vec3() * intensity * facing).extend(1.0)
}

/// Raw specular factor before it is scaled by the specular color.
pub fn specular_factor(
    model: SpecularModel,
    normal: Vec3,
    light_dir: Vec3,
    view_dir: Vec3,
    shininess: f32,
) -> f32 {
    match model {
        SpecularModel::Phong => {
            let reflect_dir = reflect(-light_dir, normal);
            view_dir.dot(reflect_dir).max(0.0).powf(shininess)
        }
        SpecularModel::BlinnPhong => {
            let half_dir = (light_dir + view_dir).normalize_or_zero();
            normal.dot(half_dir).max(0.0).powf(shininess)
        }
    }
}

/// Ambient + diffuse + specular for one fragment.
pub fn local_terms(params: &LitParams, frag_pos: Vec3, normal: Vec3, light_pos: Vec3) -> LightingTerms {
    let normal = normal.normalize_or_zero();
    let base = params.base_color.to_vec3();

    let ambient = params.ambient_intensity * base;

    let light_dir = (light_pos - frag_pos).normalize_or_zero();
    let diffuse = light_dir.dot(normal).max(0.0) * base;

    let view_dir = (-frag_pos).normalize_or_zero();
    let spec = specular_factor(params.model, normal, light_dir, view_dir, params.shininess);
    let specular = spec * params.specular_color.to_vec3();

    LightingTerms {
        ambient,
        diffuse,
        specular,
    }
}

/// Final fragment color of the local-lighting material, alpha 1.
pub fn shade_local(params: &LitParams, frag_pos: Vec3, normal: Vec3, light_pos: Vec3) -> Vec4 {
    local_terms(params, frag_pos, normal, light_pos).to_rgba()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        a.abs_diff_eq(b, 1e-5)
    }

    #[test]
    fn reflect_matches_glsl() {
        let r = reflect(Vec3::new(1.0, -1.0, 0.0), Vec3::Y);
        assert!(approx(r, Vec3::new(1.0, 1.0, 0.0)));
    }

    #[test]
    fn glow_is_brightest_facing_viewer() {
        let red = Color::rgb(1.0, 0.0, 0.0);
        assert!(approx(glow(Vec3::Z, red, 1.0).truncate(), Vec3::new(1.0, 0.0, 0.0)));
        assert!(approx(glow(Vec3::X, red, 1.0).truncate(), Vec3::new(0.5, 0.0, 0.0)));
        assert!(approx(glow(Vec3::NEG_Z, red, 1.0).truncate(), Vec3::ZERO));
        assert!(approx(glow(Vec3::Z, red, 2.0).truncate(), Vec3::new(2.0, 0.0, 0.0)));
        assert_eq!(glow(Vec3::Z, red, 1.0).w, 1.0);
    }

    #[test]
    fn diffuse_is_maximal_when_light_is_along_normal() {
        // Fragment on the view axis facing the camera, light directly in front of it.
        let frag = Vec3::new(0.0, 0.0, -5.0);
        let light = Vec3::new(0.0, 0.0, -4.0);
        for params in [LitParams::letter(), LitParams::digit()] {
            let terms = local_terms(&params, frag, Vec3::Z, light);
            assert!(approx(terms.diffuse, params.base_color.to_vec3()));
        }
    }

    #[test]
    fn ambient_scales_linearly() {
        let frag = Vec3::new(0.0, 0.0, -5.0);
        let light = Vec3::new(0.0, 3.0, -5.0);
        let mut params = LitParams::letter();
        params.ambient_intensity = 0.2;
        let a1 = local_terms(&params, frag, Vec3::Z, light).ambient;
        params.ambient_intensity = 0.4;
        let a2 = local_terms(&params, frag, Vec3::Z, light).ambient;
        params.ambient_intensity = 0.0;
        let a0 = local_terms(&params, frag, Vec3::Z, light).ambient;
        assert!(approx(a2, a1 * 2.0));
        assert_eq!(a0, Vec3::ZERO);
    }

    #[test]
    fn ambient_uses_shared_intensity() {
        let terms = local_terms(&LitParams::digit(), Vec3::NEG_Z, Vec3::Z, Vec3::ZERO);
        assert!(approx(terms.ambient, 0.428 * Color::from_hex(0x8b4513).to_vec3()));
    }

    #[test]
    fn phong_specular_zero_when_reflection_orthogonal_to_view() {
        // Light grazes along +X; its reflection about +Z stays in the XY plane
        // while the viewer sits on +Z.
        let n = Vec3::Z;
        let light_dir = Vec3::X;
        let view_dir = Vec3::Z;
        assert_eq!(specular_factor(SpecularModel::Phong, n, light_dir, view_dir, 30.0), 0.0);
    }

    #[test]
    fn blinn_specular_zero_when_half_vector_orthogonal_to_normal() {
        let n = Vec3::Z;
        let light_dir = Vec3::X;
        let view_dir = Vec3::Y;
        assert_eq!(
            specular_factor(SpecularModel::BlinnPhong, n, light_dir, view_dir, 80.0),
            0.0
        );
    }

    #[test]
    fn specular_full_at_mirror_angle() {
        let n = Vec3::Z;
        let d = Vec3::new(1.0, 0.0, 1.0).normalize();
        let mirrored = Vec3::new(-1.0, 0.0, 1.0).normalize();
        let phong = specular_factor(SpecularModel::Phong, n, d, mirrored, 30.0);
        let blinn = specular_factor(SpecularModel::BlinnPhong, n, d, mirrored, 80.0);
        assert!((phong - 1.0).abs() < 1e-5);
        assert!((blinn - 1.0).abs() < 1e-5);
    }

    #[test]
    fn letter_and_digit_specular_diverge() {
        let n = Vec3::Z;
        let light_dir = Vec3::new(0.3, 0.0, 1.0).normalize();
        let view_dir = Vec3::new(0.0, 0.2, 1.0).normalize();
        for shininess in [1.0, 30.0, 80.0] {
            let phong = specular_factor(SpecularModel::Phong, n, light_dir, view_dir, shininess);
            let blinn = specular_factor(SpecularModel::BlinnPhong, n, light_dir, view_dir, shininess);
            assert!((phong - blinn).abs() > 1e-4, "shininess {shininess}");
        }
    }

    #[test]
    fn output_is_sum_of_terms_with_opaque_alpha() {
        let params = LitParams::letter();
        let frag = Vec3::new(0.5, -0.2, -4.0);
        let light = Vec3::new(0.0, 1.0, -3.0);
        let terms = local_terms(&params, frag, Vec3::new(0.1, 0.2, 1.0), light);
        let rgba = shade_local(&params, frag, Vec3::new(0.1, 0.2, 1.0), light);
        assert!(approx(rgba.truncate(), terms.ambient + terms.diffuse + terms.specular));
        assert_eq!(rgba.w, 1.0);
    }

    #[test]
    fn coincident_light_does_not_produce_nan() {
        let frag = Vec3::new(0.0, 0.0, -5.0);
        let rgba = shade_local(&LitParams::letter(), frag, Vec3::Z, frag);
        assert!(rgba.is_finite());
    }

    #[test]
    fn preset_parameters() {
        let letter = LitParams::letter();
        assert_eq!(letter.shininess, 30.0);
        assert_eq!(letter.specular_color, Color::WHITE);
        assert_eq!(letter.model, SpecularModel::Phong);
        let digit = LitParams::digit();
        assert_eq!(digit.shininess, 80.0);
        assert_eq!(digit.model, SpecularModel::BlinnPhong);
        assert_eq!(digit.ambient_intensity, letter.ambient_intensity);
    }
}
