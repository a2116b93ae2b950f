use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use textscene_assets::{FontSource, TextOptions};
use textscene_common::Color;
use textscene_input::InputBindings;

use crate::SceneError;
use crate::camera::PerspectiveCamera;
use crate::lighting::LitParams;
use crate::material::Material;

/// Which family of materials the text meshes get.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaterialStyle {
    /// Flat red letter, flat blue digit.
    Basic,
    /// Normal-based glow in the same colors.
    Glow,
    /// Local lighting: Phong letter, Blinn-Phong digit.
    Lit,
}

impl MaterialStyle {
    pub fn letter_material(self) -> Material {
        match self {
            MaterialStyle::Basic => Material::basic(0xff0000),
            MaterialStyle::Glow => Material::Glow {
                color: Color::from_hex(0xff0000),
                intensity: 1.0,
            },
            MaterialStyle::Lit => Material::Lit(LitParams::letter()),
        }
    }

    pub fn digit_material(self) -> Material {
        match self {
            MaterialStyle::Basic => Material::basic(0x0000ff),
            MaterialStyle::Glow => Material::Glow {
                color: Color::from_hex(0x0000ff),
                intensity: 1.0,
            },
            MaterialStyle::Lit => Material::Lit(LitParams::digit()),
        }
    }
}

/// What the light-position uniform tracks each frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LightFollow {
    /// The emissive light cube (or its anchor when the cube is hidden).
    #[default]
    Cube,
    /// The camera, as a head lamp.
    Camera,
}

/// The point light and the small cube that marks it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub position: Vec3,
    pub cube_size: f32,
    pub color: Color,
    /// Whether the cube is added to the scene.
    pub visible: bool,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.5, 1.5),
            cube_size: 0.2,
            color: Color::WHITE,
            visible: true,
        }
    }
}

/// Everything that distinguishes one scene variation from another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub material_style: MaterialStyle,
    pub light_follow: LightFollow,
    /// `None` disables keyboard movement.
    pub input: Option<InputBindings>,
    pub letter: String,
    pub digit: String,
    pub font: FontSource,
    pub text: TextOptions,
    pub letter_position: Vec3,
    pub digit_position: Vec3,
    pub light: LightConfig,
    pub camera: PerspectiveCamera,
    pub clear_color: Color,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::preset(Preset::Lit)
    }
}

/// The four shipped scene variations, in the order they were built up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    Basic,
    Glow,
    GlowInteractive,
    Lit,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Basic,
        Preset::Glow,
        Preset::GlowInteractive,
        Preset::Lit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Basic => "basic",
            Preset::Glow => "glow",
            Preset::GlowInteractive => "glow-interactive",
            Preset::Lit => "lit",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Preset::Basic => "flat colored text, no light",
            Preset::Glow => "normal-based glow shader, static light cube",
            Preset::GlowInteractive => "glow shader; W/S move the light cube, A/D move the camera",
            Preset::Lit => "Phong letter and Blinn-Phong digit lit by a movable point light",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| SceneError::Config(format!("unknown preset {s:?}")))
    }
}

impl SceneConfig {
    pub fn preset(preset: Preset) -> Self {
        let (material_style, input, light_visible) = match preset {
            Preset::Basic => (MaterialStyle::Basic, None, false),
            Preset::Glow => (MaterialStyle::Glow, None, true),
            Preset::GlowInteractive => (MaterialStyle::Glow, Some(InputBindings::default()), true),
            Preset::Lit => (MaterialStyle::Lit, Some(InputBindings::default()), true),
        };
        Self {
            material_style,
            light_follow: LightFollow::Cube,
            input,
            letter: "o".into(),
            digit: "8".into(),
            font: FontSource::default(),
            text: TextOptions::default(),
            letter_position: Vec3::new(-2.0, 0.0, 0.0),
            digit_position: Vec3::new(2.0, 0.0, 0.0),
            light: LightConfig {
                visible: light_visible,
                ..LightConfig::default()
            },
            camera: PerspectiveCamera::default(),
            clear_color: Color::BLACK,
        }
    }

    /// Load a JSON config; omitted fields take the `lit` preset's values.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        if self.letter.trim().is_empty() || self.digit.trim().is_empty() {
            return Err(SceneError::Config("letter and digit must not be blank".into()));
        }
        if !(self.camera.near > 0.0 && self.camera.far > self.camera.near) {
            return Err(SceneError::Config(format!(
                "camera clip range {}..{} is invalid",
                self.camera.near, self.camera.far
            )));
        }
        if !(self.camera.fov_degrees > 0.0 && self.camera.fov_degrees < 180.0) {
            return Err(SceneError::Config(format!(
                "camera fov {} must be in (0, 180)",
                self.camera.fov_degrees
            )));
        }
        if !(self.light.cube_size.is_finite() && self.light.cube_size > 0.0) {
            return Err(SceneError::Config("light cube size must be positive".into()));
        }
        self.text.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn presets_differ_in_style_and_input() {
        let basic = SceneConfig::preset(Preset::Basic);
        assert_eq!(basic.material_style, MaterialStyle::Basic);
        assert!(basic.input.is_none());
        assert!(!basic.light.visible);

        let glow = SceneConfig::preset(Preset::Glow);
        assert_eq!(glow.material_style, MaterialStyle::Glow);
        assert!(glow.input.is_none());

        let interactive = SceneConfig::preset(Preset::GlowInteractive);
        assert_eq!(interactive.material_style, MaterialStyle::Glow);
        assert!(interactive.input.is_some());

        let lit = SceneConfig::preset(Preset::Lit);
        assert_eq!(lit.material_style, MaterialStyle::Lit);
        assert_eq!(lit.input, Some(InputBindings::default()));
    }

    #[test]
    fn shared_scene_layout() {
        for preset in Preset::ALL {
            let config = SceneConfig::preset(preset);
            assert_eq!(config.letter, "o");
            assert_eq!(config.digit, "8");
            assert_eq!(config.letter_position, -config.digit_position);
            assert_eq!(config.text, TextOptions::default());
            assert_eq!(config.camera.position, Vec3::new(0.0, 0.0, 5.0));
            config.validate().unwrap();
        }
    }

    #[test]
    fn preset_names_round_trip() {
        for preset in Preset::ALL {
            assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
        }
        assert_eq!("LIT".parse::<Preset>().unwrap(), Preset::Lit);
        assert!(matches!("neon".parse::<Preset>(), Err(SceneError::Config(_))));
    }

    #[test]
    fn lit_style_materials() {
        assert_eq!(
            MaterialStyle::Lit.letter_material(),
            Material::Lit(LitParams::letter())
        );
        assert_eq!(
            MaterialStyle::Lit.digit_material(),
            Material::Lit(LitParams::digit())
        );
        assert_eq!(MaterialStyle::Basic.letter_material(), Material::basic(0xff0000));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(
            tmp,
            r#"{{"material_style": "glow", "letter": "k", "font": {{"path": "fonts/x.json"}}}}"#
        )
        .unwrap();
        let config = SceneConfig::from_path(tmp.path()).unwrap();
        assert_eq!(config.material_style, MaterialStyle::Glow);
        assert_eq!(config.letter, "k");
        assert_eq!(config.digit, "8");
        assert_eq!(config.font, FontSource::Path("fonts/x.json".into()));
    }

    #[test]
    fn json_round_trip() {
        let config = SceneConfig::preset(Preset::GlowInteractive);
        let json = config.to_json().unwrap();
        let back: SceneConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.material_style, config.material_style);
        assert_eq!(back.input, config.input);
        assert_eq!(back.light, config.light);
    }

    #[test]
    fn invalid_config_rejected() {
        let mut config = SceneConfig::default();
        config.letter = " ".into();
        assert!(config.validate().is_err());

        let mut config = SceneConfig::default();
        config.camera.near = 0.0;
        assert!(config.validate().is_err());

        let mut config = SceneConfig::default();
        config.text.depth = -1.0;
        assert!(matches!(config.validate(), Err(SceneError::Asset(_))));
    }

    #[test]
    fn bad_json_is_reported() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "{{not json").unwrap();
        assert!(matches!(
            SceneConfig::from_path(tmp.path()),
            Err(SceneError::Json(_))
        ));
    }
}
