use std::fmt::Write;

use crate::scene::Scene;

/// Renderer-agnostic interface.
///
/// A renderer reads the scene as it stands after the frame's update and
/// produces output. It never mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, scene: &Scene) -> Self::Output;
}

/// Human-readable dump of a scene, for the CLI, logs and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene) -> String {
        let mut out = String::new();
        let cam = scene.camera();
        let light = scene.light_position();
        let _ = writeln!(out, "=== Scene (frame={}) ===", scene.frame());
        let _ = writeln!(out, "Objects: {}", scene.objects().len());
        let _ = writeln!(
            out,
            "Camera: pos=({:.2}, {:.2}, {:.2}) fov={:.0} aspect={:.3}",
            cam.position.x, cam.position.y, cam.position.z, cam.fov_degrees, cam.aspect
        );
        let _ = writeln!(
            out,
            "Light: pos=({:.2}, {:.2}, {:.2})",
            light.x, light.y, light.z
        );
        if let Some(err) = scene.load_error() {
            let _ = writeln!(out, "Load error: {err}");
        }

        for obj in scene.objects() {
            let p = obj.transform.position;
            let _ = writeln!(
                out,
                "  [{}] {:<6} {:?} material={} verts={} tris={} pos=({:.2}, {:.2}, {:.2})",
                obj.id.short(),
                obj.name,
                obj.role,
                obj.material.label(),
                obj.geometry.vertex_count(),
                obj.geometry.triangle_count(),
                p.x,
                p.y,
                p.z
            );
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Preset, SceneConfig};
    use crate::scene::SceneBuilder;
    use textscene_input::KeyState;

    #[test]
    fn empty_scene_output() {
        let scene = SceneBuilder::new(SceneConfig::preset(Preset::Basic)).build_empty();
        let output = DebugTextRenderer::new().render(&scene);
        assert!(output.contains("frame=0"));
        assert!(output.contains("Objects: 0"));
        assert!(output.contains("fov=75"));
    }

    #[test]
    fn shows_light_cube_and_load_error() {
        let mut scene = SceneBuilder::new(SceneConfig::preset(Preset::Lit)).build_empty();
        scene.set_load_error("typeface unreachable");
        scene.update(&KeyState::new());
        let output = DebugTextRenderer::new().render(&scene);
        assert!(output.contains("frame=1"));
        assert!(output.contains("LightCube"));
        assert!(output.contains("Light: pos=(0.00, 0.50, 1.50)"));
        assert!(output.contains("Load error: typeface unreachable"));
    }
}
