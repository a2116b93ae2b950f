use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Perspective camera looking down -Z.
///
/// Only translation is exposed: the scene moves the camera sideways, never
/// rotates it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            fov_degrees: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl PerspectiveCamera {
    /// Match the aspect ratio to a viewport. Zero-sized viewports are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, Vec3::NEG_Z, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space point expressed in view space.
    pub fn to_view(&self, world: Vec3) -> Vec3 {
        self.view_matrix().transform_point3(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera() {
        let cam = PerspectiveCamera::default();
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(cam.fov_degrees, 75.0);
        assert_eq!(cam.near, 0.1);
        assert_eq!(cam.far, 1000.0);
        let vp = cam.view_projection();
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn viewport_sets_aspect() {
        let mut cam = PerspectiveCamera::default();
        cam.set_viewport(800, 400);
        assert_eq!(cam.aspect, 2.0);
        cam.set_viewport(0, 400);
        assert_eq!(cam.aspect, 2.0);
    }

    #[test]
    fn view_space_is_camera_relative() {
        let mut cam = PerspectiveCamera::default();
        assert!(cam.to_view(Vec3::ZERO).abs_diff_eq(Vec3::new(0.0, 0.0, -5.0), 1e-6));
        cam.translate(Vec3::new(1.0, 0.0, 0.0));
        assert!(cam.to_view(Vec3::ZERO).abs_diff_eq(Vec3::new(-1.0, 0.0, -5.0), 1e-6));
    }

    #[test]
    fn origin_projects_to_screen_centre() {
        let cam = PerspectiveCamera::default();
        let clip = cam.view_projection() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!((0.0..=1.0).contains(&ndc.z));
    }
}
