use glam::Vec3;
use textscene_assets::{Geometry, Typeface};
use textscene_common::{Color, ObjectId, Transform};
use textscene_input::{Action, InputBindings, KeyState};

use crate::SceneError;
use crate::camera::PerspectiveCamera;
use crate::config::{LightFollow, SceneConfig};
use crate::material::Material;

/// What part a scene object plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectRole {
    Letter,
    Digit,
    LightCube,
}

/// A mesh placed in the scene.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub role: ObjectRole,
    pub geometry: Geometry,
    pub material: Material,
    pub transform: Transform,
}

/// Scene graph plus the per-frame mutable state: camera and light.
///
/// Objects are added once and never removed. Only the light cube and the
/// camera move after construction.
#[derive(Debug, Clone)]
pub struct Scene {
    objects: Vec<SceneObject>,
    camera: PerspectiveCamera,
    input: Option<InputBindings>,
    light_follow: LightFollow,
    /// Light position used when no cube is in the scene.
    light_anchor: Vec3,
    /// Value fed to every lit material's light-position uniform.
    light_uniform: Vec3,
    clear_color: Color,
    frame: u64,
    load_error: Option<String>,
}

impl Scene {
    fn new(config: &SceneConfig) -> Self {
        Self {
            objects: Vec::new(),
            camera: config.camera,
            input: config.input.clone(),
            light_follow: config.light_follow,
            light_anchor: config.light.position,
            light_uniform: config.light.position,
            clear_color: config.clear_color,
            frame: 0,
            load_error: None,
        }
    }

    pub fn add(
        &mut self,
        name: impl Into<String>,
        role: ObjectRole,
        geometry: Geometry,
        material: Material,
        transform: Transform,
    ) -> ObjectId {
        let id = ObjectId::new();
        let name = name.into();
        tracing::debug!(id = %id.short(), %name, material = material.label(), "object added");
        self.objects.push(SceneObject {
            id,
            name,
            role,
            geometry,
            material,
            transform,
        });
        id
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn find_role(&self, role: ObjectRole) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.role == role)
    }

    pub fn light_cube(&self) -> Option<&SceneObject> {
        self.find_role(ObjectRole::LightCube)
    }

    fn light_cube_mut(&mut self) -> Option<&mut SceneObject> {
        self.objects
            .iter_mut()
            .find(|o| o.role == ObjectRole::LightCube)
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.camera.set_viewport(width, height);
    }

    pub fn input(&self) -> Option<&InputBindings> {
        self.input.as_ref()
    }

    /// World-space light position as last synchronised.
    pub fn light_position(&self) -> Vec3 {
        self.light_uniform
    }

    /// Light position in the camera's view space, as the shaders consume it.
    pub fn light_position_view(&self) -> Vec3 {
        self.camera.to_view(self.light_uniform)
    }

    /// Where the light actually is this frame.
    pub fn light_source_position(&self) -> Vec3 {
        match self.light_follow {
            LightFollow::Cube => self
                .light_cube()
                .map(|cube| cube.transform.position)
                .unwrap_or(self.light_anchor),
            LightFollow::Camera => self.camera.position,
        }
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    /// Frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn set_load_error(&mut self, message: impl Into<String>) {
        self.load_error = Some(message.into());
    }

    /// Advance one frame: apply held-key movement, then sync the light uniform.
    ///
    /// Deltas for the same target are summed before they are applied, so
    /// opposing keys cancel exactly. Returns the actions that were applied.
    pub fn update(&mut self, keys: &KeyState) -> Vec<Action> {
        let actions = self
            .input
            .as_ref()
            .map(|bindings| bindings.actions(keys))
            .unwrap_or_default();

        let mut light_delta = Vec3::ZERO;
        let mut camera_delta = Vec3::ZERO;
        for action in &actions {
            match action {
                Action::MoveLight(d) => light_delta += *d,
                Action::MoveCamera(d) => camera_delta += *d,
            }
        }

        if light_delta != Vec3::ZERO {
            match self.light_cube_mut() {
                Some(cube) => cube.transform.position += light_delta,
                None => self.light_anchor += light_delta,
            }
        }
        if camera_delta != Vec3::ZERO {
            self.camera.translate(camera_delta);
        }

        self.sync_light();
        self.frame += 1;

        if !actions.is_empty() {
            tracing::trace!(
                frame = self.frame,
                light = ?self.light_uniform,
                camera = ?self.camera.position,
                "scene moved"
            );
        }
        actions
    }

    fn sync_light(&mut self) {
        self.light_uniform = self.light_source_position();
    }
}

/// Builds a [`Scene`] from a [`SceneConfig`].
#[derive(Debug, Clone)]
pub struct SceneBuilder {
    config: SceneConfig,
}

impl SceneBuilder {
    pub fn new(config: SceneConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Fetch the configured typeface. One attempt.
    pub fn load_typeface(&self) -> Result<Typeface, SceneError> {
        Ok(Typeface::load(&self.config.font)?)
    }

    /// Camera, light and light cube, without any text.
    pub fn build_empty(&self) -> Scene {
        let mut scene = Scene::new(&self.config);
        if self.config.light.visible {
            scene.add(
                "light",
                ObjectRole::LightCube,
                Geometry::cube(self.config.light.cube_size),
                Material::Basic {
                    color: self.config.light.color,
                },
                Transform::from_position(self.config.light.position),
            );
        }
        scene.sync_light();
        scene
    }

    /// Full scene: letter and digit meshes built from `typeface`.
    pub fn build(&self, typeface: &Typeface) -> Result<Scene, SceneError> {
        self.config.validate()?;
        let style = self.config.material_style;
        let letter = Geometry::text(typeface, &self.config.letter, &self.config.text)?;
        let digit = Geometry::text(typeface, &self.config.digit, &self.config.text)?;

        let mut scene = self.build_empty();
        scene.add(
            self.config.letter.clone(),
            ObjectRole::Letter,
            letter,
            style.letter_material(),
            Transform::from_position(self.config.letter_position),
        );
        scene.add(
            self.config.digit.clone(),
            ObjectRole::Digit,
            digit,
            style.digit_material(),
            Transform::from_position(self.config.digit_position),
        );
        tracing::info!(
            objects = scene.objects().len(),
            style = ?style,
            "scene built"
        );
        Ok(scene)
    }

    /// Load the typeface, then build. Failure is returned, not swallowed.
    pub fn load_and_build(&self) -> Result<Scene, SceneError> {
        let typeface = self.load_typeface()?;
        self.build(&typeface)
    }
}
