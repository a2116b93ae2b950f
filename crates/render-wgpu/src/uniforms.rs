use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use textscene_assets::Geometry;
use textscene_render::{Material, Scene, SceneObject, SpecularModel};

/// Which fragment stage draws a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderKind {
    Basic,
    Glow,
    Lit,
}

impl ShaderKind {
    pub fn of(material: &Material) -> Self {
        match material {
            Material::Basic { .. } => ShaderKind::Basic,
            Material::Glow { .. } => ShaderKind::Glow,
            Material::Lit(_) => ShaderKind::Lit,
        }
    }

    pub fn entry_point(self) -> &'static str {
        match self {
            ShaderKind::Basic => "fs_basic",
            ShaderKind::Glow => "fs_glow",
            ShaderKind::Lit => "fs_lit",
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Interleave positions and normals for the vertex buffer.
pub(crate) fn vertices(geometry: &Geometry) -> Vec<Vertex> {
    geometry
        .positions
        .iter()
        .zip(&geometry.normals)
        .map(|(p, n)| Vertex {
            position: p.to_array(),
            normal: n.to_array(),
        })
        .collect()
}

/// Per-object uniform block; layout matches `ObjectUniforms` in the shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct ObjectUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub specular: [f32; 4],
    pub light_pos: [f32; 4],
    pub params: [f32; 4],
}

impl ObjectUniforms {
    pub fn new(scene: &Scene, object: &SceneObject) -> Self {
        let camera = scene.camera();
        let view = camera.view_matrix();
        let model = object.transform.matrix();
        let normal_matrix = (view * model).inverse().transpose();

        let (color, specular, params) = match object.material {
            Material::Basic { color } => (color.to_array4(), [0.0; 4], [0.0; 4]),
            Material::Glow { color, intensity } => {
                (color.to_array4(), [0.0; 4], [0.0, 0.0, intensity, 0.0])
            }
            Material::Lit(p) => {
                let model = match p.model {
                    SpecularModel::Phong => 0.0,
                    SpecularModel::BlinnPhong => 1.0,
                };
                (
                    p.base_color.to_array4(),
                    p.specular_color.to_array4(),
                    [p.shininess, p.ambient_intensity, 0.0, model],
                )
            }
        };

        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            normal_matrix: normal_matrix.to_cols_array_2d(),
            color,
            specular,
            light_pos: light_uniform(scene.light_position()),
            params,
        }
    }
}

fn light_uniform(position: Vec3) -> [f32; 4] {
    position.extend(1.0).to_array()
}
