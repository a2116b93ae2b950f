/// WGSL for every text and light-cube mesh.
///
/// One vertex stage, three fragment stages (`fs_basic`, `fs_glow`, `fs_lit`),
/// each paired with its own pipeline. Lighting happens in view space.
pub const SCENE_SHADER: &str = r#"
struct ObjectUniforms {
    view_proj: mat4x4<f32>,
    view: mat4x4<f32>,
    model: mat4x4<f32>,
    normal_matrix: mat4x4<f32>,
    color: vec4<f32>,
    specular: vec4<f32>,
    // World space; moved into view space per fragment.
    light_pos: vec4<f32>,
    // x: shininess, y: ambient intensity, z: glow intensity, w: 0 phong / 1 blinn-phong
    params: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> u: ObjectUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) view_pos: vec3<f32>,
    @location(1) view_normal: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    let world_pos = u.model * vec4<f32>(vertex.position, 1.0);
    var out: VertexOutput;
    out.clip_position = u.view_proj * world_pos;
    out.view_pos = (u.view * world_pos).xyz;
    out.view_normal = normalize((u.normal_matrix * vec4<f32>(vertex.normal, 0.0)).xyz);
    return out;
}

@fragment
fn fs_basic(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(u.color.rgb, 1.0);
}

@fragment
fn fs_glow(in: VertexOutput) -> @location(0) vec4<f32> {
    let facing = 0.5 + 0.5 * dot(normalize(in.view_normal), vec3<f32>(0.0, 0.0, 1.0));
    return vec4<f32>(u.color.rgb * u.params.z * facing, 1.0);
}

fn safe_normalize(v: vec3<f32>) -> vec3<f32> {
    let len = length(v);
    if (len > 0.0) {
        return v / len;
    }
    return vec3<f32>(0.0);
}

@fragment
fn fs_lit(in: VertexOutput) -> @location(0) vec4<f32> {
    let normal = safe_normalize(in.view_normal);
    let base = u.color.rgb;
    let light_view = (u.view * vec4<f32>(u.light_pos.xyz, 1.0)).xyz;

    let ambient = u.params.y * base;

    let light_dir = safe_normalize(light_view - in.view_pos);
    let diffuse = max(dot(light_dir, normal), 0.0) * base;

    let view_dir = safe_normalize(-in.view_pos);
    var spec = 0.0;
    if (u.params.w < 0.5) {
        let reflect_dir = reflect(-light_dir, normal);
        spec = pow(max(dot(view_dir, reflect_dir), 0.0), u.params.x);
    } else {
        let half_dir = safe_normalize(light_dir + view_dir);
        spec = pow(max(dot(normal, half_dir), 0.0), u.params.x);
    }
    let specular = spec * u.specular.rgb;

    return vec4<f32>(ambient + diffuse + specular, 1.0);
}
"#;
