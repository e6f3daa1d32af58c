//! WGSL sources. Every program is `COMMON` plus its own stage functions.

use crate::renderer::{DrawCommand, DrawKind};
use scene::components::Shading;

/// Shared bindings: frame globals at binding 0, the per-draw slot at
/// binding 1 (dynamic offset). Layouts mirror `FrameGlobals` and
/// `DrawUniform`.
const COMMON: &str = r#"
struct GpuLight {
    position_kind: vec4<f32>,
    color_range: vec4<f32>,
    params: vec4<f32>,
};

struct Globals {
    view_proj: mat4x4<f32>,
    eye_time: vec4<f32>,
    pole_kp: vec4<f32>,
    oval_viewport: vec4<f32>,
    ambient: vec4<f32>,
    lights: array<GpuLight, 4>,
};

struct DrawSlot {
    model: mat4x4<f32>,
    color: vec4<f32>,
    params: vec4<f32>,
};

@group(0) @binding(0) var<uniform> globals: Globals;
@group(0) @binding(1) var<uniform> slot: DrawSlot;

struct MeshIn {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct MeshOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
    @location(3) local_pos: vec3<f32>,
};

@vertex
fn vs_mesh(v: MeshIn) -> MeshOut {
    var out: MeshOut;
    let world = slot.model * vec4<f32>(v.position, 1.0);
    out.clip = globals.view_proj * world;
    out.world_pos = world.xyz;
    out.world_normal = normalize((slot.model * vec4<f32>(v.normal, 0.0)).xyz);
    out.uv = v.uv;
    out.local_pos = v.position;
    return out;
}
"#;

const GLOBE: &str = r#"
@group(1) @binding(0) var day_map: texture_2d<f32>;
@group(1) @binding(1) var water_map: texture_2d<f32>;
@group(1) @binding(2) var night_map: texture_2d<f32>;
@group(1) @binding(3) var surface_sampler: sampler;

@fragment
fn fs_globe(in: MeshOut) -> @location(0) vec4<f32> {
    let normal = normalize(in.world_normal);
    let water = textureSample(water_map, surface_sampler, in.uv).r;
    let day = textureSample(day_map, surface_sampler, in.uv).rgb;
    let lights = textureSample(night_map, surface_sampler, in.uv).rgb;

    var color = mix(vec3<f32>(0.12, 0.20, 0.30), vec3<f32>(0.01, 0.03, 0.12), water);
    if (water < 0.5) {
        color += vec3<f32>(dot(day, vec3<f32>(0.299, 0.587, 0.114))) * 0.1;
    }
    color += lights * 1.2 * (1.0 - water);

    let view_dir = normalize(globals.eye_time.xyz - in.world_pos);
    let rim = pow(max(1.0 - max(dot(view_dir, normal), 0.0), 0.0), 3.5);
    color += vec3<f32>(0.1, 0.5, 1.0) * rim * 0.6;
    return vec4<f32>(color, 1.0);
}
"#;

const OVAL: &str = r#"
@fragment
fn fs_oval(in: MeshOut) -> @location(0) vec4<f32> {
    let pos = normalize(in.local_pos);
    let t = globals.eye_time.w;
    let angle = acos(clamp(dot(pos, globals.pole_kp.xyz), -1.0, 1.0));
    let dist = abs(angle - globals.oval_viewport.x);
    let edge = clamp(1.0 - dist / globals.oval_viewport.y, 0.0, 1.0);
    var alpha = edge * edge * (3.0 - 2.0 * edge);

    let n1 = sin(pos.x * 30.0 + t * 0.5) * sin(pos.z * 30.0 + t * 0.3);
    let n2 = sin(pos.x * 15.0 - t * 0.2) * cos(pos.z * 15.0 + t * 0.4);
    alpha = alpha * (0.6 + 0.4 * n1 * n2);
    alpha = pow(alpha, 0.8) * 0.8;
    if (alpha <= 0.02) {
        discard;
    }
    return vec4<f32>(slot.color.rgb, alpha);
}
"#;

const PHONG: &str = r#"
@fragment
fn fs_phong(in: MeshOut, @builtin(front_facing) front: bool) -> @location(0) vec4<f32> {
    var normal = normalize(in.world_normal);
    if (!front) {
        normal = -normal;
    }
    var light = globals.ambient.rgb;
    for (var i = 0u; i < 4u; i = i + 1u) {
        let l = globals.lights[i];
        let kind = l.position_kind.w;
        if (kind < 0.5) {
            continue;
        }
        var dir = normalize(l.position_kind.xyz);
        var attenuation = 1.0;
        if (kind > 1.5) {
            let to_light = l.position_kind.xyz - in.world_pos;
            let d = length(to_light);
            dir = to_light / max(d, 1e-6);
            let range = l.color_range.w;
            if (range > 0.0) {
                attenuation = pow(clamp(1.0 - d / range, 0.0, 1.0), l.params.x);
            }
        }
        light += l.color_range.rgb * max(dot(normal, dir), 0.0) * attenuation;
    }
    return vec4<f32>(slot.color.rgb * light, slot.color.a);
}
"#;

const BASIC: &str = r#"
@fragment
fn fs_basic(in: MeshOut) -> @location(0) vec4<f32> {
    return slot.color;
}
"#;

const LINES: &str = r#"
@vertex
fn vs_lines(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return globals.view_proj * slot.model * vec4<f32>(position, 1.0);
}

@fragment
fn fs_lines() -> @location(0) vec4<f32> {
    return slot.color;
}
"#;

const STARS: &str = r#"
struct StarOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) corner: vec2<f32>,
};

@vertex
fn vs_stars(
    @builtin(vertex_index) vi: u32,
    @location(0) position: vec3<f32>,
    @location(1) size: f32,
) -> StarOut {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
    );
    let corner = corners[vi % 6u];
    let world = slot.model * vec4<f32>(position, 1.0);
    let clip = globals.view_proj * world;
    let dist = max(length(world.xyz - globals.eye_time.xyz), 1e-3);
    let px = size * slot.params.x * (90.0 / dist);
    let viewport = max(globals.oval_viewport.zw, vec2<f32>(1.0, 1.0));
    var out: StarOut;
    out.clip = vec4<f32>(clip.xy + corner * px / viewport * clip.w, clip.zw);
    out.corner = corner;
    return out;
}

@fragment
fn fs_stars(in: StarOut) -> @location(0) vec4<f32> {
    let r = dot(in.corner, in.corner);
    if (r > 1.0) {
        discard;
    }
    return vec4<f32>(slot.color.rgb, 1.0 - r);
}
"#;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaderProgram {
    Globe,
    Oval,
    Phong,
    Basic,
    Lines,
    Stars,
}

impl ShaderProgram {
    pub const ALL: [ShaderProgram; 6] = [
        ShaderProgram::Globe,
        ShaderProgram::Oval,
        ShaderProgram::Phong,
        ShaderProgram::Basic,
        ShaderProgram::Lines,
        ShaderProgram::Stars,
    ];

    /// Program that draws `command`: lines and points have their own, meshes
    /// follow the material's shading.
    pub fn for_draw(command: &DrawCommand<'_>) -> Self {
        match (&command.kind, command.material.shading) {
            (DrawKind::Lines(_), _) => ShaderProgram::Lines,
            (DrawKind::Points(_), _) => ShaderProgram::Stars,
            (DrawKind::Mesh(_), Shading::Surface) => ShaderProgram::Globe,
            (DrawKind::Mesh(_), Shading::AuroraOval) => ShaderProgram::Oval,
            (DrawKind::Mesh(_), Shading::Phong) => ShaderProgram::Phong,
            (DrawKind::Mesh(_), Shading::Basic) => ShaderProgram::Basic,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShaderProgram::Globe => "globe",
            ShaderProgram::Oval => "aurora-oval",
            ShaderProgram::Phong => "phong",
            ShaderProgram::Basic => "basic",
            ShaderProgram::Lines => "lines",
            ShaderProgram::Stars => "stars",
        }
    }

    pub fn source(self) -> String {
        let body = match self {
            ShaderProgram::Globe => GLOBE,
            ShaderProgram::Oval => OVAL,
            ShaderProgram::Phong => PHONG,
            ShaderProgram::Basic => BASIC,
            ShaderProgram::Lines => LINES,
            ShaderProgram::Stars => STARS,
        };
        format!("{COMMON}{body}")
    }

    pub fn vertex_entry(self) -> &'static str {
        match self {
            ShaderProgram::Lines => "vs_lines",
            ShaderProgram::Stars => "vs_stars",
            _ => "vs_mesh",
        }
    }

    pub fn fragment_entry(self) -> &'static str {
        match self {
            ShaderProgram::Globe => "fs_globe",
            ShaderProgram::Oval => "fs_oval",
            ShaderProgram::Phong => "fs_phong",
            ShaderProgram::Basic => "fs_basic",
            ShaderProgram::Lines => "fs_lines",
            ShaderProgram::Stars => "fs_stars",
        }
    }

    /// Whether the program binds the surface textures at group 1.
    pub fn uses_surface_textures(self) -> bool {
        self == ShaderProgram::Globe
    }
}
