use crate::pipeline::PipelineError;
use crate::renderer::{DrawCommand, LightCommand};
use bytemuck::{Pod, Zeroable};
use foundation::math::{MAT4_IDENTITY, Mat4};
use scene::components::Light;

/// Frame-wide shader inputs addressable through
/// [`crate::RenderPipeline::set_uniform`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Uniform {
    ViewProj,
    CameraEye,
    /// Viewport size in pixels.
    Viewport,
    /// Seconds of oval animation time.
    Time,
    Kp,
    MagneticPole,
    OvalCenterAngle,
    OvalBandWidth,
}

impl Uniform {
    pub fn kind(self) -> UniformKind {
        match self {
            Uniform::ViewProj => UniformKind::Mat4,
            Uniform::CameraEye | Uniform::MagneticPole => UniformKind::Vec3,
            Uniform::Viewport => UniformKind::Vec2,
            Uniform::Time | Uniform::Kp | Uniform::OvalCenterAngle | Uniform::OvalBandWidth => {
                UniformKind::Float
            }
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum UniformKind {
    Float,
    Vec2,
    Vec3,
    Mat4,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Mat4(Mat4),
}

impl UniformValue {
    pub fn kind(&self) -> UniformKind {
        match self {
            UniformValue::Float(_) => UniformKind::Float,
            UniformValue::Vec2(_) => UniformKind::Vec2,
            UniformValue::Vec3(_) => UniformKind::Vec3,
            UniformValue::Mat4(_) => UniformKind::Mat4,
        }
    }
}

/// The globe's three equirectangular inputs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Day,
    Water,
    Night,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 3] = [TextureSlot::Day, TextureSlot::Water, TextureSlot::Night];

    pub fn index(self) -> usize {
        match self {
            TextureSlot::Day => 0,
            TextureSlot::Water => 1,
            TextureSlot::Night => 2,
        }
    }
}

/// CPU-side copy of every [`Uniform`], validated on write.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UniformBlock {
    pub view_proj: Mat4,
    pub eye: [f32; 3],
    pub viewport: [f32; 2],
    pub time: f32,
    pub kp: f32,
    pub magnetic_pole: [f32; 3],
    pub oval_center_angle: f32,
    pub oval_band_width: f32,
}

impl Default for UniformBlock {
    fn default() -> Self {
        Self {
            view_proj: MAT4_IDENTITY,
            eye: [0.0, 0.0, 1.0],
            viewport: [1.0, 1.0],
            time: 0.0,
            kp: 0.0,
            magnetic_pole: [0.0, 1.0, 0.0],
            oval_center_angle: 0.0,
            oval_band_width: 0.0,
        }
    }
}

impl UniformBlock {
    pub fn set(&mut self, uniform: Uniform, value: UniformValue) -> Result<(), PipelineError> {
        match (uniform, value) {
            (Uniform::ViewProj, UniformValue::Mat4(m)) => self.view_proj = m,
            (Uniform::CameraEye, UniformValue::Vec3(v)) => self.eye = v,
            (Uniform::MagneticPole, UniformValue::Vec3(v)) => self.magnetic_pole = v,
            (Uniform::Viewport, UniformValue::Vec2(v)) => self.viewport = v,
            (Uniform::Time, UniformValue::Float(v)) => self.time = v,
            (Uniform::Kp, UniformValue::Float(v)) => self.kp = v,
            (Uniform::OvalCenterAngle, UniformValue::Float(v)) => self.oval_center_angle = v,
            (Uniform::OvalBandWidth, UniformValue::Float(v)) => self.oval_band_width = v,
            (uniform, value) => {
                return Err(PipelineError::UniformType {
                    uniform,
                    expected: uniform.kind(),
                    actual: value.kind(),
                });
            }
        }
        Ok(())
    }
}

pub const MAX_LIGHTS: usize = 4;

const LIGHT_DIRECTIONAL: f32 = 1.0;
const LIGHT_POINT: f32 = 2.0;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct GpuLight {
    /// xyz world position, w kind (0 none, 1 directional, 2 point).
    pub position_kind: [f32; 4],
    /// rgb color scaled by intensity, w cutoff distance (0 = unlimited).
    pub color_range: [f32; 4],
    /// x decay exponent.
    pub params: [f32; 4],
}

/// Layout of the `Globals` uniform shared by every WGSL program.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct FrameGlobals {
    pub view_proj: Mat4,
    /// xyz camera eye, w oval time.
    pub eye_time: [f32; 4],
    /// xyz magnetic pole, w Kp.
    pub pole_kp: [f32; 4],
    /// x band center angle, y band width, zw viewport size.
    pub oval_viewport: [f32; 4],
    /// rgb ambient light, w unused.
    pub ambient: [f32; 4],
    pub lights: [GpuLight; MAX_LIGHTS],
}

impl FrameGlobals {
    pub fn new(block: &UniformBlock, lights: &[LightCommand]) -> Self {
        let [ex, ey, ez] = block.eye;
        let [px, py, pz] = block.magnetic_pole;
        let mut out = Self {
            view_proj: block.view_proj,
            eye_time: [ex, ey, ez, block.time],
            pole_kp: [px, py, pz, block.kp],
            oval_viewport: [
                block.oval_center_angle,
                block.oval_band_width,
                block.viewport[0],
                block.viewport[1],
            ],
            ambient: [0.0; 4],
            lights: [GpuLight::zeroed(); MAX_LIGHTS],
        };

        let mut slot = 0;
        for command in lights {
            let [x, y, z] = command.position.to_f32();
            match command.light {
                Light::Ambient { color, intensity } => {
                    let [r, g, b] = (color * intensity).to_f32();
                    out.ambient[0] += r;
                    out.ambient[1] += g;
                    out.ambient[2] += b;
                }
                Light::Directional { color, intensity } if slot < MAX_LIGHTS => {
                    let [r, g, b] = (color * intensity).to_f32();
                    out.lights[slot] = GpuLight {
                        position_kind: [x, y, z, LIGHT_DIRECTIONAL],
                        color_range: [r, g, b, 0.0],
                        params: [0.0; 4],
                    };
                    slot += 1;
                }
                Light::Point {
                    color,
                    intensity,
                    distance,
                    decay,
                } if slot < MAX_LIGHTS => {
                    let [r, g, b] = (color * intensity).to_f32();
                    out.lights[slot] = GpuLight {
                        position_kind: [x, y, z, LIGHT_POINT],
                        color_range: [r, g, b, distance as f32],
                        params: [decay as f32, 0.0, 0.0, 0.0],
                    };
                    slot += 1;
                }
                _ => {
                    tracing::debug!("light limit reached; extra light ignored");
                }
            }
        }
        out
    }
}

/// Per-draw shader inputs, one aligned slot per draw command.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct DrawUniform {
    pub model: Mat4,
    /// rgb material color, a opacity.
    pub color: [f32; 4],
    /// x point size factor, yzw unused.
    pub params: [f32; 4],
}

impl DrawUniform {
    /// `point_scale` multiplies star sizes, usually the device pixel ratio.
    pub fn new(command: &DrawCommand<'_>, point_scale: f32) -> Self {
        let material = command.material;
        Self {
            model: command.world,
            color: material.color.with_alpha(material.opacity),
            params: [point_scale, 0.0, 0.0, 0.0],
        }
    }
}

/// Dynamic-offset stride of [`DrawUniform`] slots.
pub const DRAW_UNIFORM_STRIDE: u64 = 256;

#[cfg(test)]
mod tests {
    use super::{DrawUniform, FrameGlobals, Uniform, UniformBlock, UniformKind, UniformValue};
    use crate::pipeline::PipelineError;
    use crate::renderer::LightCommand;
    use foundation::color::Rgb;
    use foundation::handles::Handle;
    use foundation::math::Vec3;
    use scene::components::Light;
    use scene::entity::NodeId;

    #[test]
    fn block_rejects_mismatched_types() {
        let mut block = UniformBlock::default();
        block.set(Uniform::Kp, UniformValue::Float(4.0)).unwrap();
        assert_eq!(block.kp, 4.0);

        let err = block
            .set(Uniform::Kp, UniformValue::Vec3([0.0; 3]))
            .unwrap_err();
        assert_eq!(
            err,
            PipelineError::UniformType {
                uniform: Uniform::Kp,
                expected: UniformKind::Float,
                actual: UniformKind::Vec3,
            }
        );
        assert_eq!(block.kp, 4.0);
    }

    #[test]
    fn layouts_match_wgsl_sizes() {
        assert_eq!(std::mem::size_of::<FrameGlobals>(), 320);
        assert_eq!(std::mem::size_of::<DrawUniform>(), 96);
        assert!(std::mem::size_of::<DrawUniform>() as u64 <= super::DRAW_UNIFORM_STRIDE);
    }

    #[test]
    fn globals_pack_lights() {
        let node = NodeId(Handle::new(1, 0));
        let lights = [
            LightCommand {
                node,
                light: Light::Ambient {
                    color: Rgb::WHITE,
                    intensity: 0.1,
                },
                position: Vec3::ZERO,
            },
            LightCommand {
                node,
                light: Light::Point {
                    color: Rgb::WHITE,
                    intensity: 1.5,
                    distance: 0.0,
                    decay: 2.0,
                },
                position: Vec3::new(15.0, 10.0, 10.0),
            },
        ];
        let globals = FrameGlobals::new(&UniformBlock::default(), &lights);
        assert!((globals.ambient[0] - 0.1).abs() < 1e-6);
        assert_eq!(globals.lights[0].position_kind, [15.0, 10.0, 10.0, 2.0]);
        assert_eq!(globals.lights[0].params[0], 2.0);
        assert_eq!(globals.lights[1].position_kind[3], 0.0);
    }
}
