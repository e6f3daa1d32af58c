//! Stylized aurora oval.
//!
//! The oval is a band around the geomagnetic north pole whose angular radius
//! and width grow linearly with Kp, modulated by two moving sine "curtains".
//! It is an approximation for display, not a magnetospheric model.

use foundation::color::Rgb;
use foundation::math::{Vec3, project};
use foundation::time::Time;
use gpu::uniforms::{Uniform, UniformValue};
use scene::components::{Geometry, Material};
use scene::graph::Node;
use scene::prefabs::EARTH_RADIUS;

pub const MAGNETIC_NORTH_LAT: f64 = 83.0;
pub const MAGNETIC_NORTH_LON: f64 = -85.0;

pub const KP_MIN: f64 = 0.0;
pub const KP_MAX: f64 = 9.0;

/// Band center, radians from the pole, at Kp 0.
pub const BASE_CENTER_ANGLE: f64 = 0.32;
pub const CENTER_ANGLE_PER_KP: f64 = 0.025;
pub const BASE_BAND_WIDTH: f64 = 0.12;
pub const BAND_WIDTH_PER_KP: f64 = 0.02;

/// Fragments at or below this intensity are dropped.
pub const DISCARD_THRESHOLD: f64 = 0.02;

pub const OVAL_RADIUS: f64 = EARTH_RADIUS * 1.08;
pub const OVAL_SEGMENTS: u32 = 128;
pub const OVAL_COLOR: Rgb = Rgb::new(0.1, 1.0, 0.3);

/// Unit direction of the geomagnetic north pole in scene space.
pub fn magnetic_pole() -> Vec3 {
    project(MAGNETIC_NORTH_LAT, MAGNETIC_NORTH_LON, 1.0).normalize()
}

/// NaN reads as a quiet field; everything else is clamped to the Kp scale.
pub fn clamp_kp(kp: f64) -> f64 {
    if kp.is_nan() {
        KP_MIN
    } else {
        kp.clamp(KP_MIN, KP_MAX)
    }
}

pub fn center_angle(kp: f64) -> f64 {
    BASE_CENTER_ANGLE + clamp_kp(kp) * CENTER_ANGLE_PER_KP
}

pub fn band_width(kp: f64) -> f64 {
    BASE_BAND_WIDTH + clamp_kp(kp) * BAND_WIDTH_PER_KP
}

/// Hermite falloff; `edge0 > edge1` gives a descending ramp.
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AuroraOvalParameters {
    magnetic_pole: Vec3,
    kp: f64,
    center_angle: f64,
    band_width: f64,
    time: Time,
}

impl AuroraOvalParameters {
    pub fn new(kp: f64) -> Self {
        let kp = clamp_kp(kp);
        Self {
            magnetic_pole: magnetic_pole(),
            kp,
            center_angle: center_angle(kp),
            band_width: band_width(kp),
            time: Time::ZERO,
        }
    }

    pub fn magnetic_pole(&self) -> Vec3 {
        self.magnetic_pole
    }

    pub fn kp(&self) -> f64 {
        self.kp
    }

    pub fn center_angle(&self) -> f64 {
        self.center_angle
    }

    pub fn band_width(&self) -> f64 {
        self.band_width
    }

    pub fn time(&self) -> Time {
        self.time
    }

    /// Returns whether the clamped value differs from the current one.
    pub fn set_kp(&mut self, kp: f64) -> bool {
        let kp = clamp_kp(kp);
        if kp == self.kp {
            return false;
        }
        self.kp = kp;
        self.center_angle = center_angle(kp);
        self.band_width = band_width(kp);
        true
    }

    /// Animation time only moves forward.
    pub fn advance(&mut self, dt_s: f64) {
        self.time = self.time.advanced(dt_s);
    }

    /// Shader inputs that depend on Kp.
    pub fn kp_uniforms(&self) -> [(Uniform, UniformValue); 3] {
        [
            (Uniform::Kp, UniformValue::Float(self.kp as f32)),
            (
                Uniform::OvalCenterAngle,
                UniformValue::Float(self.center_angle as f32),
            ),
            (
                Uniform::OvalBandWidth,
                UniformValue::Float(self.band_width as f32),
            ),
        ]
    }

    pub fn uniforms(&self) -> [(Uniform, UniformValue); 5] {
        let [kp, center, width] = self.kp_uniforms();
        [
            (
                Uniform::MagneticPole,
                UniformValue::Vec3(self.magnetic_pole.to_f32()),
            ),
            (
                Uniform::Time,
                UniformValue::Float(self.time.seconds() as f32),
            ),
            kp,
            center,
            width,
        ]
    }
}

/// Band intensity at a point of the oval shell, or `None` where the
/// fragment is discarded.
pub fn intensity(surface_pos: Vec3, params: &AuroraOvalParameters) -> Option<f64> {
    let pos = surface_pos.normalize();
    let angle = pos.dot(params.magnetic_pole).clamp(-1.0, 1.0).acos();
    let distance = (angle - params.center_angle).abs();
    let base = smoothstep(params.band_width, 0.0, distance);

    let t = params.time.seconds();
    let n1 = (pos.x * 30.0 + t * 0.5).sin() * (pos.z * 30.0 + t * 0.3).sin();
    let n2 = (pos.x * 15.0 - t * 0.2).sin() * (pos.z * 15.0 + t * 0.4).cos();

    let value = (base * (0.6 + 0.4 * n1 * n2)).powf(0.8) * 0.8;
    (value > DISCARD_THRESHOLD).then_some(value)
}

/// Additive, double-sided shell carrying the oval shader.
pub fn oval_node() -> Node {
    Node::mesh(
        "aurora-oval",
        Geometry::sphere(OVAL_RADIUS, OVAL_SEGMENTS),
        Material::aurora_oval(OVAL_COLOR),
    )
}

#[cfg(test)]
mod tests {
    use super::{
        AuroraOvalParameters, DISCARD_THRESHOLD, band_width, center_angle, clamp_kp, intensity,
        magnetic_pole, oval_node, smoothstep,
    };
    use foundation::math::Vec3;
    use gpu::uniforms::{Uniform, UniformValue};
    use scene::components::{Blend, Side};

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "{a} vs {b}");
    }

    /// Point at `angle` radians from the magnetic pole.
    fn from_pole(angle: f64) -> Vec3 {
        let pole = magnetic_pole();
        let side = pole.cross(Vec3::Y).normalize();
        pole * angle.cos() + side * angle.sin()
    }

    #[test]
    fn band_endpoints() {
        assert_close(center_angle(0.0), 0.32, 1e-12);
        assert_close(band_width(0.0), 0.12, 1e-12);
        assert_close(center_angle(9.0), 0.545, 1e-12);
        assert_close(band_width(9.0), 0.30, 1e-12);
    }

    #[test]
    fn band_grows_monotonically_with_kp() {
        let mut last = (center_angle(0.0), band_width(0.0));
        for step in 1..=90 {
            let kp = step as f64 / 10.0;
            let next = (center_angle(kp), band_width(kp));
            assert!(next.0 >= last.0 && next.1 >= last.1, "kp {kp}");
            last = next;
        }
    }

    #[test]
    fn kp_is_clamped() {
        assert_eq!(clamp_kp(f64::NAN), 0.0);
        assert_eq!(clamp_kp(-2.0), 0.0);
        assert_eq!(clamp_kp(12.0), 9.0);
        assert_eq!(clamp_kp(f64::INFINITY), 9.0);
        assert_close(center_angle(50.0), 0.545, 1e-12);
    }

    #[test]
    fn pole_is_unit_and_northern() {
        let pole = magnetic_pole();
        assert_close(pole.length(), 1.0, 1e-12);
        assert_close(pole.y, 83f64.to_radians().sin(), 1e-12);
    }

    #[test]
    fn smoothstep_descends_across_the_band() {
        assert_eq!(smoothstep(0.2, 0.0, 0.0), 1.0);
        assert_eq!(smoothstep(0.2, 0.0, 0.2), 0.0);
        assert_eq!(smoothstep(0.2, 0.0, 0.5), 0.0);
        assert_close(smoothstep(0.2, 0.0, 0.1), 0.5, 1e-12);
    }

    #[test]
    fn outside_the_band_is_discarded() {
        for kp in [0.0, 4.5, 9.0] {
            let mut params = AuroraOvalParameters::new(kp);
            for step in 0..20 {
                params.advance(0.37 * step as f64);
                let beyond = params.center_angle() + params.band_width() + 0.01;
                assert_eq!(intensity(from_pole(beyond), &params), None);
                let inside = params.center_angle() - params.band_width() - 0.01;
                assert_eq!(intensity(from_pole(inside), &params), None);
            }
        }
    }

    #[test]
    fn band_center_is_always_visible() {
        let mut params = AuroraOvalParameters::new(3.0);
        for step in 0..50 {
            params.advance(0.25);
            let value = intensity(from_pole(params.center_angle()), &params).unwrap();
            assert!(value > DISCARD_THRESHOLD && value <= 0.8 + 1e-12, "step {step}");
        }
    }

    #[test]
    fn set_kp_reports_changes_and_time_never_rewinds() {
        let mut params = AuroraOvalParameters::new(2.0);
        assert!(!params.set_kp(2.0));
        assert!(params.set_kp(5.0));
        assert!(!params.set_kp(5.0));
        assert!(params.set_kp(f64::NAN));
        assert_eq!(params.kp(), 0.0);

        params.advance(1.5);
        params.advance(-3.0);
        params.advance(f64::NAN);
        assert_eq!(params.time().seconds(), 1.5);
    }

    #[test]
    fn uniforms_carry_current_state() {
        let mut params = AuroraOvalParameters::new(9.0);
        params.advance(2.0);
        let uniforms = params.uniforms();
        assert!(uniforms.contains(&(Uniform::Time, UniformValue::Float(2.0))));
        assert!(uniforms.contains(&(Uniform::Kp, UniformValue::Float(9.0))));
        assert!(uniforms.contains(&(Uniform::OvalBandWidth, UniformValue::Float(0.3))));
    }

    #[test]
    fn oval_shell_is_additive_and_double_sided() {
        let node = oval_node();
        let material = node.material().copied().unwrap();
        assert_eq!(material.blend, Blend::Additive);
        assert_eq!(material.side, Side::Double);
        assert!(!material.depth_write);
    }
}
