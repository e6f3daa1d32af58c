//! Procedural shading of the globe body.
//!
//! The globe is not textured directly: a water mask selects between two flat
//! palette colors, the day image only contributes faint land relief, night
//! lights are added on land and a rim term brightens the limb.

use formats::texture::EquirectTexture;
use foundation::color::Rgb;
use foundation::math::{GeoCoordinate, Vec3, equirect_uv};
use scene::prefabs::EARTH_RADIUS;

pub const SEA_COLOR: Rgb = Rgb::new(0.01, 0.03, 0.12);
pub const LAND_COLOR: Rgb = Rgb::new(0.12, 0.20, 0.30);
pub const RIM_TINT: Rgb = Rgb::new(0.1, 0.5, 1.0);

pub const RELIEF_GAIN: f64 = 0.1;
pub const NIGHT_LIGHTS_GAIN: f64 = 1.2;
pub const RIM_EXPONENT: f64 = 3.5;
pub const RIM_GAIN: f64 = 0.6;

/// Texture values at one surface point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SurfaceSample {
    pub day: Rgb,
    /// 1 = ocean, 0 = land.
    pub water: f64,
    pub night: Rgb,
}

/// Shades one surface point. `view_dir` points from the surface towards the
/// viewer; both vectors are normalized here.
pub fn shade(sample: &SurfaceSample, view_dir: Vec3, normal: Vec3) -> Rgb {
    let water = sample.water.clamp(0.0, 1.0);
    let mut color = LAND_COLOR.mix(SEA_COLOR, water);

    if water < 0.5 {
        color = color + Rgb::splat(sample.day.luminance()) * RELIEF_GAIN;
    }

    color = color + sample.night * (NIGHT_LIGHTS_GAIN * (1.0 - water));
    color + RIM_TINT * (rim(view_dir, normal) * RIM_GAIN)
}

/// `(1 - max(dot(view, normal), 0))^3.5`: 0 facing the viewer, 1 at the limb.
pub fn rim(view_dir: Vec3, normal: Vec3) -> f64 {
    let facing = view_dir.normalize().dot(normal.normalize()).max(0.0);
    (1.0 - facing).powf(RIM_EXPONENT)
}

/// The three equirectangular inputs of the surface model.
#[derive(Debug, Clone)]
pub struct SurfaceTextures {
    pub day: EquirectTexture,
    pub water: EquirectTexture,
    pub night: EquirectTexture,
}

impl SurfaceTextures {
    pub fn sample(&self, uv: (f64, f64)) -> SurfaceSample {
        let (u, v) = uv;
        SurfaceSample {
            day: rgb(self.day.sample_nearest(u, v)),
            water: self.water.sample_scalar(u, v),
            night: rgb(self.night.sample_nearest(u, v)),
        }
    }

    /// Color of the globe at `coord` seen from `eye`.
    pub fn shade_at(&self, coord: GeoCoordinate, eye: Vec3) -> Rgb {
        let point = coord.project(EARTH_RADIUS);
        let normal = point.normalize();
        let view_dir = eye - point;
        shade(&self.sample(equirect_uv(coord)), view_dir, normal)
    }
}

fn rgb(rgba: [u8; 4]) -> Rgb {
    Rgb::from_u8([rgba[0], rgba[1], rgba[2]])
}

#[cfg(test)]
mod tests {
    use super::{
        LAND_COLOR, RIM_GAIN, RIM_TINT, SEA_COLOR, SurfaceSample, SurfaceTextures, rim, shade,
    };
    use formats::texture::EquirectTexture;
    use foundation::color::Rgb;
    use foundation::math::{GeoCoordinate, Vec3};

    fn assert_rgb_close(a: Rgb, b: Rgb) {
        let d = a - b;
        assert!(
            d.r.abs() < 1e-9 && d.g.abs() < 1e-9 && d.b.abs() < 1e-9,
            "{a:?} vs {b:?}"
        );
    }

    const FACING: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    #[test]
    fn open_ocean_facing_viewer_is_sea_color() {
        let sample = SurfaceSample {
            day: Rgb::WHITE,
            water: 1.0,
            night: Rgb::WHITE,
        };
        assert_rgb_close(shade(&sample, FACING, FACING), SEA_COLOR);
    }

    #[test]
    fn land_gets_relief_and_lights() {
        let sample = SurfaceSample {
            day: Rgb::WHITE,
            water: 0.0,
            night: Rgb::splat(0.5),
        };
        let expected = LAND_COLOR + Rgb::splat(0.1) + Rgb::splat(0.6);
        assert_rgb_close(shade(&sample, FACING, FACING), expected);
    }

    #[test]
    fn relief_only_below_half_water() {
        let sample = SurfaceSample {
            day: Rgb::WHITE,
            water: 0.5,
            night: Rgb::BLACK,
        };
        let expected = LAND_COLOR.mix(SEA_COLOR, 0.5);
        assert_rgb_close(shade(&sample, FACING, FACING), expected);
    }

    #[test]
    fn rim_peaks_at_the_limb() {
        assert_eq!(rim(FACING, FACING), 0.0);
        assert_eq!(rim(Vec3::new(1.0, 0.0, 0.0), FACING), 1.0);
        assert_eq!(rim(-FACING, FACING), 1.0);

        let sample = SurfaceSample {
            day: Rgb::BLACK,
            water: 1.0,
            night: Rgb::BLACK,
        };
        let limb = shade(&sample, Vec3::new(0.0, 1.0, 0.0), FACING);
        assert_rgb_close(limb, SEA_COLOR + RIM_TINT * RIM_GAIN);
    }

    #[test]
    fn shade_at_reads_all_three_textures() {
        let textures = SurfaceTextures {
            day: EquirectTexture::solid([0, 0, 0, 255]),
            water: EquirectTexture::solid([0, 0, 0, 255]),
            night: EquirectTexture::solid([255, 255, 255, 255]),
        };
        let coord = GeoCoordinate::new(0.0, 0.0);
        let eye = coord.project(10.0);
        let color = textures.shade_at(coord, eye);
        assert_rgb_close(color, LAND_COLOR + Rgb::splat(1.2));
    }
}
