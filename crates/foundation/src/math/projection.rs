//! Geographic to scene-space projection.
//!
//! Scene space is y-up with the prime meridian facing +x after the
//! `lon + 180` shift, matching the UV layout of the globe mesh and of
//! equirectangular textures.

use super::Vec3;

/// A geographic position in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoCoordinate {
    /// Builds a coordinate, clamping latitude to [-90, 90] and longitude to
    /// [-180, 180]. Non-finite input collapses to 0.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        let finite = |v: f64| if v.is_finite() { v } else { 0.0 };
        Self {
            latitude: finite(latitude).clamp(-90.0, 90.0),
            longitude: finite(longitude).clamp(-180.0, 180.0),
        }
    }

    pub fn project(self, radius: f64) -> Vec3 {
        project(self.latitude, self.longitude, radius)
    }
}

/// Maps `(lat, lon)` in degrees to a point on a sphere of `radius`.
///
/// phi = (90 - lat) is the polar angle from +y, theta = (lon + 180) the
/// azimuth.
pub fn project(lat_deg: f64, lon_deg: f64, radius: f64) -> Vec3 {
    let phi = (90.0 - lat_deg).to_radians();
    let theta = (lon_deg + 180.0).to_radians();

    let (sin_phi, cos_phi) = phi.sin_cos();
    let (sin_theta, cos_theta) = theta.sin_cos();

    Vec3::new(
        -(radius * sin_phi * cos_theta),
        radius * cos_phi,
        radius * sin_phi * sin_theta,
    )
}

/// Texture coordinate of a geographic point on an equirectangular image
/// (u to the east, v down from the north pole).
pub fn equirect_uv(coord: GeoCoordinate) -> (f64, f64) {
    (
        (coord.longitude + 180.0) / 360.0,
        (90.0 - coord.latitude) / 180.0,
    )
}
