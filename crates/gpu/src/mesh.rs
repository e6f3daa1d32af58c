//! CPU tessellation of scene geometry into upload-ready vertex data.

use bytemuck::{Pod, Zeroable};
use scene::components::{Geometry, Starfield};
use std::f64::consts::{PI, TAU};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

pub fn tessellate(geometry: &Geometry) -> MeshData {
    match *geometry {
        Geometry::Sphere {
            radius,
            width_segments,
            height_segments,
        } => sphere_mesh(radius, width_segments, height_segments),
    }
}

/// UV sphere whose texture coordinates follow the equirectangular layout of
/// `foundation::math::equirect_uv`. Triangles wind counter-clockwise seen
/// from outside.
pub fn sphere_mesh(radius: f64, width_segments: u32, height_segments: u32) -> MeshData {
    let w = width_segments.max(3);
    let h = height_segments.max(2);
    let mut mesh = MeshData::default();

    for iy in 0..=h {
        let v = iy as f64 / h as f64;
        let (sin_phi, cos_phi) = (v * PI).sin_cos();
        for ix in 0..=w {
            let u = ix as f64 / w as f64;
            let (sin_theta, cos_theta) = (u * TAU).sin_cos();
            let normal = [
                (-cos_theta * sin_phi) as f32,
                cos_phi as f32,
                (sin_theta * sin_phi) as f32,
            ];
            mesh.vertices.push(MeshVertex {
                position: normal.map(|c| c * radius as f32),
                normal,
                uv: [u as f32, v as f32],
            });
        }
    }

    let row = w + 1;
    for iy in 0..h {
        for ix in 0..w {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            if iy != 0 {
                mesh.indices.extend([a, b, d]);
            }
            if iy != h - 1 {
                mesh.indices.extend([b, c, d]);
            }
        }
    }
    mesh
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct StarInstance {
    pub position: [f32; 3],
    /// Point size in pixels before distance attenuation.
    pub size: f32,
}

/// Deterministic star shell. Stars are spread uniformly over the sphere with
/// radii stepping from `radius + depth` down to `radius`.
pub fn star_instances(starfield: &Starfield) -> Vec<StarInstance> {
    let count = starfield.count as usize;
    let mut rng = SplitMix64(0x5eed_0f_57a2);
    let mut out = Vec::with_capacity(count);
    let step = if count > 0 {
        starfield.depth / count as f64
    } else {
        0.0
    };
    let mut r = starfield.radius + starfield.depth;
    for _ in 0..count {
        let polar = (1.0 - rng.next_f64() * 2.0).acos();
        let azimuth = rng.next_f64() * TAU;
        let size = (0.5 + 0.5 * rng.next_f64()) * starfield.size_factor;
        out.push(StarInstance {
            position: [
                (r * polar.sin() * azimuth.sin()) as f32,
                (r * polar.cos()) as f32,
                (r * polar.sin() * azimuth.cos()) as f32,
            ],
            size: size as f32,
        });
        r -= step;
    }
    out
}

struct SplitMix64(u64);

impl SplitMix64 {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::{sphere_mesh, star_instances};
    use foundation::math::{GeoCoordinate, equirect_uv};
    use scene::components::Starfield;

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "{a} vs {b}");
    }

    #[test]
    fn sphere_counts() {
        let mesh = sphere_mesh(1.0, 8, 4);
        assert_eq!(mesh.vertices.len(), 9 * 5);
        // Pole rows contribute one triangle per quad, inner rows two.
        assert_eq!(mesh.indices.len(), (8 * 2 + 8 * 2 * 2) * 3);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn vertices_sit_on_radius_with_projected_uvs() {
        let radius = 2.5;
        let mesh = sphere_mesh(radius, 36, 18);
        for vertex in &mesh.vertices {
            let [x, y, z] = vertex.position;
            let len = ((x * x + y * y + z * z) as f64).sqrt();
            assert_close(len, radius, 1e-5);

            let lat = 90.0 - vertex.uv[1] as f64 * 180.0;
            let lon = vertex.uv[0] as f64 * 360.0 - 180.0;
            let expected = GeoCoordinate::new(lat, lon).project(radius);
            assert_close(x as f64, expected.x, 1e-4);
            assert_close(y as f64, expected.y, 1e-4);
            assert_close(z as f64, expected.z, 1e-4);

            let (u, v) = equirect_uv(GeoCoordinate::new(lat, lon));
            assert_close(u, vertex.uv[0] as f64, 1e-5);
            assert_close(v, vertex.uv[1] as f64, 1e-5);
        }
    }

    #[test]
    fn stars_fill_the_shell() {
        let field = Starfield {
            count: 500,
            radius: 300.0,
            depth: 50.0,
            size_factor: 20.0,
            saturation: 0.0,
        };
        let stars = star_instances(&field);
        assert_eq!(stars.len(), 500);
        for star in &stars {
            let [x, y, z] = star.position;
            let r = ((x * x + y * y + z * z) as f64).sqrt();
            assert!((299.9..=350.1).contains(&r), "radius {r}");
            assert!((10.0..=20.0).contains(&star.size));
        }
        assert_eq!(stars, star_instances(&field));
    }
}
