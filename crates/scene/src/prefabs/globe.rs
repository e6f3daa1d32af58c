use crate::components::{Geometry, Material};
use crate::graph::Node;

/// Radius of the globe body in scene units.
pub const EARTH_RADIUS: f64 = 2.5;

pub const GLOBE_SEGMENTS: u32 = 64;

/// Globe body bound to the procedural surface shading.
pub fn globe() -> Node {
    Node::mesh(
        "globe",
        Geometry::sphere(EARTH_RADIUS, GLOBE_SEGMENTS),
        Material::surface(),
    )
}
