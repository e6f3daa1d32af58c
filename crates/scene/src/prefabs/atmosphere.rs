use crate::components::{Geometry, Material, Side};
use crate::graph::Node;
use crate::prefabs::globe::EARTH_RADIUS;
use foundation::color::Rgb;

pub const ATMOSPHERE_RADIUS: f64 = EARTH_RADIUS + 0.35;
pub const ATMOSPHERE_OPACITY: f64 = 0.15;

/// Back-faced additive halo around the globe.
pub fn atmosphere() -> Node {
    let color = Rgb::from_hex("#0044aa").unwrap_or(Rgb::new(0.0, 0.267, 0.667));
    Node::mesh(
        "atmosphere",
        Geometry::sphere(ATMOSPHERE_RADIUS, 64),
        Material::phong(color)
            .additive()
            .transparent(ATMOSPHERE_OPACITY)
            .side(Side::Back),
    )
}
