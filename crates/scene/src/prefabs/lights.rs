use crate::components::{Light, Transform};
use crate::graph::Node;
use foundation::color::Rgb;
use foundation::math::Vec3;

/// Ambient fill, a white key light and a dim directional back light.
pub fn lights() -> [Node; 3] {
    [
        Node::light(
            "ambient",
            Light::Ambient {
                color: Rgb::WHITE,
                intensity: 0.1,
            },
        ),
        Node::light(
            "key-light",
            Light::Point {
                color: Rgb::WHITE,
                intensity: 1.5,
                distance: 0.0,
                decay: 2.0,
            },
        )
        .with_transform(Transform::translate(Vec3::new(15.0, 10.0, 10.0))),
        Node::light(
            "back-light",
            Light::Directional {
                color: Rgb::WHITE,
                intensity: 0.5,
            },
        )
        .with_transform(Transform::translate(Vec3::new(-10.0, 5.0, 2.0))),
    ]
}
