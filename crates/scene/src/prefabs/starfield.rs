use crate::components::{Material, Starfield, Transform};
use crate::graph::Node;
use foundation::color::Rgb;

/// Background starfield with a fixed (non-flickering) point set.
pub fn starfield() -> Node {
    Node::points(
        "stars",
        Starfield {
            count: 5000,
            radius: 300.0,
            depth: 50.0,
            size_factor: 20.0,
            saturation: 0.0,
        },
        Material::basic(Rgb::WHITE).additive(),
    )
}

/// Slow drift of the star shell: -0.005 rad/s around Y, +0.001 rad/s around X.
pub fn drift_starfield(transform: &mut Transform, dt_s: f64) {
    if !dt_s.is_finite() || dt_s <= 0.0 {
        return;
    }
    transform.rotation.y -= dt_s * 0.005;
    transform.rotation.x += dt_s * 0.001;
}

#[cfg(test)]
mod tests {
    use super::drift_starfield;
    use crate::components::Transform;

    #[test]
    fn drift_is_proportional_to_elapsed_time() {
        let mut transform = Transform::identity();
        drift_starfield(&mut transform, 2.0);
        drift_starfield(&mut transform, -1.0);
        assert!((transform.rotation.y + 0.01).abs() < 1e-12);
        assert!((transform.rotation.x - 0.002).abs() < 1e-12);
    }
}
