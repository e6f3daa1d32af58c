#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Geometry {
    /// UV sphere centered on the node origin.
    Sphere {
        radius: f64,
        width_segments: u32,
        height_segments: u32,
    },
}

impl Geometry {
    pub fn sphere(radius: f64, segments: u32) -> Self {
        Self::Sphere {
            radius,
            width_segments: segments.max(3),
            height_segments: segments.max(2),
        }
    }

    pub fn radius(&self) -> f64 {
        match self {
            Geometry::Sphere { radius, .. } => *radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Geometry;

    #[test]
    fn sphere_keeps_minimum_tessellation() {
        let g = Geometry::sphere(1.5, 1);
        assert!(matches!(
            g,
            Geometry::Sphere {
                width_segments: 3,
                height_segments: 2,
                ..
            }
        ));
        assert_eq!(g.radius(), 1.5);
    }
}
