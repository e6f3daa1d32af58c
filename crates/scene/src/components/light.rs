use foundation::color::Rgb;

/// Light sources. Positions come from the owning node's transform.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Light {
    Ambient {
        color: Rgb,
        intensity: f64,
    },
    /// Shines from the node position towards the origin.
    Directional {
        color: Rgb,
        intensity: f64,
    },
    Point {
        color: Rgb,
        intensity: f64,
        /// Cutoff range; 0 means unlimited.
        distance: f64,
        decay: f64,
    },
}

impl Light {
    pub fn intensity(&self) -> f64 {
        match self {
            Light::Ambient { intensity, .. }
            | Light::Directional { intensity, .. }
            | Light::Point { intensity, .. } => *intensity,
        }
    }
}
