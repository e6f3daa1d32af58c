use foundation::color::Rgb;
use scene::components::Material;
use scene::prefabs::EARTH_RADIUS;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LayerStyle {
    pub visible: bool,
    pub color: Rgb,
    pub opacity: f64,
    /// Height above the globe surface, in scene units.
    pub lift: f64,
}

impl LayerStyle {
    pub const fn new(visible: bool, color: Rgb, opacity: f64, lift: f64) -> Self {
        Self {
            visible,
            color,
            opacity,
            lift,
        }
    }

    /// Sphere radius the layer's vertices are projected onto.
    pub fn radius(&self) -> f64 {
        EARTH_RADIUS + self.lift
    }

    pub fn line_material(&self) -> Material {
        let material = Material::basic(self.color);
        if self.opacity < 1.0 {
            material.transparent(self.opacity)
        } else {
            material
        }
    }
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self::new(true, Rgb::WHITE, 1.0, 0.0)
    }
}

/// Sky-blue country borders (#38bdf8), lifted clear of the surface.
pub const BORDER_STYLE: LayerStyle = LayerStyle::new(
    true,
    Rgb::new(56.0 / 255.0, 189.0 / 255.0, 248.0 / 255.0),
    0.6,
    0.005,
);

/// Faint white lat/lon grid just above the surface.
pub const GRATICULE_STYLE: LayerStyle = LayerStyle::new(true, Rgb::WHITE, 0.08, 0.002);
