use foundation::color::Rgb;

/// Which shading program a surface is bound to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Shading {
    /// Procedural land/sea/night-lights/rim shading of the globe body.
    Surface,
    /// Kp-driven aurora band.
    AuroraOval,
    /// Lit by the scene lights (atmosphere shell).
    Phong,
    /// Flat color, unlit.
    Basic,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Blend {
    Opaque,
    Alpha,
    /// Colors are summed onto the target.
    Additive,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Side {
    Front,
    Back,
    Double,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    pub shading: Shading,
    pub color: Rgb,
    pub opacity: f64,
    pub blend: Blend,
    pub side: Side,
    pub depth_write: bool,
}

impl Material {
    pub fn basic(color: Rgb) -> Self {
        Self {
            shading: Shading::Basic,
            color,
            opacity: 1.0,
            blend: Blend::Opaque,
            side: Side::Front,
            depth_write: true,
        }
    }

    pub fn surface() -> Self {
        Self {
            shading: Shading::Surface,
            ..Self::basic(Rgb::WHITE)
        }
    }

    pub fn phong(color: Rgb) -> Self {
        Self {
            shading: Shading::Phong,
            ..Self::basic(color)
        }
    }

    pub fn aurora_oval(color: Rgb) -> Self {
        Self {
            shading: Shading::AuroraOval,
            ..Self::basic(color)
        }
        .additive()
        .side(Side::Double)
    }

    /// Alpha-blended at the given opacity.
    pub fn transparent(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        if self.blend == Blend::Opaque {
            self.blend = Blend::Alpha;
        }
        self
    }

    /// Additive blending without depth writes.
    pub fn additive(mut self) -> Self {
        self.blend = Blend::Additive;
        self.depth_write = false;
        self
    }

    pub fn side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn is_blended(&self) -> bool {
        self.blend != Blend::Opaque
    }
}

#[cfg(test)]
mod tests {
    use super::{Blend, Material, Shading, Side};
    use foundation::color::Rgb;

    #[test]
    fn oval_material_is_additive_without_depth_writes() {
        let m = Material::aurora_oval(Rgb::new(0.1, 1.0, 0.3));
        assert_eq!(m.shading, Shading::AuroraOval);
        assert_eq!(m.blend, Blend::Additive);
        assert_eq!(m.side, Side::Double);
        assert!(!m.depth_write);
    }

    #[test]
    fn transparent_keeps_additive_blend() {
        let m = Material::phong(Rgb::WHITE).additive().transparent(0.15);
        assert_eq!(m.blend, Blend::Additive);
        assert_eq!(m.opacity, 0.15);
        assert!(m.is_blended());
        assert!(!Material::surface().is_blended());
    }
}
