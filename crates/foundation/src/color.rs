/// Linear RGB color with unbounded channels.
///
/// Shading math adds light contributions freely; clamping is left to the
/// output stage.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub const fn splat(v: f64) -> Self {
        Self::new(v, v, v)
    }

    /// Parses `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let s = hex.trim().trim_start_matches('#');
        if s.len() != 6 || !s.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
        Some(Self::from_u8([channel(0)?, channel(2)?, channel(4)?]))
    }

    pub fn from_u8(rgb: [u8; 3]) -> Self {
        Self::new(
            rgb[0] as f64 / 255.0,
            rgb[1] as f64 / 255.0,
            rgb[2] as f64 / 255.0,
        )
    }

    /// Linear interpolation: `t = 0` yields `self`, `t = 1` yields `other`.
    pub fn mix(self, other: Self, t: f64) -> Self {
        self * (1.0 - t) + other * t
    }

    /// Rec. 601 luma.
    pub fn luminance(self) -> f64 {
        self.r * 0.299 + self.g * 0.587 + self.b * 0.114
    }

    pub fn to_f32(self) -> [f32; 3] {
        [self.r as f32, self.g as f32, self.b as f32]
    }

    pub fn with_alpha(self, a: f64) -> [f32; 4] {
        [self.r as f32, self.g as f32, self.b as f32, a as f32]
    }
}

impl std::ops::Add for Rgb {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.r + other.r, self.g + other.g, self.b + other.b)
    }
}

impl std::ops::Sub for Rgb {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.r - other.r, self.g - other.g, self.b - other.b)
    }
}

impl std::ops::Mul<f64> for Rgb {
    type Output = Self;

    fn mul(self, s: f64) -> Self::Output {
        Self::new(self.r * s, self.g * s, self.b * s)
    }
}
