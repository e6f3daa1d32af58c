use image::RgbaImage;
use image::imageops::{self, FilterType};

/// Decoded equirectangular raster, RGBA8, row-major from the north edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EquirectTexture {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TextureError {
    Decode(String),
    Empty,
    SizeMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for TextureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextureError::Decode(e) => write!(f, "texture decode failed: {e}"),
            TextureError::Empty => write!(f, "texture has no pixels"),
            TextureError::SizeMismatch { expected, actual } => {
                write!(f, "expected {expected} bytes of RGBA data, got {actual}")
            }
        }
    }
}

impl std::error::Error for TextureError {}

impl EquirectTexture {
    /// Decodes a PNG or JPEG payload.
    pub fn decode(bytes: &[u8]) -> Result<Self, TextureError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| TextureError::Decode(e.to_string()))?;
        Self::from_image(image.to_rgba8())
    }

    pub fn from_image(image: RgbaImage) -> Result<Self, TextureError> {
        let (width, height) = image.dimensions();
        Self::from_rgba8(width, height, image.into_raw())
    }

    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty);
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(TextureError::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Single-color texture.
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: rgba.to_vec(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba8(&self) -> &[u8] {
        &self.pixels
    }

    /// Copy whose longer side is at most `max_dim`, aspect ratio kept.
    pub fn fit_within(&self, max_dim: u32) -> Self {
        let max_dim = max_dim.max(1);
        if self.width <= max_dim && self.height <= max_dim {
            return self.clone();
        }
        let scale = max_dim as f64 / self.width.max(self.height) as f64;
        let width = ((self.width as f64 * scale).round() as u32).clamp(1, max_dim);
        let height = ((self.height as f64 * scale).round() as u32).clamp(1, max_dim);
        let Some(source) = RgbaImage::from_raw(self.width, self.height, self.pixels.clone()) else {
            return self.clone();
        };
        let resized = imageops::resize(&source, width, height, FilterType::Triangle);
        Self {
            width,
            height,
            pixels: resized.into_raw(),
        }
    }

    /// Nearest-texel lookup. `u` wraps around the antimeridian, `v` is
    /// clamped at the poles.
    pub fn sample_nearest(&self, u: f64, v: f64) -> [u8; 4] {
        let u = if u.is_finite() { u.rem_euclid(1.0) } else { 0.0 };
        let v = if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        let x = ((u * self.width as f64) as u32).min(self.width - 1);
        let y = ((v * self.height as f64) as u32).min(self.height - 1);
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Red channel in `[0, 1]`, for single-channel masks.
    pub fn sample_scalar(&self, u: f64, v: f64) -> f64 {
        self.sample_nearest(u, v)[0] as f64 / 255.0
    }
}
