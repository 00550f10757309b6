//! Float bitmaps for distance field output.

use crate::error::MsdfError;
use crate::math::median;

/// Row-major `width × height` grid of `N`-channel `f32` pixels.
///
/// Row 0 is the first row in memory. Whether that is the top or the bottom
/// of the image depends on the shape's `inverse_y_axis` flag at generation.
#[derive(Clone, Debug, PartialEq)]
pub struct Bitmap<const N: usize> {
    width: u32,
    height: u32,
    pixels: Vec<[f32; N]>,
}

/// Three-channel (R, G, B) distance field.
pub type MsdfBitmap = Bitmap<3>;

/// Single-channel distance field.
pub type SdfBitmap = Bitmap<1>;

impl<const N: usize> Bitmap<N> {
    /// Allocate a bitmap filled with zeros.
    ///
    /// Zero-sized bitmaps are rejected up front so no generator ever
    /// schedules work over an empty grid.
    pub fn new(width: u32, height: u32) -> Result<Self, MsdfError> {
        if width == 0 || height == 0 {
            return Err(MsdfError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            pixels: vec![[0.0; N]; width as usize * height as usize],
        })
    }

    /// Wrap existing pixel data.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<[f32; N]>) -> Result<Self, MsdfError> {
        if width == 0 || height == 0 {
            return Err(MsdfError::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(MsdfError::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self { width, height, pixels })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y as usize * self.width as usize + x as usize
    }

    pub fn pixel(&self, x: u32, y: u32) -> [f32; N] {
        self.pixels[self.index(x, y)]
    }

    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [f32; N] {
        let i = self.index(x, y);
        &mut self.pixels[i]
    }

    pub fn row(&self, y: u32) -> &[[f32; N]] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.pixels[start..start + w]
    }

    pub fn pixels(&self) -> &[[f32; N]] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [[f32; N]] {
        &mut self.pixels
    }

    /// Flat channel data, `width × height × N` floats.
    pub fn as_flat(&self) -> impl Iterator<Item = f32> + '_ {
        self.pixels.iter().flatten().copied()
    }
}

fn to_unorm8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0) as u8
}

impl MsdfBitmap {
    /// Median of the three channels at a pixel: the reconstructed distance.
    pub fn median_at(&self, x: u32, y: u32) -> f32 {
        let [r, g, b] = self.pixel(x, y);
        median(r, g, b)
    }

    /// RGBA8 texel data for upload, channels clamped to `[0, 1]`, alpha opaque.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&[r, g, b]| [to_unorm8(r), to_unorm8(g), to_unorm8(b), 255])
            .collect()
    }
}

impl SdfBitmap {
    /// Single-byte texel data for upload, clamped to `[0, 1]`.
    pub fn to_gray8(&self) -> Vec<u8> {
        self.pixels.iter().map(|&[d]| to_unorm8(d)).collect()
    }
}
