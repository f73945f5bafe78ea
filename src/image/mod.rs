//! RGB image buffers and bounding boxes.
//!
//! `RgbImage` owns a row-major pixel sequence: row 0 first, left to right
//! within a row. The stride is always the image width, so the pixel at
//! `(x, y)` lives at `y * width + x`.

use crate::util::{HistMatchError, HistMatchResult};

mod bbox;
#[cfg(feature = "image-io")]
pub mod io;
pub mod ppm;
pub mod staged;

pub use bbox::BoundingBox;

/// Largest value a channel may take.
pub const MAX_CHANNEL_VALUE: u8 = 255;

/// One RGB pixel with 8-bit channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Pixel {
    /// Pure red, the default overlay color.
    pub const RED: Pixel = Pixel::new(255, 0, 0);
    /// Pure green.
    pub const GREEN: Pixel = Pixel::new(0, 255, 0);
    /// Pure blue.
    pub const BLUE: Pixel = Pixel::new(0, 0, 255);
    /// Black.
    pub const BLACK: Pixel = Pixel::new(0, 0, 0);
    /// White.
    pub const WHITE: Pixel = Pixel::new(255, 255, 255);

    /// Creates a pixel from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Owned RGB image with contiguous row-major storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbImage {
    pixels: Vec<Pixel>,
    width: usize,
    height: usize,
}

impl RgbImage {
    /// Wraps a pixel vector, checking that it holds exactly `width * height` pixels.
    pub fn new(pixels: Vec<Pixel>, width: usize, height: usize) -> HistMatchResult<Self> {
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(HistMatchError::PixelCountMismatch {
                expected,
                got: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Creates an image with every pixel set to `fill`.
    pub fn filled(width: usize, height: usize, fill: Pixel) -> HistMatchResult<Self> {
        let count = pixel_count(width, height)?;
        Ok(Self {
            pixels: vec![fill; count],
            width,
            height,
        })
    }

    /// Builds an image by evaluating `f(x, y)` for every position.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> HistMatchResult<Self>
    where
        F: FnMut(usize, usize) -> Pixel,
    {
        let count = pixel_count(width, height)?;
        let mut pixels = Vec::with_capacity(count);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `width * height`.
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Returns the row-major pixel slice.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// Consumes the image and returns its pixels.
    pub fn into_pixels(self) -> Vec<Pixel> {
        self.pixels
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<Pixel> {
        self.index_of(x, y).map(|idx| self.pixels[idx])
    }

    /// Overwrites the pixel at `(x, y)`. Returns `false` when out of bounds.
    pub fn set(&mut self, x: usize, y: usize, pixel: Pixel) -> bool {
        match self.index_of(x, y) {
            Some(idx) => {
                self.pixels[idx] = pixel;
                true
            }
            None => false,
        }
    }

    /// Returns the pixels of row `y`.
    pub fn row(&self, y: usize) -> Option<&[Pixel]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.pixels.get(start..start + self.width)
    }

    pub(crate) fn row_mut(&mut self, y: usize) -> Option<&mut [Pixel]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.pixels.get_mut(start..start + self.width)
    }

    /// Returns the full-image bounding box `(0, 0, width, height)`.
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox {
            x: 0,
            y: 0,
            width: self.width,
            height: self.height,
        }
    }

    fn index_of(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }
}

fn pixel_count(width: usize, height: usize) -> HistMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(HistMatchError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(HistMatchError::InvalidDimensions { width, height })
}
