use crate::util::{HistMatchError, HistMatchResult};

/// Axis-aligned rectangle: top-left corner plus extent.
///
/// Coordinates are unsigned, so `x, y >= 0` holds by construction; `new`
/// additionally rejects empty extents. A box is only meaningful relative to an
/// image, and it may extend past that image's edges. Consumers clip with
/// [`BoundingBox::clip_to`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl BoundingBox {
    /// Creates a box, rejecting zero width or height.
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> HistMatchResult<Self> {
        if width == 0 || height == 0 {
            return Err(HistMatchError::InvalidBox { width, height });
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Exclusive right edge, saturating on overflow.
    pub fn right(&self) -> usize {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge, saturating on overflow.
    pub fn bottom(&self) -> usize {
        self.y.saturating_add(self.height)
    }

    /// Number of positions covered by the box.
    pub fn area(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    /// Returns true if `(x, y)` lies in `[x, right) x [y, bottom)`.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Returns true if the whole box lies inside a `width x height` image.
    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        self.right() <= width && self.bottom() <= height
    }

    /// Intersects the box with a `width x height` image.
    ///
    /// Returns `None` when nothing of the box remains inside the image.
    pub fn clip_to(&self, width: usize, height: usize) -> Option<BoundingBox> {
        if self.x >= width || self.y >= height || self.width == 0 || self.height == 0 {
            return None;
        }
        let right = self.right().min(width);
        let bottom = self.bottom().min(height);
        Some(BoundingBox {
            x: self.x,
            y: self.y,
            width: right - self.x,
            height: bottom - self.y,
        })
    }
}
