//! Overlay rendering of a matched bounding box.
//!
//! Every pixel `(x, y)` with `box.x <= x < box.x + box.width` and
//! `box.y <= y < box.y + box.height` is painted with the overlay color.
//! Rows are addressed with the image width as stride, and the part of the box
//! that falls outside the image is skipped. The output keeps the input image's
//! dimensions.

use crate::image::{BoundingBox, Pixel, RgbImage};
use crate::trace::{trace_event, trace_span};

/// Overlay appearance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlayStyle {
    /// Fill color for the box region.
    pub color: Pixel,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self { color: Pixel::RED }
    }
}

/// Paints bounding boxes onto images.
#[derive(Clone, Copy, Debug, Default)]
pub struct OverlayRenderer {
    style: OverlayStyle,
}

impl OverlayRenderer {
    /// Creates a renderer with `style`.
    pub fn new(style: OverlayStyle) -> Self {
        Self { style }
    }

    /// Returns the overlay style.
    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    /// Returns a copy of `img` with `bbox` painted.
    pub fn render(&self, img: &RgbImage, bbox: &BoundingBox) -> RgbImage {
        let mut out = img.clone();
        self.render_in_place(&mut out, bbox);
        out
    }

    /// Paints `bbox` into `img` and returns the number of pixels written.
    pub fn render_in_place(&self, img: &mut RgbImage, bbox: &BoundingBox) -> usize {
        let _span = trace_span!(
            "render_overlay",
            x = bbox.x,
            y = bbox.y,
            width = bbox.width,
            height = bbox.height
        )
        .entered();

        let Some(clipped) = bbox.clip_to(img.width(), img.height()) else {
            trace_event!("overlay_clipped", requested = bbox.area(), painted = 0usize);
            return 0;
        };
        for y in clipped.y..clipped.bottom() {
            if let Some(row) = img.row_mut(y) {
                row[clipped.x..clipped.right()].fill(self.style.color);
            }
        }

        let painted = clipped.area();
        if painted != bbox.area() {
            trace_event!("overlay_clipped", requested = bbox.area(), painted = painted);
        }
        painted
    }
}

/// Returns a copy of `img` with `bbox` filled in pure red.
pub fn render_overlay(img: &RgbImage, bbox: &BoundingBox) -> RgbImage {
    OverlayRenderer::default().render(img, bbox)
}
