//! Conversions to and from the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::staged::write_atomic;
use crate::image::{Pixel, RgbImage};
use crate::util::{HistMatchError, HistMatchResult};
use ::image::ImageFormat;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Creates an owned image from an 8-bit RGB buffer.
pub fn from_rgb8(img: &::image::RgbImage) -> HistMatchResult<RgbImage> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    let pixels = img
        .pixels()
        .map(|p| Pixel::new(p.0[0], p.0[1], p.0[2]))
        .collect();
    RgbImage::new(pixels, width, height)
}

/// Creates an owned image from any dynamic image, dropping alpha and
/// reducing to 8 bits per channel.
pub fn from_dynamic_image(img: &::image::DynamicImage) -> HistMatchResult<RgbImage> {
    from_rgb8(&img.to_rgb8())
}

/// Converts an owned image into an `image::RgbImage`.
pub fn to_rgb8(img: &RgbImage) -> HistMatchResult<::image::RgbImage> {
    let width = u32::try_from(img.width()).map_err(|_| HistMatchError::InvalidDimensions {
        width: img.width(),
        height: img.height(),
    })?;
    let height = u32::try_from(img.height()).map_err(|_| HistMatchError::InvalidDimensions {
        width: img.width(),
        height: img.height(),
    })?;
    let raw: Vec<u8> = img.pixels().iter().flat_map(|p| [p.r, p.g, p.b]).collect();
    ::image::RgbImage::from_raw(width, height, raw).ok_or(HistMatchError::PixelCountMismatch {
        expected: img.pixel_count(),
        got: img.pixels().len(),
    })
}

/// Loads any supported raster from disk as RGB.
pub fn load_rgb_image<P: AsRef<Path>>(path: P) -> HistMatchResult<RgbImage> {
    let path = path.as_ref();
    let img = ::image::open(path).map_err(|err| image_error(path, err))?;
    from_dynamic_image(&img)
}

/// Encodes an image in memory using `format`.
pub fn encode_rgb_image(img: &RgbImage, format: ImageFormat) -> HistMatchResult<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    to_rgb8(img)?
        .write_to(&mut buf, format)
        .map_err(|err| HistMatchError::ImageIo {
            path: PathBuf::new(),
            reason: err.to_string(),
        })?;
    Ok(buf.into_inner())
}

/// Encodes `img` in the format implied by the extension of `path`.
pub fn encode_for_path(path: &Path, img: &RgbImage) -> HistMatchResult<Vec<u8>> {
    let format = ImageFormat::from_path(path).map_err(|err| image_error(path, err))?;
    encode_rgb_image(img, format).map_err(|err| match err {
        HistMatchError::ImageIo { reason, .. } => HistMatchError::ImageIo {
            path: path.to_path_buf(),
            reason,
        },
        other => other,
    })
}

/// Saves an image; the format is inferred from the path extension.
///
/// The image is encoded fully before anything touches the disk, then staged
/// and renamed, so a failure leaves no file at `path`.
pub fn save_rgb_image<P: AsRef<Path>>(path: P, img: &RgbImage) -> HistMatchResult<()> {
    let path = path.as_ref();
    let bytes = encode_for_path(path, img)?;
    write_atomic(path, &bytes)
}

fn image_error(path: &Path, err: ::image::ImageError) -> HistMatchError {
    HistMatchError::ImageIo {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}
