//! Error types for histmatch.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result alias for histmatch operations.
pub type HistMatchResult<T> = std::result::Result<T, HistMatchError>;

/// Errors that can occur while decoding, extracting, matching, or rendering.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HistMatchError {
    /// Image dimensions are zero or overflow.
    #[error("invalid dimensions: width={width}, height={height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Pixel buffer length disagrees with the declared dimensions.
    #[error("pixel count mismatch: expected {expected}, got {got}")]
    PixelCountMismatch { expected: usize, got: usize },
    /// Bounding box with an empty extent.
    #[error("invalid bounding box: width={width}, height={height} (both must be >= 1)")]
    InvalidBox { width: usize, height: usize },
    /// Raster header does not start with the expected tag.
    #[error("invalid magic number: expected \"P3\", found {found:?}")]
    InvalidMagic { found: String },
    /// Raster header declares an unsupported maximum channel value.
    #[error("invalid max channel value: expected {expected}, found {found}")]
    InvalidMaxValue { expected: u32, found: u64 },
    /// A token could not be parsed as a non-negative integer.
    #[error("malformed {context}: {token:?}")]
    MalformedToken { context: &'static str, token: String },
    /// Input ended before a required token was read.
    #[error("unexpected end of input while reading {context}")]
    UnexpectedEof { context: &'static str },
    /// A pixel channel exceeds the declared maximum.
    #[error("channel value {value} exceeds maximum {max}")]
    ChannelOutOfRange { value: u64, max: u32 },
    /// Per-channel bin count cannot partition the channel range evenly.
    #[error("invalid bin count {bins}: must be in 1..=64 and divide 256")]
    InvalidBinCount { bins: usize },
    /// Matching was attempted against a store without templates.
    #[error("template store is empty")]
    EmptyTemplateStore,
    /// Two signatures were built with different bin counts.
    #[error("signature length mismatch: expected {expected}, got {got}")]
    SignatureMismatch { expected: usize, got: usize },
    /// Filesystem failure on a specific file.
    #[error("io error on {}: {reason}", .path.display())]
    Io { path: PathBuf, reason: String },
    /// Decode/encode failure reported by the `image` crate (`image-io` feature).
    #[error("image io error on {}: {reason}", .path.display())]
    ImageIo { path: PathBuf, reason: String },
}

impl HistMatchError {
    /// Wraps an I/O error together with the file it concerns.
    pub fn io(path: &Path, err: std::io::Error) -> Self {
        HistMatchError::Io {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
    }
}
