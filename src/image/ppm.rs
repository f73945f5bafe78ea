//! Plain-text `P3` raster codec.
//!
//! Layout: the tag `P3`, width, height, maximum channel value (must be 255),
//! then `width * height` whitespace-separated `r g b` triples in row-major
//! order. A `#` starts a comment that runs to the end of the line; comments
//! may appear anywhere whitespace may.
//!
//! Decoding is all-or-nothing: any structural problem yields an error and no
//! partial image.

use crate::image::staged::write_atomic;
use crate::image::{Pixel, RgbImage, MAX_CHANNEL_VALUE};
use crate::trace::trace_event;
use crate::util::{HistMatchError, HistMatchResult};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const MAGIC: &str = "P3";

/// Whitespace/comment-aware token reader over the raw text.
struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self { rest: text }
    }

    fn skip_separators(&mut self) {
        loop {
            let trimmed = self.rest.trim_start();
            if let Some(comment) = trimmed.strip_prefix('#') {
                self.rest = match comment.find('\n') {
                    Some(end) => &comment[end + 1..],
                    None => "",
                };
            } else {
                self.rest = trimmed;
                return;
            }
        }
    }

    fn next_token(&mut self) -> Option<&'a str> {
        self.skip_separators();
        if self.rest.is_empty() {
            return None;
        }
        let end = self
            .rest
            .find(|c: char| c.is_whitespace() || c == '#')
            .unwrap_or(self.rest.len());
        let (token, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(token)
    }

    fn next_uint(&mut self, context: &'static str) -> HistMatchResult<u64> {
        let token = self
            .next_token()
            .ok_or(HistMatchError::UnexpectedEof { context })?;
        token
            .parse::<u64>()
            .map_err(|_| HistMatchError::MalformedToken {
                context,
                token: token.to_owned(),
            })
    }

    fn next_dimension(&mut self, context: &'static str) -> HistMatchResult<usize> {
        let value = self.next_uint(context)?;
        usize::try_from(value).map_err(|_| HistMatchError::MalformedToken {
            context,
            token: value.to_string(),
        })
    }
}

/// Decodes a `P3` document into an image.
pub fn decode_p3(text: &str) -> HistMatchResult<RgbImage> {
    let mut tokens = Tokens::new(text);

    let magic = tokens.next_token().ok_or(HistMatchError::UnexpectedEof {
        context: "magic number",
    })?;
    if magic != MAGIC {
        return Err(HistMatchError::InvalidMagic {
            found: magic.to_owned(),
        });
    }

    let width = tokens.next_dimension("width")?;
    let height = tokens.next_dimension("height")?;
    let max_value = tokens.next_uint("max channel value")?;
    if max_value != u64::from(MAX_CHANNEL_VALUE) {
        return Err(HistMatchError::InvalidMaxValue {
            expected: u32::from(MAX_CHANNEL_VALUE),
            found: max_value,
        });
    }

    if width == 0 || height == 0 {
        return Err(HistMatchError::InvalidDimensions { width, height });
    }
    let expected = width
        .checked_mul(height)
        .ok_or(HistMatchError::InvalidDimensions { width, height })?;

    // Each pixel needs at least six bytes of text; don't trust the header for capacity.
    let mut pixels = Vec::with_capacity(expected.min(text.len() / 6 + 1));
    for got in 0..expected {
        let mut channels = [0u8; 3];
        for channel in channels.iter_mut() {
            let token = tokens
                .next_token()
                .ok_or(HistMatchError::PixelCountMismatch { expected, got })?;
            *channel = parse_channel(token)?;
        }
        pixels.push(Pixel::new(channels[0], channels[1], channels[2]));
    }

    let mut trailing = 0usize;
    while tokens.next_token().is_some() {
        trailing += 1;
    }
    if trailing > 0 {
        return Err(HistMatchError::PixelCountMismatch {
            expected,
            got: expected + trailing.div_ceil(3),
        });
    }

    trace_event!("ppm_decoded", width = width, height = height);
    RgbImage::new(pixels, width, height)
}

fn parse_channel(token: &str) -> HistMatchResult<u8> {
    let value = token
        .parse::<u64>()
        .map_err(|_| HistMatchError::MalformedToken {
            context: "channel value",
            token: token.to_owned(),
        })?;
    u8::try_from(value).map_err(|_| HistMatchError::ChannelOutOfRange {
        value,
        max: u32::from(MAX_CHANNEL_VALUE),
    })
}

/// Encodes an image as a `P3` document, one pixel triple per line.
///
/// The header carries the image's own dimensions.
pub fn encode_p3(img: &RgbImage) -> String {
    let mut out = String::with_capacity(16 + img.pixel_count() * 12);
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{MAGIC}");
    let _ = writeln!(out, "{} {}", img.width(), img.height());
    let _ = writeln!(out, "{MAX_CHANNEL_VALUE}");
    for p in img.pixels() {
        let _ = writeln!(out, "{} {} {}", p.r, p.g, p.b);
    }
    out
}

/// Reads and decodes a `P3` file.
pub fn load_ppm<P: AsRef<Path>>(path: P) -> HistMatchResult<RgbImage> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|err| HistMatchError::io(path, err))?;
    decode_p3(&text)
}

/// Encodes `img` and writes it to `path`.
///
/// The document is staged next to `path` and renamed into place, so `path`
/// never holds a partially written image.
pub fn save_ppm<P: AsRef<Path>>(path: P, img: &RgbImage) -> HistMatchResult<()> {
    write_atomic(path.as_ref(), encode_p3(img).as_bytes())
}
