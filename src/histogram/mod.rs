//! Joint RGB color histograms.
//!
//! Each channel is quantized into `B` equal-width bins of width `256 / B`.
//! A pixel contributes one count to the joint bin
//! `r_bin * B^2 + g_bin * B + b_bin`, so a signature has `B^3` entries whose
//! sum equals the number of pixels visited. Histograms discard position.

use crate::image::{BoundingBox, Pixel, RgbImage};
use crate::trace::trace_span;
use crate::util::{HistMatchError, HistMatchResult};

/// Number of distinct values per channel.
const CHANNEL_LEVELS: usize = 256;

/// Largest accepted bins-per-channel value.
///
/// Signatures hold `B^3` `u64` counts: 64 bins per channel is 262,144 bins
/// (2 MiB per signature), while 256 would be over 16 million (128 MiB).
pub const MAX_BINS_PER_CHANNEL: usize = 64;

/// Histogram quantization settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistogramConfig {
    /// Bins per channel; must divide 256 and be at most [`MAX_BINS_PER_CHANNEL`].
    pub bins_per_channel: usize,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            bins_per_channel: 8,
        }
    }
}

impl HistogramConfig {
    /// Creates a validated config.
    pub fn new(bins_per_channel: usize) -> HistMatchResult<Self> {
        let cfg = Self { bins_per_channel };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks that every channel value maps to a bin in `[0, B)`.
    pub fn validate(&self) -> HistMatchResult<()> {
        let bins = self.bins_per_channel;
        if bins == 0 || bins > MAX_BINS_PER_CHANNEL || CHANNEL_LEVELS % bins != 0 {
            return Err(HistMatchError::InvalidBinCount { bins });
        }
        Ok(())
    }

    /// Width of one channel bin.
    pub fn bin_width(&self) -> usize {
        CHANNEL_LEVELS / self.bins_per_channel
    }

    /// Signature length, `B^3`.
    pub fn signature_len(&self) -> usize {
        self.bins_per_channel.pow(3)
    }

    /// Joint bin index for a pixel.
    ///
    /// Panics if the config has not been validated and `bins_per_channel` is zero.
    pub fn bin_index(&self, pixel: Pixel) -> usize {
        let width = self.bin_width();
        let bins = self.bins_per_channel;
        let r = pixel.r as usize / width;
        let g = pixel.g as usize / width;
        let b = pixel.b as usize / width;
        r * bins * bins + g * bins + b
    }
}

/// Fixed-length color-distribution signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorHistogram {
    bins_per_channel: usize,
    counts: Vec<u64>,
}

impl ColorHistogram {
    /// Creates an all-zero histogram for `cfg`.
    pub fn zeros(cfg: &HistogramConfig) -> Self {
        Self {
            bins_per_channel: cfg.bins_per_channel,
            counts: vec![0; cfg.signature_len()],
        }
    }

    /// Wraps precomputed counts; the length must be a perfect cube of a valid bin count.
    pub fn from_counts(bins_per_channel: usize, counts: Vec<u64>) -> HistMatchResult<Self> {
        let cfg = HistogramConfig::new(bins_per_channel)?;
        if counts.len() != cfg.signature_len() {
            return Err(HistMatchError::SignatureMismatch {
                expected: cfg.signature_len(),
                got: counts.len(),
            });
        }
        Ok(Self {
            bins_per_channel,
            counts,
        })
    }

    /// Bins per channel this signature was built with.
    pub fn bins_per_channel(&self) -> usize {
        self.bins_per_channel
    }

    /// Number of entries, `B^3`.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True only for a histogram with no bins.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Bin counts in joint-index order.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Sum of all bins, i.e. the number of pixels that were counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    fn accumulate<'a, I>(&mut self, cfg: &HistogramConfig, pixels: I)
    where
        I: IntoIterator<Item = &'a Pixel>,
    {
        for &pixel in pixels {
            let idx = cfg.bin_index(pixel);
            debug_assert!(idx < self.counts.len());
            self.counts[idx] += 1;
        }
    }
}

/// Reduces images to color histograms under a fixed config.
#[derive(Clone, Copy, Debug)]
pub struct HistogramExtractor {
    cfg: HistogramConfig,
}

impl HistogramExtractor {
    /// Creates an extractor after validating `cfg`.
    pub fn new(cfg: HistogramConfig) -> HistMatchResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    /// Returns the quantization config.
    pub fn config(&self) -> &HistogramConfig {
        &self.cfg
    }

    /// Histogram over every pixel of `img`.
    pub fn extract(&self, img: &RgbImage) -> ColorHistogram {
        let _span = trace_span!(
            "extract_histogram",
            width = img.width(),
            height = img.height()
        )
        .entered();
        let mut hist = ColorHistogram::zeros(&self.cfg);
        hist.accumulate(&self.cfg, img.pixels());
        hist
    }

    /// Histogram over the part of `bbox` that lies inside `img`.
    ///
    /// A box entirely outside the image yields an all-zero histogram.
    pub fn extract_region(&self, img: &RgbImage, bbox: &BoundingBox) -> ColorHistogram {
        let _span = trace_span!("extract_histogram", region = true).entered();
        let mut hist = ColorHistogram::zeros(&self.cfg);
        if let Some(clipped) = bbox.clip_to(img.width(), img.height()) {
            for y in clipped.y..clipped.bottom() {
                if let Some(row) = img.row(y) {
                    hist.accumulate(&self.cfg, &row[clipped.x..clipped.right()]);
                }
            }
        }
        hist
    }
}

/// Computes the full-image histogram of `img` for `cfg`.
pub fn compute_histogram(
    img: &RgbImage,
    cfg: &HistogramConfig,
) -> HistMatchResult<ColorHistogram> {
    Ok(HistogramExtractor::new(*cfg)?.extract(img))
}

#[cfg(test)]
mod tests {
    use super::{HistogramConfig, HistogramExtractor, MAX_BINS_PER_CHANNEL};
    use crate::image::{BoundingBox, Pixel, RgbImage};
    use crate::util::HistMatchError;

    #[test]
    fn default_config_has_512_bins_of_width_32() {
        let cfg = HistogramConfig::default();
        assert_eq!(cfg.signature_len(), 512);
        assert_eq!(cfg.bin_width(), 32);
    }

    #[test]
    fn channel_255_maps_to_top_bin() {
        let cfg = HistogramConfig::default();
        assert_eq!(cfg.bin_index(Pixel::WHITE), 511);
        assert_eq!(cfg.bin_index(Pixel::new(0, 0, 255)), 7);
        assert_eq!(cfg.bin_index(Pixel::new(31, 32, 0)), 8);
        assert_eq!(cfg.bin_index(Pixel::new(32, 0, 0)), 64);
    }

    #[test]
    fn rejects_bin_counts_that_do_not_divide_256() {
        for bins in [0usize, 3, 12, 257] {
            assert_eq!(
                HistogramConfig::new(bins).unwrap_err(),
                HistMatchError::InvalidBinCount { bins }
            );
        }
        for bins in [1usize, 2, 4, 16, 64] {
            assert!(HistogramConfig::new(bins).is_ok());
        }
    }

    #[test]
    fn rejects_bin_counts_above_the_memory_cap() {
        for bins in [128usize, 256] {
            assert_eq!(
                HistogramConfig::new(bins).unwrap_err(),
                HistMatchError::InvalidBinCount { bins }
            );
        }
        let top = HistogramConfig::new(MAX_BINS_PER_CHANNEL).unwrap();
        assert_eq!(top.signature_len(), 262_144);
        assert_eq!(top.bin_width(), 4);
    }

    #[test]
    fn region_counts_only_clipped_pixels() {
        let img = RgbImage::from_fn(4, 4, |x, _| {
            if x < 2 {
                Pixel::RED
            } else {
                Pixel::BLUE
            }
        })
        .unwrap();
        let extractor = HistogramExtractor::new(HistogramConfig::default()).unwrap();
        let cfg = extractor.config();

        let left = extractor.extract_region(&img, &BoundingBox::new(0, 0, 2, 4).unwrap());
        assert_eq!(left.total(), 8);
        assert_eq!(left.counts()[cfg.bin_index(Pixel::RED)], 8);

        let spill = extractor.extract_region(&img, &BoundingBox::new(3, 3, 5, 5).unwrap());
        assert_eq!(spill.total(), 1);
        assert_eq!(spill.counts()[cfg.bin_index(Pixel::BLUE)], 1);

        let outside = extractor.extract_region(&img, &BoundingBox::new(9, 9, 1, 1).unwrap());
        assert_eq!(outside.total(), 0);
    }
}
