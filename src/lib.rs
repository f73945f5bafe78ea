//! HistMatch localizes an object in a query image by color-histogram
//! similarity to labeled reference images.
//!
//! Reference images and their object boxes become templates; a query image is
//! reduced to the same joint RGB histogram, the nearest template by Euclidean
//! distance is selected, and its box is painted onto the query. Histograms
//! carry no spatial information, so the reported box is the reference box,
//! not a searched position. Optional parallelism is available via the `rayon`
//! feature.

pub mod bank;
pub mod histogram;
pub mod image;
pub mod kernel;
pub mod lowlevel;
pub mod pipeline;
pub mod render;
pub mod search;
mod trace;
pub mod util;

pub use crate::bank::{Template, TemplateScope, TemplateStore};
pub use crate::histogram::{
    compute_histogram, ColorHistogram, HistogramConfig, HistogramExtractor, MAX_BINS_PER_CHANNEL,
};
pub use crate::image::ppm::{decode_p3, encode_p3, load_ppm, save_ppm};
pub use crate::image::staged::{write_atomic, StagedFile};
pub use crate::image::{BoundingBox, Pixel, RgbImage, MAX_CHANNEL_VALUE};
pub use crate::kernel::{histogram_distance, Distance, Euclidean};
pub use crate::pipeline::{locate, Localization, Pipeline};
pub use crate::render::{render_overlay, OverlayRenderer, OverlayStyle};
pub use crate::search::{find_best_match, Match, MatchConfig, Matcher};
pub use crate::util::{HistMatchError, HistMatchResult};

#[cfg(feature = "image-io")]
pub use crate::image::io;
