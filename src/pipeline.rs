//! End-to-end localization: extract, match, render.
//!
//! Each query is independent of every other one; the template store is only
//! read. Batch runs may therefore execute queries in parallel and still return
//! results in input order.

use crate::bank::{TemplateScope, TemplateStore};
use crate::histogram::HistogramConfig;
use crate::image::{BoundingBox, RgbImage};
use crate::render::{OverlayRenderer, OverlayStyle};
use crate::search::{Match, MatchConfig, Matcher};
use crate::trace::trace_span;
use crate::util::HistMatchResult;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Result of localizing one query image.
#[derive(Clone, Debug)]
pub struct Localization {
    /// Selected template and its distance.
    pub matched: Match,
    /// Query image with the matched box painted; same size as the query.
    pub overlay: RgbImage,
}

/// Extract, match and render in one call.
pub struct Pipeline {
    matcher: Matcher,
    renderer: OverlayRenderer,
}

impl Pipeline {
    /// Creates a pipeline over `store` with default matching and overlay style.
    pub fn new(store: TemplateStore) -> Self {
        Self {
            matcher: Matcher::new(store),
            renderer: OverlayRenderer::default(),
        }
    }

    /// Replaces the matching configuration.
    pub fn with_match_config(mut self, cfg: MatchConfig) -> Self {
        self.matcher = self.matcher.with_config(cfg);
        self
    }

    /// Replaces the overlay style.
    pub fn with_style(mut self, style: OverlayStyle) -> Self {
        self.renderer = OverlayRenderer::new(style);
        self
    }

    /// Returns the underlying matcher.
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Localizes the best-matching template box in `query`.
    pub fn run(&self, query: &RgbImage) -> HistMatchResult<Localization> {
        let _span = trace_span!("pipeline_run", width = query.width(), height = query.height())
            .entered();
        let matched = self.matcher.match_image(query)?;
        let overlay = self.renderer.render(query, &matched.bbox);
        Ok(Localization { matched, overlay })
    }

    /// Runs every query; fails on the first error without returning partial results.
    pub fn run_batch(&self, queries: &[RgbImage]) -> HistMatchResult<Vec<Localization>> {
        let _span = trace_span!("pipeline_batch", queries = queries.len()).entered();
        #[cfg(feature = "rayon")]
        if self.matcher.config().parallel {
            return queries.par_iter().map(|query| self.run(query)).collect();
        }
        queries.iter().map(|query| self.run(query)).collect()
    }
}

/// Single-reference run: one labeled reference image, one query image.
///
/// Uses the default histogram config and a full-image reference signature.
pub fn locate(
    reference: &RgbImage,
    bbox: BoundingBox,
    query: &RgbImage,
) -> HistMatchResult<Localization> {
    let mut store = TemplateStore::new(HistogramConfig::default())?;
    store.add_reference(reference, bbox, TemplateScope::FullImage)?;
    Pipeline::new(store).run(query)
}
