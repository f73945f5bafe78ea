//! Nearest-template matching.
//!
//! The matcher scans the template store in order and returns the box of the
//! template whose signature is closest to the query. Ties keep the earlier
//! template, with or without the `rayon` feature.

use crate::bank::{Template, TemplateStore};
use crate::histogram::ColorHistogram;
use crate::image::{BoundingBox, RgbImage};
use crate::kernel::scalar::nearest_scalar;
use crate::kernel::{Distance, Euclidean};
use crate::trace::{trace_event, trace_span};
use crate::util::{HistMatchError, HistMatchResult};
use std::marker::PhantomData;

#[cfg(feature = "rayon")]
use crate::kernel::rayon::nearest_par;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Matching configuration.
#[derive(Clone, Debug, Default)]
pub struct MatchConfig {
    /// Spread template scans and batch queries over the rayon pool.
    ///
    /// Ignored unless the `rayon` feature is enabled.
    pub parallel: bool,
}

/// Selected template for one query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Match {
    /// Bounding box of the selected template.
    pub bbox: BoundingBox,
    /// Distance between the query and the selected template.
    pub distance: f64,
    /// Position of the selected template in the store.
    pub template_index: usize,
}

/// Nearest-neighbor matcher over a template store.
pub struct Matcher<D: Distance = Euclidean> {
    store: TemplateStore,
    cfg: MatchConfig,
    metric: PhantomData<fn() -> D>,
}

impl Matcher<Euclidean> {
    /// Creates a Euclidean matcher with default configuration.
    pub fn new(store: TemplateStore) -> Self {
        Self::with_metric(store)
    }
}

impl<D: Distance> Matcher<D> {
    /// Creates a matcher using distance `D`.
    pub fn with_metric(store: TemplateStore) -> Self {
        Self {
            store,
            cfg: MatchConfig::default(),
            metric: PhantomData,
        }
    }

    /// Replaces the matching configuration.
    pub fn with_config(mut self, cfg: MatchConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the template store.
    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    /// Returns the matching configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Selects the template closest to `query`.
    pub fn match_signature(&self, query: &ColorHistogram) -> HistMatchResult<Match> {
        let _span = trace_span!(
            "match_signature",
            templates = self.store.len(),
            metric = D::NAME
        )
        .entered();
        if self.store.is_empty() {
            return Err(HistMatchError::EmptyTemplateStore);
        }
        let expected = self.store.config().signature_len();
        if query.len() != expected {
            return Err(HistMatchError::SignatureMismatch {
                expected,
                got: query.len(),
            });
        }
        let found = self.scan(query, self.store.templates())?;
        trace_event!(
            "best_match",
            template_index = found.template_index,
            distance = found.distance
        );
        Ok(found)
    }

    /// Extracts the full-image signature of `img` and matches it.
    pub fn match_image(&self, img: &RgbImage) -> HistMatchResult<Match> {
        let query = self.store.extractor().extract(img);
        self.match_signature(&query)
    }

    /// Matches many queries; results keep the input order.
    ///
    /// Queries are independent, so with `parallel` set they run concurrently.
    pub fn match_batch(&self, queries: &[ColorHistogram]) -> HistMatchResult<Vec<Match>> {
        #[cfg(feature = "rayon")]
        if self.cfg.parallel {
            return queries
                .par_iter()
                .map(|query| self.match_signature(query))
                .collect();
        }
        queries
            .iter()
            .map(|query| self.match_signature(query))
            .collect()
    }

    fn scan(&self, query: &ColorHistogram, templates: &[Template]) -> HistMatchResult<Match> {
        #[cfg(feature = "rayon")]
        if self.cfg.parallel {
            return nearest_par::<D>(query, templates);
        }
        nearest_scalar::<D>(query, templates)
    }
}

/// Returns the box of the template nearest to `query` by Euclidean distance.
///
/// Templates are scanned in order; on equal distances the earlier template
/// wins. An empty slice is a configuration error.
pub fn find_best_match(
    query: &ColorHistogram,
    templates: &[Template],
) -> HistMatchResult<BoundingBox> {
    nearest_scalar::<Euclidean>(query, templates).map(|found| found.bbox)
}
