//! Rayon-parallel nearest-template scan (feature-gated).
//!
//! Distances are computed in parallel; selection runs sequentially over the
//! collected values, so ties resolve to the earliest template exactly as in
//! the scalar scan.

use crate::bank::Template;
use crate::histogram::ColorHistogram;
use crate::kernel::Distance;
use crate::search::Match;
use crate::util::{HistMatchError, HistMatchResult};
use rayon::prelude::*;

/// Parallel counterpart of [`crate::kernel::scalar::nearest_scalar`].
pub fn nearest_par<D: Distance>(
    query: &ColorHistogram,
    templates: &[Template],
) -> HistMatchResult<Match> {
    let distances: Vec<f64> = templates
        .par_iter()
        .map(|template| D::distance(query, template.signature()))
        .collect::<HistMatchResult<Vec<f64>>>()?;

    let mut best: Option<(usize, f64)> = None;
    for (index, distance) in distances.into_iter().enumerate() {
        match best {
            Some((_, current)) if distance >= current => {}
            _ => best = Some((index, distance)),
        }
    }

    let (template_index, distance) = best.ok_or(HistMatchError::EmptyTemplateStore)?;
    Ok(Match {
        bbox: *templates[template_index].bbox(),
        distance,
        template_index,
    })
}
