//! Sequential nearest-template scan.

use crate::bank::Template;
use crate::histogram::ColorHistogram;
use crate::kernel::Distance;
use crate::search::Match;
use crate::trace::trace_debug;
use crate::util::{HistMatchError, HistMatchResult};

/// Linear scan keeping the first template with the strictly smallest distance.
///
/// The running minimum starts at `+inf` so the first template is always taken;
/// later templates replace it only when strictly closer.
pub fn nearest_scalar<D: Distance>(
    query: &ColorHistogram,
    templates: &[Template],
) -> HistMatchResult<Match> {
    let mut best: Option<Match> = None;
    let mut best_distance = f64::INFINITY;
    for (index, template) in templates.iter().enumerate() {
        let distance = D::distance(query, template.signature())?;
        trace_debug!("template_distance", index = index, distance = distance);
        if distance < best_distance {
            best_distance = distance;
            best = Some(Match {
                bbox: *template.bbox(),
                distance,
                template_index: index,
            });
        }
    }
    best.ok_or(HistMatchError::EmptyTemplateStore)
}
