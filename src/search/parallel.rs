//! Rayon-parallel best-offset search (feature-gated).
//!
//! Candidates are scored independently of any shared record, then reduced to
//! the deepest qualifying depth, ties going to the candidate enumerated
//! first. This reproduces the sequential driver's best attempt without a
//! progress stream.

use crate::image::RasterView;
use crate::progress::Attempt;
use crate::search::{LineMatcher, MatchConfig, OffsetSearchSpace, OverlayEvaluator, SearchOutcome};
use crate::trace::{trace_event, trace_span};
use rayon::prelude::*;

pub(crate) fn find_best_par(
    top: RasterView<'_>,
    bottom: RasterView<'_>,
    space: OffsetSearchSpace,
    cfg: &MatchConfig,
) -> SearchOutcome {
    let _span = trace_span!(
        "overlap_search",
        matching_width = space.matching_width(),
        candidates = space.len(),
        parallel = true
    )
    .entered();

    let evaluator =
        OverlayEvaluator::new(LineMatcher::new(top, bottom, space), cfg.min_matching_lines);
    let candidates: Vec<_> = space.candidates().collect();

    let best = candidates
        .par_iter()
        .enumerate()
        .filter_map(|(idx, &candidate)| {
            evaluator
                .qualifying_depth(candidate)
                .map(|lines| (idx, Attempt::new(candidate, lines)))
        })
        .reduce_with(|a, b| {
            if b.1.lines > a.1.lines || (b.1.lines == a.1.lines && b.0 < a.0) {
                b
            } else {
                a
            }
        })
        .map(|(_, attempt)| attempt);

    let best_lines = best.map_or(0, |attempt| attempt.lines);
    trace_event!(
        "parallel_reduce",
        candidates = candidates.len(),
        best_lines = best_lines
    );
    SearchOutcome {
        best_lines,
        best,
        candidates_evaluated: candidates.len(),
        min_matching_lines: cfg.min_matching_lines,
    }
}
