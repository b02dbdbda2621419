//! Full enumeration of the candidate space.
//!
//! The driver never stops early: a deep match at one offset does not rule out
//! a deeper one elsewhere in the bounded space, and running to the end keeps
//! the event stream identical across runs.

use crate::image::RasterView;
use crate::progress::{Discard, ProgressSink, SearchEvent};
use crate::search::{
    LineMatcher, MatchConfig, OffsetSearchSpace, OverlayEvaluator, SearchOutcome, SearchState,
};
use crate::trace::{trace_event, trace_span};
use crate::util::StitchMatchResult;

/// Overlap search for one configuration, reusable across image pairs.
#[derive(Clone, Debug, Default)]
pub struct OverlapSearch {
    cfg: MatchConfig,
}

impl OverlapSearch {
    /// Creates a search with the given configuration.
    pub fn new(cfg: MatchConfig) -> Self {
        Self { cfg }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: MatchConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Derives the candidate space for an image pair, validating the inputs.
    pub fn prepare(
        &self,
        top: RasterView<'_>,
        bottom: RasterView<'_>,
    ) -> StitchMatchResult<OffsetSearchSpace> {
        OffsetSearchSpace::new(top, bottom, &self.cfg)
    }

    /// Runs the search, streaming every attempt and a final `Exhausted` to `sink`.
    ///
    /// Errors are only returned before the first event is emitted.
    pub fn run<S: ProgressSink + ?Sized>(
        &self,
        top: RasterView<'_>,
        bottom: RasterView<'_>,
        sink: &mut S,
    ) -> StitchMatchResult<SearchOutcome> {
        let space = self.prepare(top, bottom)?;
        Ok(self.run_prepared(top, bottom, space, sink))
    }

    /// Runs the search over an already derived space.
    pub(crate) fn run_prepared<S: ProgressSink + ?Sized>(
        &self,
        top: RasterView<'_>,
        bottom: RasterView<'_>,
        space: OffsetSearchSpace,
        sink: &mut S,
    ) -> SearchOutcome {
        let _span = trace_span!(
            "overlap_search",
            matching_width = space.matching_width(),
            max_abs_x_offset = space.max_abs_x_offset(),
            max_y_offset = space.max_y_offset()
        )
        .entered();

        let evaluator = OverlayEvaluator::new(
            LineMatcher::new(top, bottom, space),
            self.cfg.min_matching_lines,
        );
        let mut state = SearchState::new();
        let mut evaluated = 0usize;
        for candidate in space.candidates() {
            evaluator.evaluate(candidate, &mut state, sink);
            evaluated += 1;
        }
        sink.emit(SearchEvent::Exhausted);

        trace_event!(
            "search_exhausted",
            candidates = evaluated,
            best_lines = state.best_lines()
        );
        SearchOutcome {
            best_lines: state.best_lines(),
            best: state.best(),
            candidates_evaluated: evaluated,
            min_matching_lines: self.cfg.min_matching_lines,
        }
    }

    /// Runs the search without a progress stream.
    ///
    /// With `parallel` set and the `rayon` feature enabled, candidates are
    /// scored concurrently; the reported best is the same as the sequential
    /// run's.
    pub fn find_best(
        &self,
        top: RasterView<'_>,
        bottom: RasterView<'_>,
    ) -> StitchMatchResult<SearchOutcome> {
        let space = self.prepare(top, bottom)?;
        #[cfg(feature = "rayon")]
        if self.cfg.parallel {
            return Ok(crate::search::parallel::find_best_par(
                top, bottom, space, &self.cfg,
            ));
        }
        Ok(self.run_prepared(top, bottom, space, &mut Discard))
    }
}

#[cfg(test)]
mod tests {
    use super::OverlapSearch;
    use crate::progress::{EventLog, SearchEvent};
    use crate::search::MatchConfig;
    use crate::RasterImage;

    #[test]
    fn stream_ends_with_a_single_exhausted() {
        let img = RasterImage::filled(6, 5, [1, 2, 3, 4]).unwrap();
        let search = OverlapSearch::new(MatchConfig {
            provisional_match_width_factor: 0.5,
            min_matching_lines: 1,
            max_horizontal_offset: 1,
            max_y_offset_factor: 1.0,
            parallel: false,
        });
        let mut log = EventLog::new();
        let outcome = search.run(img.view(), img.view(), &mut log).unwrap();
        assert_eq!(log.events().last(), Some(&SearchEvent::Exhausted));
        assert_eq!(log.exhausted_count(), 1);
        assert_eq!(outcome.candidates_evaluated, 4 * 3);
        assert_eq!(outcome.best_lines, 4);
    }

    #[test]
    fn find_best_agrees_with_run() {
        let img = RasterImage::filled(6, 5, [9, 9, 9, 9]).unwrap();
        let search = OverlapSearch::default().with_config(MatchConfig {
            min_matching_lines: 2,
            ..MatchConfig::default()
        });
        let streamed = search
            .run(img.view(), img.view(), &mut EventLog::new())
            .unwrap();
        let silent = search.find_best(img.view(), img.view()).unwrap();
        assert_eq!(streamed, silent);
    }

    #[test]
    fn validation_errors_emit_nothing() {
        let img = RasterImage::filled(2, 2, [0; 4]).unwrap();
        let search = OverlapSearch::new(MatchConfig {
            min_matching_lines: 0,
            ..MatchConfig::default()
        });
        let mut log = EventLog::new();
        assert!(search.run(img.view(), img.view(), &mut log).is_err());
        assert!(log.events().is_empty());
    }
}
