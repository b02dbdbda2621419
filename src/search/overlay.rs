//! Depth evaluation of one candidate with pruning.
//!
//! A candidate is only walked row by row when it could still beat both the
//! configured minimum and the deepest match recorded so far. Checking the
//! first row and the row that would have to match to beat the record costs
//! two comparisons and skips most hopeless candidates.

use crate::progress::{Attempt, ProgressSink, SearchEvent};
use crate::search::{CandidateOffset, LineMatcher};
use crate::trace::trace_event;

/// Best depth recorded during one search call.
///
/// Owned by the driver and threaded through every evaluation; `best_lines`
/// never decreases.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchState {
    best_lines: usize,
    best: Option<Attempt>,
}

impl SearchState {
    /// Creates a state with no record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deepest contiguous match recorded so far.
    pub fn best_lines(&self) -> usize {
        self.best_lines
    }

    /// Candidate that set the current record.
    pub fn best(&self) -> Option<Attempt> {
        self.best
    }

    /// Raises the record if `lines` beats it. Returns true on a new record.
    pub fn record(&mut self, candidate: CandidateOffset, lines: usize) -> bool {
        if lines <= self.best_lines {
            return false;
        }
        self.best_lines = lines;
        self.best = Some(Attempt::new(candidate, lines));
        true
    }
}

/// How the evaluation of one candidate ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Evaluation {
    /// Skipped by the fast-reject checks.
    Rejected,
    /// Walked until the first mismatch or the end of the overlap.
    Walked { lines: usize },
}

impl Evaluation {
    /// Final depth, zero for rejected candidates.
    pub fn lines(&self) -> usize {
        match self {
            Evaluation::Rejected => 0,
            Evaluation::Walked { lines } => *lines,
        }
    }
}

/// Evaluates candidates against an image pair.
#[derive(Clone, Copy, Debug)]
pub struct OverlayEvaluator<'a> {
    matcher: LineMatcher<'a>,
    min_matching_lines: usize,
}

impl<'a> OverlayEvaluator<'a> {
    /// Creates an evaluator. `min_matching_lines` is clamped to at least 1.
    pub fn new(matcher: LineMatcher<'a>, min_matching_lines: usize) -> Self {
        Self {
            matcher,
            min_matching_lines: min_matching_lines.max(1),
        }
    }

    /// Returns the row comparator.
    pub fn matcher(&self) -> &LineMatcher<'a> {
        &self.matcher
    }

    /// Evaluates one candidate, emitting its attempts and updating `state`.
    ///
    /// Emits `lines: 0` first, then, if the candidate survives pruning, one
    /// attempt before testing each further row. Depth never exceeds
    /// `candidate.y_offset`.
    pub fn evaluate<S: ProgressSink + ?Sized>(
        &self,
        candidate: CandidateOffset,
        state: &mut SearchState,
        sink: &mut S,
    ) -> Evaluation {
        sink.emit(SearchEvent::Attempt(Attempt::new(candidate, 0)));

        let lines_to_beat = (self.min_matching_lines - 1).max(state.best_lines());
        if !self.can_beat(candidate, lines_to_beat) {
            return Evaluation::Rejected;
        }

        let mut lines = 1;
        while lines < candidate.y_offset {
            sink.emit(SearchEvent::Attempt(Attempt::new(candidate, lines)));
            if !self.matcher.is_line_match(candidate, lines) {
                break;
            }
            lines += 1;
        }

        if state.record(candidate, lines) {
            trace_event!(
                "best_depth_raised",
                x_offset = candidate.x_offset,
                y_offset = candidate.y_offset,
                lines = lines
            );
        }
        Evaluation::Walked { lines }
    }

    /// Full contiguous depth of `candidate` if it survives the fast reject
    /// against the configured minimum.
    ///
    /// Independent of any search state, so candidates can be scored in any
    /// order and reduced afterwards.
    pub fn qualifying_depth(&self, candidate: CandidateOffset) -> Option<usize> {
        if !self.can_beat(candidate, self.min_matching_lines - 1) {
            return None;
        }
        let mut lines = 1;
        while lines < candidate.y_offset && self.matcher.is_line_match(candidate, lines) {
            lines += 1;
        }
        Some(lines)
    }

    /// Fast reject: the first row and row `lines_to_beat` must both match.
    ///
    /// Depth is capped at `y_offset`, so a record at or beyond it cannot be
    /// beaten and the row past the overlap is never addressed.
    fn can_beat(&self, candidate: CandidateOffset, lines_to_beat: usize) -> bool {
        if lines_to_beat >= candidate.y_offset {
            return false;
        }
        if !self.matcher.is_line_match(candidate, 0) {
            return false;
        }
        lines_to_beat == 0 || self.matcher.is_line_match(candidate, lines_to_beat)
    }
}
