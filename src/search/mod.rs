//! Offset search for vertically stitching overlapping captures.
//!
//! The search slides the bottom image up over the top image's bottom edge,
//! one candidate `(x_offset, y_offset)` at a time, and measures how many
//! consecutive rows match byte for byte. `space` derives the bounds and the
//! candidate order, `line` compares one row pair, `overlay` evaluates one
//! candidate with pruning, and `driver` runs the whole enumeration.

pub(crate) mod driver;
pub(crate) mod line;
pub(crate) mod overlay;
#[cfg(feature = "rayon")]
pub(crate) mod parallel;
pub(crate) mod space;

pub use driver::OverlapSearch;
pub use line::LineMatcher;
pub use overlay::{OverlayEvaluator, SearchState};
pub use space::{Candidates, OffsetSearchSpace, FIRST_Y_OFFSET};

use crate::progress::Attempt;
use crate::util::{StitchMatchError, StitchMatchResult};

/// Search parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct MatchConfig {
    /// Share of the narrower image width compared per row, in `(0, 1]`.
    pub provisional_match_width_factor: f64,
    /// Consecutive matching rows required to accept an offset.
    pub min_matching_lines: usize,
    /// Largest horizontal displacement tried to each side, in pixels.
    #[cfg_attr(feature = "serde", serde(alias = "maxAttemptedHorizontalOffset"))]
    pub max_horizontal_offset: usize,
    /// Largest vertical overlap tried, relative to the top image height, in `[0, 1]`.
    pub max_y_offset_factor: f64,
    /// Evaluate candidates in parallel in [`OverlapSearch::find_best`].
    ///
    /// Ignored without the `rayon` feature and by progress-streaming runs.
    pub parallel: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            provisional_match_width_factor: 0.5,
            min_matching_lines: 8,
            max_horizontal_offset: 32,
            max_y_offset_factor: 1.0,
            parallel: false,
        }
    }
}

impl MatchConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> StitchMatchResult<()> {
        let width_factor = self.provisional_match_width_factor;
        if !width_factor.is_finite() || width_factor <= 0.0 || width_factor > 1.0 {
            return Err(StitchMatchError::InvalidConfig {
                field: "provisional_match_width_factor",
                reason: "must be in (0, 1]",
            });
        }
        if self.min_matching_lines == 0 {
            return Err(StitchMatchError::InvalidConfig {
                field: "min_matching_lines",
                reason: "must be at least 1",
            });
        }
        let y_factor = self.max_y_offset_factor;
        if !y_factor.is_finite() || !(0.0..=1.0).contains(&y_factor) {
            return Err(StitchMatchError::InvalidConfig {
                field: "max_y_offset_factor",
                reason: "must be in [0, 1]",
            });
        }
        Ok(())
    }
}

/// Hypothesized displacement of the bottom image.
///
/// `y_offset` counts bottom rows placed over the top image's last rows;
/// `x_offset` moves the bottom comparison window by `-x_offset` columns, so
/// when `bottom[x] == top[x + s]` the matching candidate has `x_offset == s`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CandidateOffset {
    pub x_offset: isize,
    pub y_offset: usize,
}

/// Result of a completed search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Deepest contiguous match recorded.
    pub best_lines: usize,
    /// First candidate that reached `best_lines`, if any raised the record.
    pub best: Option<Attempt>,
    /// Number of candidates enumerated.
    pub candidates_evaluated: usize,
    /// Minimum depth that counts as a match.
    pub min_matching_lines: usize,
}

impl SearchOutcome {
    /// Returns the best attempt when it meets the configured minimum depth.
    pub fn matched(&self) -> Option<Attempt> {
        self.best.filter(|best| best.lines >= self.min_matching_lines)
    }
}

/// Request message of the worker protocol.
#[cfg(feature = "serde")]
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MatchRequest {
    pub top: crate::RasterImage,
    pub bottom: crate::RasterImage,
    #[serde(default)]
    pub config: MatchConfig,
}
