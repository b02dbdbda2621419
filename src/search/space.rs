//! Search bounds and candidate enumeration.
//!
//! Bounds are derived once per image pair. Candidates are produced with
//! `y_offset` increasing from [`FIRST_Y_OFFSET`] and, for every `y_offset`,
//! `x_offset` in zigzag order `0, 1, -1, 2, -2, ...`. The order decides which
//! of several equally deep candidates is reported first, so it is part of the
//! public contract.

use crate::image::RasterView;
use crate::search::{CandidateOffset, MatchConfig};
use crate::util::math::{ceil_half, ceil_scaled, zigzag};
use crate::util::StitchMatchResult;

/// Smallest vertical overlap tried. An overlap of zero rows compares nothing.
pub const FIRST_Y_OFFSET: usize = 1;

/// Bounds of the candidate space for one image pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OffsetSearchSpace {
    matching_width: usize,
    max_abs_x_offset: usize,
    max_y_offset: usize,
    top_window_start: usize,
    bottom_window_start: usize,
}

impl OffsetSearchSpace {
    /// Derives the bounds for `top` over `bottom`.
    pub fn new(
        top: RasterView<'_>,
        bottom: RasterView<'_>,
        cfg: &MatchConfig,
    ) -> StitchMatchResult<Self> {
        cfg.validate()?;

        // A validated factor is positive and both widths are at least 1, so the
        // ceiling is never below one pixel.
        let narrower = top.width().min(bottom.width());
        let matching_width = ceil_scaled(cfg.provisional_match_width_factor, narrower)
            .min(top.width())
            .min(bottom.width());

        let max_abs_x_offset = cfg
            .max_horizontal_offset
            .min((bottom.width() - matching_width) / 2);

        // Rows of the bottom image the walk can touch are `0..y_offset`.
        let max_y_offset = ceil_scaled(cfg.max_y_offset_factor, top.height())
            .min(top.height())
            .min(bottom.height());

        Ok(Self {
            matching_width,
            max_abs_x_offset,
            max_y_offset,
            top_window_start: ceil_half(top.width()) - ceil_half(matching_width),
            bottom_window_start: ceil_half(bottom.width()) - ceil_half(matching_width),
        })
    }

    /// Pixels compared per row.
    pub fn matching_width(&self) -> usize {
        self.matching_width
    }

    /// Largest `|x_offset|` enumerated.
    pub fn max_abs_x_offset(&self) -> usize {
        self.max_abs_x_offset
    }

    /// Exclusive upper bound of the enumerated `y_offset` values.
    pub fn max_y_offset(&self) -> usize {
        self.max_y_offset
    }

    /// First compared column of every top row.
    pub fn top_window_start(&self) -> usize {
        self.top_window_start
    }

    /// First compared column of a bottom row at `x_offset == 0`.
    pub fn bottom_window_start(&self) -> usize {
        self.bottom_window_start
    }

    /// Number of candidates per `y_offset`.
    pub fn row_len(&self) -> usize {
        2 * self.max_abs_x_offset + 1
    }

    /// Total number of candidates.
    pub fn len(&self) -> usize {
        self.max_y_offset.saturating_sub(FIRST_Y_OFFSET) * self.row_len()
    }

    /// Returns true when no candidate will be evaluated.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enumerates the candidates in search order.
    pub fn candidates(&self) -> Candidates {
        Candidates {
            y_offset: FIRST_Y_OFFSET,
            step: 0,
            row_len: self.row_len(),
            end_y: self.max_y_offset,
        }
    }
}

/// Iterator over candidates in search order.
#[derive(Clone, Debug)]
pub struct Candidates {
    y_offset: usize,
    step: usize,
    row_len: usize,
    end_y: usize,
}

impl Iterator for Candidates {
    type Item = CandidateOffset;

    fn next(&mut self) -> Option<CandidateOffset> {
        if self.y_offset >= self.end_y {
            return None;
        }
        let candidate = CandidateOffset {
            x_offset: zigzag(self.step),
            y_offset: self.y_offset,
        };
        self.step += 1;
        if self.step == self.row_len {
            self.step = 0;
            self.y_offset += 1;
        }
        Some(candidate)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.y_offset >= self.end_y {
            0
        } else {
            (self.end_y - self.y_offset) * self.row_len - self.step
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Candidates {}

impl std::iter::FusedIterator for Candidates {}
