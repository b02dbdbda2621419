//! Exact row comparison under one candidate offset.

use crate::image::RasterView;
use crate::search::{CandidateOffset, OffsetSearchSpace};

/// Compares centered row windows of the top and bottom image byte for byte.
#[derive(Clone, Copy, Debug)]
pub struct LineMatcher<'a> {
    top: RasterView<'a>,
    bottom: RasterView<'a>,
    space: OffsetSearchSpace,
}

impl<'a> LineMatcher<'a> {
    /// Creates a matcher for an image pair and its derived bounds.
    pub fn new(top: RasterView<'a>, bottom: RasterView<'a>, space: OffsetSearchSpace) -> Self {
        Self { top, bottom, space }
    }

    /// Returns the bounds this matcher addresses rows with.
    pub fn space(&self) -> &OffsetSearchSpace {
        &self.space
    }

    /// Returns true when row `line` of the overlap is identical in both images.
    ///
    /// Line 0 is the first overlapping row: top row `height - y_offset`,
    /// bottom row 0. Every RGBA byte in the `matching_width` window must be
    /// equal. A window that falls outside either image never matches.
    pub fn is_line_match(&self, candidate: CandidateOffset, line: usize) -> bool {
        match (
            self.top_window(candidate, line),
            self.bottom_window(candidate, line),
        ) {
            (Some(top), Some(bottom)) => top == bottom,
            _ => false,
        }
    }

    fn top_window(&self, candidate: CandidateOffset, line: usize) -> Option<&'a [u8]> {
        let row = self
            .top
            .height()
            .checked_sub(candidate.y_offset)?
            .checked_add(line)?;
        self.top.row_window(
            row,
            self.space.top_window_start(),
            self.space.matching_width(),
        )
    }

    fn bottom_window(&self, candidate: CandidateOffset, line: usize) -> Option<&'a [u8]> {
        // Positive offsets move the bottom window left.
        let start = self
            .space
            .bottom_window_start()
            .checked_add_signed(-candidate.x_offset)?;
        self.bottom.row_window(line, start, self.space.matching_width())
    }
}
