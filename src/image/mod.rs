//! RGBA raster images and borrowed row views.
//!
//! `RasterImage` owns a tightly packed RGBA8 buffer (no row padding), so the
//! byte stride between rows is always `width * 4`. `RasterView` is a `Copy`
//! borrow of the same layout; the search reads rows through it and never
//! retains or mutates the pixels beyond a call.

use crate::util::{StitchMatchError, StitchMatchResult};

#[cfg(feature = "image-io")]
pub mod io;

/// Bytes per pixel in the RGBA8 layout.
pub const BYTES_PER_PIXEL: usize = 4;

/// Owned, validated RGBA8 image.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawRaster"))]
pub struct RasterImage {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// Creates an image from a row-major RGBA8 buffer of exactly
    /// `width * height * 4` bytes.
    pub fn new(pixels: Vec<u8>, width: usize, height: usize) -> StitchMatchResult<Self> {
        let expected = required_len(width, height)?;
        if pixels.len() != expected {
            return Err(StitchMatchError::BufferSizeMismatch {
                expected,
                got: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Creates an image filled with a single RGBA color.
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> StitchMatchResult<Self> {
        let len = required_len(width, height)?;
        let pixels = rgba.iter().copied().cycle().take(len).collect();
        Self::new(pixels, width, height)
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the raw RGBA bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consumes the image and returns its pixel buffer.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> RasterView<'_> {
        RasterView {
            pixels: &self.pixels,
            width: self.width,
            height: self.height,
        }
    }
}

/// Borrowed RGBA8 view with a packed row layout.
#[derive(Copy, Clone, Debug)]
pub struct RasterView<'a> {
    pixels: &'a [u8],
    width: usize,
    height: usize,
}

impl<'a> RasterView<'a> {
    /// Creates a view over a caller-owned buffer, validating its length.
    pub fn from_slice(pixels: &'a [u8], width: usize, height: usize) -> StitchMatchResult<Self> {
        let expected = required_len(width, height)?;
        if pixels.len() != expected {
            return Err(StitchMatchError::BufferSizeMismatch {
                expected,
                got: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the bytes between consecutive row starts.
    pub fn row_bytes(&self) -> usize {
        self.width * BYTES_PER_PIXEL
    }

    /// Returns the full backing slice.
    pub fn as_slice(&self) -> &'a [u8] {
        self.pixels
    }

    /// Returns the RGBA bytes of row `y`.
    pub fn row(&self, y: usize) -> Option<&'a [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.row_bytes();
        self.pixels.get(start..start + self.row_bytes())
    }

    /// Returns `width` pixels of row `y` starting at column `x`, as bytes.
    pub fn row_window(&self, y: usize, x: usize, width: usize) -> Option<&'a [u8]> {
        let end = x.checked_add(width)?;
        if end > self.width {
            return None;
        }
        self.row(y)?.get(x * BYTES_PER_PIXEL..end * BYTES_PER_PIXEL)
    }

    /// Returns the RGBA value at `(x, y)` if it is within bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        let px = self.row_window(y, x, 1)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

fn required_len(width: usize, height: usize) -> StitchMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(StitchMatchError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(BYTES_PER_PIXEL))
        .ok_or(StitchMatchError::InvalidDimensions { width, height })
}

/// Unvalidated wire shape of a raster image.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawRaster {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawRaster> for RasterImage {
    type Error = StitchMatchError;

    fn try_from(raw: RawRaster) -> StitchMatchResult<Self> {
        RasterImage::new(raw.pixels, raw.width, raw.height)
    }
}

#[cfg(test)]
mod tests {
    use super::{RasterImage, RasterView};
    use crate::util::StitchMatchError;

    #[test]
    fn row_window_addresses_rgba_bytes() {
        let pixels: Vec<u8> = (0u8..24).collect();
        let view = RasterView::from_slice(&pixels, 3, 2).unwrap();
        assert_eq!(view.row(1).unwrap(), &pixels[12..24]);
        assert_eq!(view.row_window(1, 1, 2).unwrap(), &pixels[16..24]);
        assert_eq!(view.pixel(2, 0), Some([8, 9, 10, 11]));
        assert!(view.row_window(0, 2, 2).is_none());
        assert!(view.row(2).is_none());
    }

    #[test]
    fn filled_repeats_the_color() {
        let img = RasterImage::filled(2, 2, [1, 2, 3, 4]).unwrap();
        assert_eq!(img.pixels(), &[1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 4]);
    }

    #[test]
    fn overflowing_dimensions_are_rejected() {
        let err = RasterView::from_slice(&[], usize::MAX, 2).unwrap_err();
        assert_eq!(
            err,
            StitchMatchError::InvalidDimensions {
                width: usize::MAX,
                height: 2
            }
        );
    }
}
